use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use jwt::{Claims, Header, RegisteredClaims, SignWithKey, Token, VerifyWithKey};
use sha2::Sha256;
use ulid::Ulid;

use crate::config::SessionConfig;
use crate::database::Session;
use crate::global::ApiGlobal;

/// The claims of a session token. `sub` names the user and `jti` the session
/// row that must still be alive for the token to count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
	pub user_id: Ulid,
	pub session_id: Ulid,
	pub issued_at: DateTime<Utc>,
	pub not_before: Option<DateTime<Utc>>,
	pub expiration: Option<DateTime<Utc>>,
}

fn signing_key(config: &SessionConfig) -> Option<Hmac<Sha256>> {
	Hmac::<Sha256>::new_from_slice(config.secret.as_bytes()).ok()
}

fn timestamp(secs: u64) -> Option<DateTime<Utc>> {
	Utc.timestamp_opt(i64::try_from(secs).ok()?, 0).single()
}

pub trait JwtState: Sized {
	fn to_claims(&self) -> Claims;

	fn from_claims(claims: &Claims) -> Option<Self>;

	/// Signs the claims with the configured secret and issuer.
	fn serialize<G: ApiGlobal>(&self, global: &Arc<G>) -> Option<String> {
		let config = global.config::<SessionConfig>();

		let mut claims = self.to_claims();
		claims.registered.issuer = Some(config.issuer.clone());
		claims
			.registered
			.issued_at
			.get_or_insert_with(|| Utc::now().timestamp() as u64);

		claims.sign_with_key(&signing_key(config)?).ok()
	}

	/// Checks the signature, the issuer and the `iat`, `nbf` and `exp`
	/// windows. Any failure yields `None`.
	fn verify<G: ApiGlobal>(global: &Arc<G>, token: &str) -> Option<Self> {
		let config = global.config::<SessionConfig>();

		let token: Token<Header, Claims, _> = token.verify_with_key(&signing_key(config)?).ok()?;
		let registered = &token.claims().registered;

		if registered.issuer.as_deref() != Some(config.issuer.as_str()) {
			return None;
		}

		let now = Utc::now();

		if timestamp(registered.issued_at?)? > now {
			return None;
		}

		let not_yet_valid = registered.not_before.and_then(timestamp).is_some_and(|nbf| nbf > now);
		let expired = registered.expiration.and_then(timestamp).is_some_and(|exp| exp < now);
		if not_yet_valid || expired {
			return None;
		}

		Self::from_claims(token.claims())
	}
}

impl JwtState for SessionToken {
	fn to_claims(&self) -> Claims {
		Claims {
			registered: RegisteredClaims {
				subject: Some(self.user_id.to_string()),
				json_web_token_id: Some(self.session_id.to_string()),
				issued_at: Some(self.issued_at.timestamp() as u64),
				not_before: self.not_before.map(|x| x.timestamp() as u64),
				expiration: self.expiration.map(|x| x.timestamp() as u64),
				..Default::default()
			},
			private: Default::default(),
		}
	}

	fn from_claims(claims: &Claims) -> Option<Self> {
		let registered = &claims.registered;

		Some(Self {
			user_id: Ulid::from_string(registered.subject.as_deref()?).ok()?,
			session_id: Ulid::from_string(registered.json_web_token_id.as_deref()?).ok()?,
			issued_at: timestamp(registered.issued_at?)?,
			not_before: registered.not_before.and_then(timestamp),
			expiration: registered.expiration.and_then(timestamp),
		})
	}
}

impl From<&Session> for SessionToken {
	fn from(session: &Session) -> Self {
		Self {
			user_id: session.user_id.0,
			session_id: session.id.0,
			issued_at: session.created_at,
			not_before: None,
			expiration: Some(session.expires_at),
		}
	}
}
