use std::sync::Arc;

use hyper::header;

use super::jwt::{JwtState, SessionToken};
use crate::database::Ulid;
use crate::global::ApiGlobal;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
	#[error("token must be ascii only")]
	HeaderToStr,
	#[error("token must be a bearer token")]
	NotBearerToken,
	#[error("invalid token")]
	InvalidToken,
	#[error("session expired")]
	SessionExpired,
	#[error("failed to fetch session")]
	FetchSession,
}

/// Who is looking at the page, resolved from a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
	pub user_id: Ulid,
	pub session_id: Ulid,
}

/// Finds the session token of a request, from the `Authorization` header or
/// else from the session cookie.
pub fn session_token<'a, B>(req: &'a hyper::Request<B>, cookie_name: &str) -> Result<Option<&'a str>, AuthError> {
	if let Some(value) = req.headers().get(header::AUTHORIZATION) {
		let token = value
			.to_str()
			.map_err(|_| AuthError::HeaderToStr)?
			.strip_prefix("Bearer ")
			.ok_or(AuthError::NotBearerToken)?;

		return Ok(Some(token.trim()));
	}

	let cookie = req
		.headers()
		.get_all(header::COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(name, _)| *name == cookie_name)
		.map(|(_, value)| value.trim_matches('"'))
		.filter(|value| !value.is_empty());

	Ok(cookie)
}

/// Verifies the token and checks that the session it names is still alive and
/// belongs to the token's subject.
pub async fn resolve_viewer<G: ApiGlobal>(global: &Arc<G>, token: &str) -> Result<Viewer, AuthError> {
	let jwt = SessionToken::verify(global, token).ok_or(AuthError::InvalidToken)?;

	let session = global
		.session_by_id(jwt.session_id.into())
		.await
		.map_err(|err| {
			tracing::error!(error = %err, "failed to fetch session");
			AuthError::FetchSession
		})?
		.ok_or(AuthError::InvalidToken)?;

	if session.user_id.0 != jwt.user_id {
		return Err(AuthError::InvalidToken);
	}

	if !session.is_valid() {
		return Err(AuthError::SessionExpired);
	}

	Ok(Viewer {
		user_id: session.user_id,
		session_id: session.id,
	})
}
