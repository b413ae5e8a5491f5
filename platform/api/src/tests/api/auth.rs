use chrono::{Duration, Utc};
use hyper::header;
use serde_json::{json, Value};

use super::TestServer;
use crate::api::auth::{resolve_viewer, session_token, AuthError, Viewer};
use crate::api::jwt::{JwtState, SessionToken};
use crate::api::middleware::auth::AUTH_STATUS_HEADER;
use crate::tests::global::{mock_config, mock_global_state, MockData};

fn check_status(resp: &reqwest::Response) -> Option<&str> {
	resp.headers().get(AUTH_STATUS_HEADER).and_then(|s| s.to_str().ok())
}

#[tokio::test]
async fn test_auth_middleware() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let live = data.session(&alice, Duration::seconds(30));
	let expired = data.session(&alice, Duration::seconds(-30));

	let server = TestServer::start(data).await;

	let live_token = SessionToken::from(&live)
		.serialize(&server.global)
		.expect("failed to create token");
	let expired_token = SessionToken::from(&expired)
		.serialize(&server.global)
		.expect("failed to create token");

	let resp = server
		.client
		.get(server.url("/api/health"))
		.header(header::AUTHORIZATION.as_str(), format!("Bearer {live_token}"))
		.send()
		.await
		.expect("failed to get health");

	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	assert_eq!(check_status(&resp), None);
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({"status": "ok"}));

	// A dead session never fails the request, the response is only marked.
	let resp = server
		.client
		.get(server.url("/api/health"))
		.header(header::AUTHORIZATION.as_str(), format!("Bearer {expired_token}"))
		.send()
		.await
		.expect("failed to get health");

	assert_eq!(resp.status(), reqwest::StatusCode::OK);
	assert_eq!(check_status(&resp), Some("failed"));
	let body: Value = resp.json().await.expect("failed to read body");
	assert_eq!(body, json!({"status": "ok"}));

	for bad in ["Bearer not-a-token", "Basic YWxpY2U6aHVudGVyMg=="] {
		let resp = server
			.client
			.get(server.url("/api/health"))
			.header(header::AUTHORIZATION.as_str(), bad)
			.send()
			.await
			.expect("failed to get health");

		assert_eq!(resp.status(), reqwest::StatusCode::OK);
		assert_eq!(check_status(&resp), Some("failed"), "{bad}");
	}

	server.shutdown().await;
}

#[tokio::test]
async fn test_resolve_viewer() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let bob = data.user("bob");
	let live = data.session(&alice, Duration::seconds(30));
	let expired = data.session(&alice, Duration::seconds(-30));

	let (global, _handler) = mock_global_state(mock_config(0), data);

	let token = SessionToken::from(&live).serialize(&global).expect("failed to create token");
	let viewer = resolve_viewer(&global, &token).await.expect("token should resolve");
	assert_eq!(
		viewer,
		Viewer {
			user_id: alice.id,
			session_id: live.id,
		}
	);

	// The signature and claims are fine, but the session row has expired.
	let token = SessionToken {
		expiration: None,
		..SessionToken::from(&expired)
	}
	.serialize(&global)
	.expect("failed to create token");
	assert_eq!(resolve_viewer(&global, &token).await, Err(AuthError::SessionExpired));

	// A token naming someone else's session.
	let token = SessionToken {
		user_id: bob.id.0,
		..SessionToken::from(&live)
	}
	.serialize(&global)
	.expect("failed to create token");
	assert_eq!(resolve_viewer(&global, &token).await, Err(AuthError::InvalidToken));

	// A session that does not exist.
	let token = SessionToken {
		session_id: ulid::Ulid::new(),
		..SessionToken::from(&live)
	}
	.serialize(&global)
	.expect("failed to create token");
	assert_eq!(resolve_viewer(&global, &token).await, Err(AuthError::InvalidToken));
}

#[tokio::test]
async fn test_jwt_verify_windows() {
	let mut data = MockData::default();
	let alice = data.user("alice");
	let live = data.session(&alice, Duration::seconds(30));

	let (global, _handler) = mock_global_state(mock_config(0), data);
	let (other, _other_handler) = mock_global_state(
		crate::config::AppConfig {
			session: crate::config::SessionConfig {
				secret: "another-secret".to_string(),
				..mock_config(0).session
			},
			..mock_config(0)
		},
		MockData::default(),
	);

	let payload = SessionToken::from(&live);
	let token = payload.serialize(&global).expect("failed to create token");
	assert_eq!(SessionToken::verify(&global, &token).map(|t| t.session_id), Some(live.id.0));

	// Signed with another secret.
	assert_eq!(SessionToken::verify(&other, &token), None);

	let not_yet = SessionToken {
		not_before: Some(Utc::now() + Duration::minutes(5)),
		..payload.clone()
	}
	.serialize(&global)
	.expect("failed to create token");
	assert_eq!(SessionToken::verify(&global, &not_yet), None);

	let expired = SessionToken {
		expiration: Some(Utc::now() - Duration::minutes(5)),
		..payload.clone()
	}
	.serialize(&global)
	.expect("failed to create token");
	assert_eq!(SessionToken::verify(&global, &expired), None);

	let from_the_future = SessionToken {
		issued_at: Utc::now() + Duration::minutes(5),
		..payload
	}
	.serialize(&global)
	.expect("failed to create token");
	assert_eq!(SessionToken::verify(&global, &from_the_future), None);
}

#[test]
fn test_session_token_sources() {
	let req = hyper::Request::builder()
		.header(header::AUTHORIZATION, "Bearer abc.def.ghi")
		.header(header::COOKIE, "curiously_session=cookie-token")
		.body(())
		.expect("failed to build request");
	assert_eq!(session_token(&req, "curiously_session"), Ok(Some("abc.def.ghi")));

	let req = hyper::Request::builder()
		.header(header::COOKIE, "theme=dark; curiously_session=cookie-token; other=1")
		.body(())
		.expect("failed to build request");
	assert_eq!(session_token(&req, "curiously_session"), Ok(Some("cookie-token")));

	let req = hyper::Request::builder()
		.header(header::COOKIE, "theme=dark")
		.body(())
		.expect("failed to build request");
	assert_eq!(session_token(&req, "curiously_session"), Ok(None));

	let req = hyper::Request::builder()
		.header(header::AUTHORIZATION, "Token abc")
		.body(())
		.expect("failed to build request");
	assert_eq!(session_token(&req, "curiously_session"), Err(AuthError::NotBearerToken));
}
