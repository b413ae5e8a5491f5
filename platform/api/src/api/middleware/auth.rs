use std::sync::Arc;

use common::http::router::ext::RequestExt as _;
use common::http::router::middleware::Middleware;
use common::http::RouteError;
use hyper::header::HeaderValue;

use super::response_headers::RequestExt as _;
use crate::api::auth::{resolve_viewer, session_token};
use crate::api::error::ApiError;
use crate::api::ext::RequestExt as _;
use crate::api::Body;
use crate::config::SessionConfig;
use crate::global::ApiGlobal;

pub const AUTH_STATUS_HEADER: &str = "X-Auth-Token-Check-Status";

/// Resolves the viewer from the session token and stores it in the request
/// extensions. A missing or bad token never fails the request, a bad one only
/// marks the response with `X-Auth-Token-Check-Status: failed`.
pub fn auth_middleware<G: ApiGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::pre(|mut req| async move {
		let global = req.get_global::<G>()?;

		let token = match session_token(&req, &global.config::<SessionConfig>().cookie_name) {
			Ok(Some(token)) => token,
			Ok(None) => return Ok(req),
			Err(err) => {
				tracing::debug!(error = %err, "rejected session token");
				req.set_response_header(AUTH_STATUS_HEADER, HeaderValue::from_static("failed"));
				return Ok(req);
			}
		};

		match resolve_viewer(&global, token).await {
			Ok(viewer) => {
				tracing::debug!(user_id = %viewer.user_id, "resolved viewer");
				req.provide(viewer);
			}
			Err(err) => {
				tracing::debug!(error = %err, "rejected session token");
				req.set_response_header(AUTH_STATUS_HEADER, HeaderValue::from_static("failed"));
			}
		}

		Ok(req)
	})
}
