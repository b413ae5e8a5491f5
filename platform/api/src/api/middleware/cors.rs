use std::sync::Arc;

use common::http::router::middleware::Middleware;
use common::http::RouteError;
use hyper::header::{self, HeaderValue};
use hyper::{Request, Response, StatusCode};

use crate::api::error::{ApiError, Result};
use crate::api::Body;
use crate::global::ApiGlobal;

pub fn cors_middleware<G: ApiGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::post(|mut resp| async move {
		let headers = resp.headers_mut();
		headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
		headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, OPTIONS"));
		headers.insert(
			header::ACCESS_CONTROL_ALLOW_HEADERS,
			HeaderValue::from_static("Content-Type, Authorization"),
		);

		Ok(resp)
	})
}

/// Answers CORS preflight requests, the headers themselves come from
/// [`cors_middleware`].
pub async fn preflight<B>(_: Request<B>) -> Result<Response<Body>> {
	Ok(Response::builder()
		.status(StatusCode::NO_CONTENT)
		.body(Body::default())
		.expect("failed to build response"))
}
