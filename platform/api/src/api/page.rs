use common::http::ext::OptionExt;
use common::http::router::ext::RequestExt as _;
use hyper::header::{self, HeaderValue};
use hyper::{Request, Response, StatusCode};

use super::auth::Viewer;
use super::error::{ApiError, Result};
use super::ext::RequestExt as _;
use super::Body;
use crate::global::ApiGlobal;
use crate::profile::{self, render, ProfilePage};

/// `GET /:username`, the profile page. `?highlight=<question id>` picks the
/// question used for the link preview.
pub async fn profile<G: ApiGlobal, B>(req: Request<B>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;

	let username = req
		.param("username")
		.map_err_route((StatusCode::BAD_REQUEST, "Missing username"))?;
	let viewer = req.data::<Viewer>();
	let highlight = query_param(req.uri().query(), "highlight");

	let page = profile::assemble(&global, username, viewer, highlight.as_deref())
		.await
		.map_err(ApiError::from)?;

	let (status, html) = match page {
		ProfilePage::NotFound => (StatusCode::NOT_FOUND, render::render_not_found(username)),
		ProfilePage::Found(profile) => (StatusCode::OK, render::render_profile(&profile, chrono::Utc::now())),
	};

	Ok(html_response(status, html.map_err(ApiError::from)?))
}

fn html_response(status: StatusCode, html: String) -> Response<Body> {
	Response::builder()
		.status(status)
		.header(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))
		.body(Body::from(html))
		.expect("failed to build response")
}

/// The first non empty value of `key` in a raw query string, decoded.
fn query_param(query: Option<&str>, key: &str) -> Option<String> {
	url::form_urlencoded::parse(query?.as_bytes())
		.find_map(|(k, v)| if k == key && !v.is_empty() { Some(v.into_owned()) } else { None })
}
