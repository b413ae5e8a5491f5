use common::http::ext::OptionExt;
use common::http::router::ext::RequestExt as _;
use common::make_response;
use hyper::{Request, Response, StatusCode};
use serde_json::json;

use super::error::{ApiError, Result};
use super::ext::RequestExt as _;
use super::Body;
use crate::database::User;
use crate::global::ApiGlobal;

/// `GET /api/:username/following`
pub async fn following<G: ApiGlobal, B>(req: Request<B>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let user = find_user(global.as_ref(), req.param("username")).await?;

	let following = global.following(user.id).await.map_err(ApiError::from)?;

	Ok(make_response!(StatusCode::OK, json!({ "following": following })))
}

/// `GET /api/:username/followers`
pub async fn followers<G: ApiGlobal, B>(req: Request<B>) -> Result<Response<Body>> {
	let global = req.get_global::<G>()?;
	let user = find_user(global.as_ref(), req.param("username")).await?;

	let followers = global.followers(user.id).await.map_err(ApiError::from)?;

	Ok(make_response!(StatusCode::OK, json!({ "followers": followers })))
}

async fn find_user<G: ApiGlobal>(global: &G, username: Option<&str>) -> Result<User> {
	let username = username
		.map(str::trim)
		.filter(|username| !username.is_empty())
		.map_err_route((StatusCode::BAD_REQUEST, "Missing username"))?;

	global
		.user_by_username(username)
		.await
		.map_err(ApiError::from)?
		.map_err_route((StatusCode::NOT_FOUND, "User not found"))
}
