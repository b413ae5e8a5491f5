use common::http::RouteError;
use hyper::StatusCode;

pub type Result<T, E = RouteError<ApiError>> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
	#[error("{0}")]
	Database(#[from] sqlx::Error),
	#[error("failed to render page: {0}")]
	Render(#[from] std::fmt::Error),
}

/// Anything that reaches the client as a 500 carries the raw error text.
impl From<ApiError> for RouteError<ApiError> {
	#[track_caller]
	fn from(err: ApiError) -> Self {
		let message = err.to_string();
		RouteError::from((StatusCode::INTERNAL_SERVER_ERROR, message, err))
	}
}
