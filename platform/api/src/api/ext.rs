use std::sync::Arc;

use common::http::ext::RequestGlobalExt;

use super::error::{ApiError, Result};
use crate::global::ApiGlobal;

pub trait RequestExt {
	fn get_global<G: ApiGlobal>(&self) -> Result<Arc<G>>;
}

impl<B> RequestExt for hyper::Request<B> {
	#[track_caller]
	fn get_global<G: ApiGlobal>(&self) -> Result<Arc<G>> {
		RequestGlobalExt::<ApiError>::get_global::<G>(self)
	}
}
