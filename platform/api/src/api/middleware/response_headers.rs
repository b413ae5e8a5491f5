use std::sync::{Arc, Mutex};

use common::http::router::ext::RequestExt as _;
use common::http::router::middleware::Middleware;
use common::http::RouteError;
use hyper::header::{HeaderValue, IntoHeaderName};
use hyper::{HeaderMap, Request};

use crate::api::error::ApiError;
use crate::api::Body;
use crate::global::ApiGlobal;

/// Headers the auth check and handlers want on the response. Pre middleware
/// only sees the request head, so they are staged here until the response
/// exists.
#[derive(Debug, Clone, Default)]
pub struct PendingHeaders(Arc<Mutex<HeaderMap>>);

impl PendingHeaders {
	pub fn stage<K: IntoHeaderName>(&self, key: K, value: HeaderValue) {
		match self.0.lock() {
			Ok(mut headers) => {
				headers.insert(key, value);
			}
			Err(_) => tracing::error!("pending headers lock poisoned, header dropped"),
		}
	}

	/// Moves the staged headers onto `target`, replacing values it already has.
	pub fn drain_into(&self, target: &mut HeaderMap) {
		let Ok(mut headers) = self.0.lock() else {
			tracing::error!("pending headers lock poisoned, headers dropped");
			return;
		};

		let mut last = None;
		for (name, value) in std::mem::take(&mut *headers) {
			// Continuation values of a name come with `None`.
			let name = match name {
				Some(name) => {
					target.remove(&name);
					last = Some(name.clone());
					name
				}
				None => match &last {
					Some(name) => name.clone(),
					None => continue,
				},
			};

			target.append(name, value);
		}
	}
}

pub fn pre_flight_middleware<G: ApiGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::pre(|mut req| async move {
		req.provide(PendingHeaders::default());

		Ok(req)
	})
}

pub fn post_flight_middleware<G: ApiGlobal>(_: &Arc<G>) -> Middleware<Body, RouteError<ApiError>> {
	Middleware::post_with_req(|mut resp, req| async move {
		if let Some(pending) = req.data::<PendingHeaders>() {
			pending.drain_into(resp.headers_mut());
		}

		Ok(resp)
	})
}

pub trait RequestExt {
	fn set_response_header<K: IntoHeaderName>(&self, key: K, value: HeaderValue);
}

impl<B> RequestExt for Request<B> {
	fn set_response_header<K: IntoHeaderName>(&self, key: K, value: HeaderValue) {
		match self.data::<PendingHeaders>() {
			Some(pending) => pending.stage(key, value),
			None => tracing::warn!("response headers middleware is not installed"),
		}
	}
}
