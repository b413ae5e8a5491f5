use std::fmt::{Debug, Formatter};

use self::builder::RouterBuilder;
use self::middleware::{PostMiddlewareHandler, PreMiddlewareHandler};
use self::types::{Endpoint, ErrorHandler, RouteHandler, RouteInfo, RouteParams};

pub mod builder;
pub mod ext;
pub mod middleware;
pub mod types;

#[derive(thiserror::Error, Debug)]
pub enum RouterError<E> {
	#[error("unhandled error: {0:?}")]
	Unhandled(E),
	#[error("route not found")]
	NotFound,
	#[error("method not allowed")]
	MethodNotAllowed,
	/// A path parameter did not percent-decode to UTF-8.
	#[error("invalid path parameter: {0}")]
	InvalidParam(String),
}

/// A request router over a [`path_tree::PathTree`].
///
/// Build it with [`Router::builder`]. Paths use `path-tree` syntax, so
/// `/api/:username/followers` captures `username`. Captured values are
/// percent-decoded before routes see them.
pub struct Router<I, O, E> {
	tree: path_tree::PathTree<usize>,
	endpoints: Vec<Endpoint>,
	handlers: Vec<RouteHandler<I, O, E>>,
	pre_middleware: Vec<PreMiddlewareHandler<E>>,
	post_middleware: Vec<PostMiddlewareHandler<O, E>>,
	error_handlers: Vec<ErrorHandler<O, E>>,
	fallback: Option<RouteInfo>,
}

impl<I: 'static, O: 'static, E: 'static> Router<I, O, E> {
	pub fn builder() -> RouterBuilder<I, O, E> {
		RouterBuilder::new()
	}

	pub async fn handle(&self, mut req: hyper::Request<I>) -> Result<hyper::Response<O>, RouterError<E>> {
		let (info, params) = match self.tree.find(req.uri().path()) {
			Some((idx, path)) => {
				let info = self.endpoints[*idx]
					.route(req.method())
					.ok_or(RouterError::MethodNotAllowed)?;

				let params = path
					.params_iter()
					.map(|(k, v)| match urlencoding::decode(v) {
						Ok(value) => Ok((k.to_owned(), value.into_owned())),
						Err(_) => Err(RouterError::InvalidParam(k.to_owned())),
					})
					.collect::<Result<Vec<_>, RouterError<E>>>()?;

				(info, params)
			}
			None => (self.fallback.as_ref().ok_or(RouterError::NotFound)?, Vec::new()),
		};

		req.extensions_mut().insert(RouteParams(params));

		let error_handler = info.error_handler.map(|idx| &self.error_handlers[idx]);

		let (mut parts, body) = req.into_parts();

		for idx in info.pre_middleware.iter().copied() {
			match (self.pre_middleware[idx])(hyper::Request::from_parts(parts.clone(), ())).await {
				Ok(head) => parts = head.into_parts().0,
				Err(err) => return Self::on_error(error_handler, hyper::Request::from_parts(parts, ()), err).await,
			}
		}

		let head = hyper::Request::from_parts(parts.clone(), ());

		let mut res = match (self.handlers[info.handler])(hyper::Request::from_parts(parts, body)).await {
			Ok(res) => res,
			Err(err) => Self::on_error(error_handler, head.clone(), err).await?,
		};

		for idx in info.post_middleware.iter().copied() {
			res = match (self.post_middleware[idx])(res, head.clone()).await {
				Ok(res) => res,
				Err(err) => return Self::on_error(error_handler, head, err).await,
			};
		}

		Ok(res)
	}

	async fn on_error(
		error_handler: Option<&ErrorHandler<O, E>>,
		head: hyper::Request<()>,
		err: E,
	) -> Result<hyper::Response<O>, RouterError<E>> {
		match error_handler {
			Some(handler) => Ok(handler(head, err).await),
			None => Err(RouterError::Unhandled(err)),
		}
	}
}

impl<I, O, E> Debug for Router<I, O, E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("endpoints", &self.endpoints)
			.field("handlers", &self.handlers.len())
			.field("pre_middleware", &self.pre_middleware.len())
			.field("post_middleware", &self.post_middleware.len())
			.field("error_handlers", &self.error_handlers.len())
			.field("fallback", &self.fallback)
			.finish()
	}
}
