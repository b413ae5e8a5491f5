use std::future::Future;

use super::types::BoxFuture;

pub(crate) type PreMiddlewareHandler<E> =
	Box<dyn Fn(hyper::Request<()>) -> BoxFuture<Result<hyper::Request<()>, E>> + Send + Sync>;

pub(crate) type PostMiddlewareHandler<O, E> =
	Box<dyn Fn(hyper::Response<O>, hyper::Request<()>) -> BoxFuture<Result<hyper::Response<O>, E>> + Send + Sync>;

/// Middleware runs around every route registered in the same scope or in a
/// nested one. Pre middleware sees the request head (the body stays with the
/// route), post middleware sees the response along with the request head.
pub enum Middleware<O, E> {
	Pre(PreMiddlewareHandler<E>),
	Post(PostMiddlewareHandler<O, E>),
}

impl<O, E> std::fmt::Debug for Middleware<O, E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Pre(_) => write!(f, "Middleware::Pre(..)"),
			Self::Post(_) => write!(f, "Middleware::Post(..)"),
		}
	}
}

impl<O: 'static, E: 'static> Middleware<O, E> {
	pub fn pre<F>(handler: impl Fn(hyper::Request<()>) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<hyper::Request<()>, E>> + Send + 'static,
	{
		Self::Pre(Box::new(move |req| Box::pin(handler(req))))
	}

	pub fn post<F>(handler: impl Fn(hyper::Response<O>) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static,
	{
		Self::Post(Box::new(move |res, _| Box::pin(handler(res))))
	}

	pub fn post_with_req<F>(handler: impl Fn(hyper::Response<O>, hyper::Request<()>) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static,
	{
		Self::Post(Box::new(move |res, req| Box::pin(handler(res, req))))
	}
}
