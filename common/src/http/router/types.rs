use std::future::Future;
use std::pin::Pin;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pub(crate) type RouteHandler<I, O, E> =
	Box<dyn Fn(hyper::Request<I>) -> BoxFuture<Result<hyper::Response<O>, E>> + Send + Sync>;

pub(crate) type ErrorHandler<O, E> = Box<dyn Fn(hyper::Request<()>, E) -> BoxFuture<hyper::Response<O>> + Send + Sync>;

/// Path parameters captured while matching the route, in path order.
#[derive(Debug, Clone, Default)]
pub struct RouteParams(pub Vec<(String, String)>);

/// Everything needed to serve one matched route, as indexes into the
/// router's handler tables.
#[derive(Debug, Clone)]
pub(crate) struct RouteInfo {
	pub handler: usize,
	pub pre_middleware: Vec<usize>,
	pub post_middleware: Vec<usize>,
	pub error_handler: Option<usize>,
}

/// All the routes registered under one path, told apart by method. A route
/// without a method answers every method not claimed by another route.
#[derive(Debug, Default)]
pub(crate) struct Endpoint {
	pub routes: Vec<(Option<hyper::Method>, RouteInfo)>,
}

impl Endpoint {
	pub fn route(&self, method: &hyper::Method) -> Option<&RouteInfo> {
		self.routes
			.iter()
			.find(|(m, _)| m.as_ref() == Some(method))
			.or_else(|| self.routes.iter().find(|(m, _)| m.is_none()))
			.map(|(_, info)| info)
	}
}
