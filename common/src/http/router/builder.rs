use std::collections::HashMap;
use std::future::Future;

use super::middleware::{Middleware, PostMiddlewareHandler, PreMiddlewareHandler};
use super::types::{Endpoint, ErrorHandler, RouteHandler, RouteInfo};
use super::Router;

enum Item<I, O, E> {
	Route(Option<hyper::Method>, RouteHandler<I, O, E>),
	Scope(RouterBuilder<I, O, E>),
}

pub struct RouterBuilder<I, O, E> {
	items: Vec<(&'static str, Item<I, O, E>)>,
	pre_middleware: Vec<PreMiddlewareHandler<E>>,
	post_middleware: Vec<PostMiddlewareHandler<O, E>>,
	error_handler: Option<ErrorHandler<O, E>>,
	fallback: Option<RouteHandler<I, O, E>>,
}

impl<I, O, E> std::fmt::Debug for RouterBuilder<I, O, E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("paths", &self.items.iter().map(|(path, _)| *path).collect::<Vec<_>>())
			.field("pre_middleware", &self.pre_middleware.len())
			.field("post_middleware", &self.post_middleware.len())
			.field("error_handler", &self.error_handler.is_some())
			.finish()
	}
}

impl<I: 'static, O: 'static, E: 'static> Default for RouterBuilder<I, O, E> {
	fn default() -> Self {
		Self::new()
	}
}

impl<I: 'static, O: 'static, E: 'static> RouterBuilder<I, O, E> {
	pub fn new() -> Self {
		Self {
			items: Vec::new(),
			pre_middleware: Vec::new(),
			post_middleware: Vec::new(),
			error_handler: None,
			fallback: None,
		}
	}

	pub fn middleware(mut self, middleware: Middleware<O, E>) -> Self {
		match middleware {
			Middleware::Pre(handler) => self.pre_middleware.push(handler),
			Middleware::Post(handler) => self.post_middleware.push(handler),
		}

		self
	}

	/// Makes `data` available to every route of this scope through the
	/// request extensions.
	pub fn data<T: Clone + Send + Sync + 'static>(self, data: T) -> Self {
		self.middleware(Middleware::pre(move |mut req| {
			req.extensions_mut().insert(data.clone());
			async move { Ok(req) }
		}))
	}

	/// Turns errors returned by routes and middleware of this scope into
	/// responses. Nested scopes inherit it unless they set their own.
	pub fn error_handler<F>(mut self, handler: impl Fn(hyper::Request<()>, E) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = hyper::Response<O>> + Send + 'static,
	{
		self.error_handler = Some(Box::new(move |req, err| Box::pin(handler(req, err))));
		self
	}

	pub fn get<F>(self, path: &'static str, handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static,
	{
		self.add_route(Some(hyper::Method::GET), path, handler)
	}

	pub fn post<F>(self, path: &'static str, handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static,
	{
		self.add_route(Some(hyper::Method::POST), path, handler)
	}

	pub fn options<F>(self, path: &'static str, handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static,
	{
		self.add_route(Some(hyper::Method::OPTIONS), path, handler)
	}

	pub fn any<F>(self, path: &'static str, handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static,
	{
		self.add_route(None, path, handler)
	}

	pub fn add_route<F>(
		mut self,
		method: Option<hyper::Method>,
		path: &'static str,
		handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static,
	) -> Self
	where
		F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static,
	{
		self.items
			.push((path, Item::Route(method, Box::new(move |req| Box::pin(handler(req))))));
		self
	}

	pub fn scope(mut self, path: &'static str, router: RouterBuilder<I, O, E>) -> Self {
		self.items.push((path, Item::Scope(router)));
		self
	}

	/// Serves requests that match no path. Only honoured on the root builder,
	/// where it runs behind the root middleware.
	pub fn not_found<F>(mut self, handler: impl Fn(hyper::Request<I>) -> F + Send + Sync + 'static) -> Self
	where
		F: Future<Output = Result<hyper::Response<O>, E>> + Send + 'static,
	{
		self.fallback = Some(Box::new(move |req| Box::pin(handler(req))));
		self
	}

	pub fn build(mut self) -> Router<I, O, E> {
		let mut router = Router {
			tree: path_tree::PathTree::new(),
			endpoints: Vec::new(),
			handlers: Vec::new(),
			pre_middleware: Vec::new(),
			post_middleware: Vec::new(),
			error_handlers: Vec::new(),
			fallback: None,
		};

		let fallback = self.fallback.take();
		let scope = self.build_scoped("", &mut router, &[], &[], None, &mut HashMap::new());

		router.fallback = fallback.map(|handler| {
			router.handlers.push(handler);
			RouteInfo {
				handler: router.handlers.len() - 1,
				..scope
			}
		});

		router
	}

	/// Flattens this scope into `router` and returns the middleware and error
	/// handler indexes that apply at this level.
	fn build_scoped(
		self,
		parent_path: &str,
		router: &mut Router<I, O, E>,
		parent_pre: &[usize],
		parent_post: &[usize],
		parent_error_handler: Option<usize>,
		paths: &mut HashMap<String, usize>,
	) -> RouteInfo {
		let error_handler = match self.error_handler {
			Some(handler) => {
				router.error_handlers.push(handler);
				Some(router.error_handlers.len() - 1)
			}
			None => parent_error_handler,
		};

		let mut pre_middleware = parent_pre.to_vec();
		for handler in self.pre_middleware {
			router.pre_middleware.push(handler);
			pre_middleware.push(router.pre_middleware.len() - 1);
		}

		let mut post_middleware = parent_post.to_vec();
		for handler in self.post_middleware {
			router.post_middleware.push(handler);
			post_middleware.push(router.post_middleware.len() - 1);
		}

		for (path, item) in self.items {
			let full_path = join_paths(parent_path, path);

			match item {
				Item::Route(method, handler) => {
					router.handlers.push(handler);

					let info = RouteInfo {
						handler: router.handlers.len() - 1,
						pre_middleware: pre_middleware.clone(),
						post_middleware: post_middleware.clone(),
						error_handler,
					};

					let idx = *paths.entry(full_path.clone()).or_insert_with(|| {
						router.endpoints.push(Endpoint::default());
						let idx = router.endpoints.len() - 1;
						let _ = router.tree.insert(&full_path, idx);
						idx
					});

					tracing::debug!(path = %full_path, method = ?method, "adding route");

					router.endpoints[idx].routes.push((method, info));
				}
				Item::Scope(scope) => {
					scope.build_scoped(&full_path, router, &pre_middleware, &post_middleware, error_handler, paths);
				}
			}
		}

		RouteInfo {
			handler: 0,
			pre_middleware,
			post_middleware,
			error_handler,
		}
	}
}

fn join_paths(parent: &str, path: &str) -> String {
	let segments = [parent.trim_matches('/'), path.trim_matches('/')];
	let joined = segments.iter().filter(|s| !s.is_empty()).copied().collect::<Vec<_>>().join("/");
	format!("/{joined}")
}
