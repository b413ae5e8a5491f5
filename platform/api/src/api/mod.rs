use std::convert::Infallible;
use std::sync::Arc;

use common::http::router::{Router, RouterError};
use common::http::RouteError;
use common::make_response;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use self::error::ApiError;
use crate::config::ApiConfig;
use crate::global::ApiGlobal;

pub mod auth;
pub mod error;
pub mod ext;
pub mod health;
pub mod jwt;
pub mod middleware;
pub mod page;
pub mod social;

pub use common::http::Body;

pub fn routes<G: ApiGlobal>(global: &Arc<G>) -> Router<Incoming, Body, RouteError<ApiError>> {
	let weak = Arc::downgrade(global);
	Router::builder()
		.data(weak)
		// Lets handlers and middleware add headers to the response
		.middleware(middleware::response_headers::pre_flight_middleware(global))
		.middleware(middleware::response_headers::post_flight_middleware(global))
		.middleware(middleware::cors::cors_middleware(global))
		// Resolves the viewer, never fails the request
		.middleware(middleware::auth::auth_middleware(global))
		.scope(
			"/api",
			Router::builder()
				.get("/health", health::health)
				.options("/health", middleware::cors::preflight)
				.get("/:username/following", social::following::<G, _>)
				.options("/:username/following", middleware::cors::preflight)
				.get("/:username/followers", social::followers::<G, _>)
				.options("/:username/followers", middleware::cors::preflight),
		)
		.get("/:username", page::profile::<G, _>)
		.options("/:username", middleware::cors::preflight)
		.error_handler(common::http::error_handler::<ApiError>)
		.not_found(|_| async move {
			Ok(make_response!(
				StatusCode::NOT_FOUND,
				json!({
					"error": "not_found",
				})
			))
		})
		.build()
}

pub async fn run<G: ApiGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<ApiConfig>();

	tracing::info!("listening on {}", config.bind_address);
	let socket = if config.bind_address.is_ipv6() {
		TcpSocket::new_v6()?
	} else {
		TcpSocket::new_v4()?
	};

	socket.set_reuseaddr(true)?;
	socket.bind(config.bind_address)?;
	let listener = socket.listen(1024)?;

	// The router only keeps a Weak reference to the global state, so open
	// keep-alive connections never hold off shutdown.
	let router = Arc::new(routes(&global));
	let service = service_fn(move |req| {
		let this = router.clone();
		async move { Ok::<_, Infallible>(this.handle(req).await.unwrap_or_else(router_error_response)) }
	});

	loop {
		select! {
			_ = global.ctx().done() => {
				return Ok(());
			},
			r = listener.accept() => {
				let (socket, addr) = r?;

				let service = service.clone();

				tracing::debug!("accepted connection from {}", addr);

				tokio::spawn(async move {
					if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(socket), service).await {
						tracing::debug!(error = %err, "connection closed with error");
					}
				});
			},
		}
	}
}

/// The router only fails on paths it cannot route or decode, every other
/// error went through the error handler already.
fn router_error_response(err: RouterError<RouteError<ApiError>>) -> hyper::Response<Body> {
	match err {
		RouterError::NotFound => make_response!(StatusCode::NOT_FOUND, json!({ "error": "not_found" })),
		RouterError::MethodNotAllowed => {
			make_response!(StatusCode::METHOD_NOT_ALLOWED, json!({ "error": "method_not_allowed" }))
		}
		RouterError::InvalidParam(_) => make_response!(StatusCode::BAD_REQUEST, json!({ "error": "invalid_path" })),
		RouterError::Unhandled(err) => {
			tracing::error!(error = ?err, "unhandled error");
			err.response()
		}
	}
}
