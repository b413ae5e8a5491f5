use std::panic::Location;
use std::sync::{Arc, Weak};

use http::StatusCode;

use super::RouteError;

pub trait ResultExt<T, E, E2>: Sized {
	/// Replaces the error with the response described by `ctx`, keeping the
	/// original error as the source.
	fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
	where
		RouteError<E2>: From<C>,
		E2: From<E>;

	fn into_err_route(self) -> Result<T, RouteError<E2>>
	where
		RouteError<E2>: From<E>;
}

impl<T, E, E2> ResultExt<T, E, E2> for Result<T, E> {
	#[track_caller]
	fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E2>>
	where
		RouteError<E2>: From<C>,
		E2: From<E>,
	{
		self.map_err(|err| {
			RouteError::from(ctx)
				.with_source(Some(err.into()))
				.with_location(Location::caller())
		})
	}

	#[track_caller]
	fn into_err_route(self) -> Result<T, RouteError<E2>>
	where
		RouteError<E2>: From<E>,
	{
		self.map_err(|err| RouteError::from(err).with_location(Location::caller()))
	}
}

pub trait OptionExt<T, E>: Sized {
	fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E>>
	where
		RouteError<E>: From<C>;
}

impl<T, E> OptionExt<T, E> for Option<T> {
	#[track_caller]
	fn map_err_route<C>(self, ctx: C) -> Result<T, RouteError<E>>
	where
		RouteError<E>: From<C>,
	{
		self.ok_or_else(|| RouteError::from(ctx).with_location(Location::caller()))
	}
}

pub trait RequestGlobalExt<E> {
	/// Upgrades the global state the router was built with. Fails once the
	/// process started shutting down and the state was dropped.
	fn get_global<G: Send + Sync + 'static>(&self) -> Result<Arc<G>, RouteError<E>>;
}

impl<E, B> RequestGlobalExt<E> for hyper::Request<B> {
	#[track_caller]
	fn get_global<G: Send + Sync + 'static>(&self) -> Result<Arc<G>, RouteError<E>> {
		self.extensions()
			.get::<Weak<G>>()
			.and_then(Weak::upgrade)
			.map_err_route((StatusCode::INTERNAL_SERVER_ERROR, "failed to upgrade global state"))
	}
}
