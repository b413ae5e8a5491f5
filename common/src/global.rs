//! Capability traits a service's shared state implements. Handlers bound on
//! the capabilities they use, so tests can swap in an in-memory state.

use std::sync::Arc;

use crate::context::Context;
use crate::database::Pool;

/// The process context, cancelled on shutdown.
pub trait GlobalCtx {
	fn ctx(&self) -> &Context;
}

/// Hands out one section of the service config.
pub trait GlobalConfigProvider<Section> {
	fn provide_config(&self) -> &Section;
}

/// `global.config::<SomeSection>()` for any state providing that section.
pub trait GlobalConfig {
	#[inline(always)]
	fn config<Section>(&self) -> &Section
	where
		Self: GlobalConfigProvider<Section>,
	{
		<Self as GlobalConfigProvider<Section>>::provide_config(self)
	}
}

pub trait GlobalDb {
	fn db(&self) -> &Arc<Pool>;
}

/// Client for outgoing HTTP calls, shared so connections are pooled.
pub trait GlobalHttp {
	fn http_client(&self) -> &reqwest::Client;
}
