use std::sync::Arc;
use std::time::Duration;

use common::context::Handler;
use common::prelude::FutureTimeout;
use tokio::task::JoinHandle;

use crate::api;
use crate::tests::global::{mock_config, mock_global_state, MockData, MockGlobal};

mod auth;
mod page;

/// The API bound on a free local port, backed by [`MockGlobal`].
pub struct TestServer {
	pub global: Arc<MockGlobal>,
	pub client: reqwest::Client,
	pub base: String,
	handler: Handler,
	handle: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
	pub async fn start(data: MockData) -> Self {
		let port = portpicker::pick_unused_port().expect("failed to pick port");
		let (global, handler) = mock_global_state(mock_config(port), data);

		let handle = tokio::spawn(api::run(global.clone()));

		// We need to wait for the server to start
		tokio::time::sleep(Duration::from_millis(300)).await;

		Self {
			global,
			client: reqwest::Client::new(),
			base: format!("http://127.0.0.1:{port}"),
			handler,
			handle,
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base, path)
	}

	pub async fn shutdown(self) {
		// The client uses Keep-Alive, so we need to drop it to release the global context
		drop(self.global);
		drop(self.client);

		self.handler
			.cancel()
			.timeout(Duration::from_secs(1))
			.await
			.expect("failed to cancel context");

		self.handle
			.timeout(Duration::from_secs(1))
			.await
			.expect("api did not stop")
			.expect("api task panicked")
			.expect("api returned an error");
	}
}
