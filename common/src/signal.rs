use std::future::poll_fn;
use std::io;
use std::task::Poll;

use tokio::signal::unix::{signal, Signal, SignalKind};

/// Waits on several unix signals at once and reports which one arrived.
#[derive(Debug, Default)]
pub struct SignalHandler {
	signals: Vec<(SignalKind, Signal)>,
}

impl SignalHandler {
	pub fn new() -> Self {
		Self::default()
	}

	/// SIGINT and SIGTERM, the signals asking the service to stop.
	pub fn shutdown() -> io::Result<Self> {
		Self::new()
			.with_signal(SignalKind::interrupt())?
			.with_signal(SignalKind::terminate())
	}

	pub fn with_signal(mut self, kind: SignalKind) -> io::Result<Self> {
		self.signals.push((kind, signal(kind)?));
		Ok(self)
	}

	/// The next signal received. Pending forever when nothing is registered.
	pub async fn recv(&mut self) -> SignalKind {
		poll_fn(|cx| {
			for (kind, signal) in &mut self.signals {
				if let Poll::Ready(Some(())) = signal.poll_recv(cx) {
					return Poll::Ready(*kind);
				}
			}

			Poll::Pending
		})
		.await
	}
}
