use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A cancellable handle to the lifetime of the process (or of a part of it).
///
/// Every clone keeps the owning [`Handler`] from finishing, so a handler can
/// cancel the context and then wait for all tasks holding it to let go.
#[derive(Clone, Debug)]
pub struct Context {
	token: CancellationToken,
	_alive: mpsc::Sender<()>,
}

#[derive(Debug)]
pub struct Handler {
	token: CancellationToken,
	alive: mpsc::Receiver<()>,
}

impl Context {
	#[must_use]
	pub fn new() -> (Self, Handler) {
		Self::from_token(CancellationToken::new())
	}

	/// Creates a context that is cancelled together with `self`, but that can
	/// also be cancelled on its own through the returned handler.
	#[must_use]
	pub fn child(&self) -> (Self, Handler) {
		Self::from_token(self.token.child_token())
	}

	fn from_token(token: CancellationToken) -> (Self, Handler) {
		let (alive_send, alive_recv) = mpsc::channel(1);

		(
			Self {
				token: token.clone(),
				_alive: alive_send,
			},
			Handler { token, alive: alive_recv },
		)
	}

	pub async fn done(&self) {
		self.token.cancelled().await
	}

	pub fn is_done(&self) -> bool {
		self.token.is_cancelled()
	}
}

impl Handler {
	/// Resolves once every [`Context`] created with this handler is dropped.
	pub async fn done(&mut self) {
		// Nothing is ever sent, `recv` only returns once all senders are gone.
		while self.alive.recv().await.is_some() {}
	}

	pub async fn cancel(mut self) {
		self.token.cancel();
		self.done().await;
	}
}
