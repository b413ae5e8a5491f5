use super::types::RouteParams;

pub trait RequestExt {
	fn params(&self) -> Option<&RouteParams>;

	fn param(&self, key: &str) -> Option<&str> {
		self.params()?
			.0
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	fn provide<T: Clone + Send + Sync + 'static>(&mut self, data: T);

	fn data<T: Send + Sync + 'static>(&self) -> Option<&T>;
}

impl<B> RequestExt for hyper::Request<B> {
	fn params(&self) -> Option<&RouteParams> {
		self.extensions().get::<RouteParams>()
	}

	fn provide<T: Clone + Send + Sync + 'static>(&mut self, data: T) {
		self.extensions_mut().insert(data);
	}

	fn data<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.extensions().get::<T>()
	}
}
