use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Layer, Registry};

static RELOAD_HANDLE: OnceCell<reload::Handle<EnvFilter, Registry>> = OnceCell::new();

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	#[default]
	Default,
	Json,
	Pretty,
	Compact,
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
	#[error("invalid log level: {0}")]
	InvalidLevel(#[from] tracing_subscriber::filter::ParseError),
	#[error("failed to init logger: {0}")]
	Init(#[from] tracing_subscriber::util::TryInitError),
	#[error("failed to reload logger: {0}")]
	Reload(#[from] reload::Error),
}

/// Installs the global subscriber on the first call. Later calls only swap
/// the filter, the output mode chosen first stays in place.
pub fn init(level: &str, mode: Mode) -> Result<(), LoggingError> {
	let filter = EnvFilter::from_str(level)?;

	if let Some(handle) = RELOAD_HANDLE.get() {
		handle.reload(filter)?;
		return Ok(());
	}

	RELOAD_HANDLE.get_or_try_init(|| {
		let (filter, handle) = reload::Layer::new(filter);

		let output = fmt::layer().with_file(true).with_line_number(true);
		let output = match mode {
			Mode::Default => output.boxed(),
			Mode::Json => output.json().boxed(),
			Mode::Pretty => output.pretty().boxed(),
			Mode::Compact => output.compact().boxed(),
		};

		tracing_subscriber::registry().with(filter).with(output).try_init()?;

		Ok::<_, LoggingError>(handle)
	})?;

	tracing::trace!(level, ?mode, "logging initialized");

	Ok(())
}
