use std::path::Path;

use clap::Parser;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::logging;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	pub level: String,

	/// What logging mode we should use
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
	/// The database URL to use
	pub uri: String,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			uri: "postgres://localhost:5432".to_string(),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	Io { path: String, source: std::io::Error },
	#[error("failed to parse config file {path}: {source}")]
	File { path: String, source: toml::de::Error },
	#[error("failed to serialize default config: {0}")]
	Defaults(#[from] toml::ser::Error),
	#[error("invalid override `{0}`, expected key.path=value")]
	Override(String),
	#[error("cannot set `{0}`, a parent key is not a table")]
	NotATable(String),
	#[error("invalid config: {0}")]
	Invalid(#[source] toml::de::Error),
	#[error("{0}")]
	Cli(#[from] clap::Error),
}

impl ConfigError {
	pub fn is_io(&self) -> bool {
		matches!(self, Self::Io { .. })
	}
}

#[derive(Debug, Default, Parser)]
struct CliArgs {
	/// Path to a TOML config file
	#[arg(long)]
	config_file: Option<String>,

	/// Override a config value, e.g. `--set api.bind_address=[::]:8080`
	#[arg(long = "set", value_name = "KEY=VALUE")]
	overrides: Vec<String>,
}

/// Layers the configuration sources, lowest priority first: the defaults of
/// `C`, the TOML config file, `{env_prefix}_*` environment variables and the
/// command line.
///
/// Environment keys use `__` to descend into tables, so
/// `CURIOUSLY_API__BIND_ADDRESS` sets `api.bind_address`. Returns the config
/// together with the path of the file that was loaded, if any.
pub fn parse<C: Serialize + DeserializeOwned + Default>(
	enable_cli: bool,
	env_prefix: &str,
	config_file: Option<String>,
) -> Result<(C, Option<String>), ConfigError> {
	let cli = if enable_cli { CliArgs::try_parse()? } else { CliArgs::default() };

	let env = env_overrides(env_prefix, std::env::vars());
	let env_config_file = env
		.iter()
		.find(|(key, _)| key == "config_file")
		.map(|(_, value)| value.clone());

	let mut table = match Value::try_from(C::default())? {
		Value::Table(table) => table,
		_ => Table::new(),
	};

	let explicit = cli.config_file.or(env_config_file);
	let explicit_provided = explicit.is_some();

	let mut loaded = None;
	if let Some(path) = explicit.or(config_file) {
		match read_file(&path) {
			Ok(file) => {
				merge(&mut table, file);
				loaded = Some(path);
			}
			Err(err) if err.is_io() && !explicit_provided => {
				tracing::debug!(error = %err, "skipping default config file");
			}
			Err(err) => return Err(err),
		}
	}

	for (key, raw) in env {
		let value = coerce_value(&table, &key, &raw);
		set_path(&mut table, &key, value)?;
	}

	for item in cli.overrides {
		let (key, raw) = item.split_once('=').ok_or_else(|| ConfigError::Override(item.clone()))?;
		let value = coerce_value(&table, key.trim(), raw.trim());
		set_path(&mut table, key.trim(), value)?;
	}

	let config = Value::Table(table).try_into().map_err(ConfigError::Invalid)?;

	Ok((config, loaded))
}

fn read_file(path: &str) -> Result<Table, ConfigError> {
	let contents = std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Io {
		path: path.to_string(),
		source,
	})?;

	toml::from_str(&contents).map_err(|source| ConfigError::File {
		path: path.to_string(),
		source,
	})
}

/// Collects `PREFIX_A__B=value` pairs as `("a.b", "value")`.
fn env_overrides(prefix: &str, vars: impl Iterator<Item = (String, String)>) -> Vec<(String, String)> {
	let prefix = format!("{}_", prefix.to_uppercase());

	let mut pairs = vars
		.filter_map(|(key, value)| {
			let key = key.strip_prefix(&prefix)?;
			(!key.is_empty()).then(|| (key.to_lowercase().replace("__", "."), value))
		})
		.collect::<Vec<_>>();

	// Parents before children, so `a=..` never clobbers a later `a.b=..`.
	pairs.sort_by(|a, b| a.0.cmp(&b.0));
	pairs
}

/// Interprets the raw text as a TOML value when it parses as one, `8080`,
/// `true` and `["a", "b"]` keep their type. Anything else is a string.
fn parse_value(raw: &str) -> Value {
	toml::from_str::<Table>(&format!("value = {raw}"))
		.ok()
		.and_then(|mut table| table.remove("value"))
		.unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Keeps `raw` as text when the key already holds a string, so a secret of
/// `123456` stays a string. Other keys go through [`parse_value`].
fn coerce_value(table: &Table, key: &str, raw: &str) -> Value {
	match lookup(table, key) {
		Some(Value::String(_)) => Value::String(raw.to_string()),
		_ => parse_value(raw),
	}
}

fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
	let (parents, last) = match key.rsplit_once('.') {
		Some((parents, last)) => (Some(parents), last),
		None => (None, key),
	};

	let mut current = table;
	for segment in parents.into_iter().flat_map(|p| p.split('.')) {
		current = current.get(segment)?.as_table()?;
	}

	current.get(last)
}

fn set_path(table: &mut Table, key: &str, value: Value) -> Result<(), ConfigError> {
	let mut segments = key.split('.').peekable();
	let mut current = table;

	while let Some(segment) = segments.next() {
		if segments.peek().is_none() {
			current.insert(segment.to_string(), value);
			return Ok(());
		}

		current = current
			.entry(segment.to_string())
			.or_insert_with(|| Value::Table(Table::new()))
			.as_table_mut()
			.ok_or_else(|| ConfigError::NotATable(key.to_string()))?;
	}

	Err(ConfigError::Override(key.to_string()))
}

fn merge(base: &mut Table, overlay: Table) {
	for (key, value) in overlay {
		match (base.get_mut(&key), value) {
			(Some(Value::Table(base)), Value::Table(overlay)) => merge(base, overlay),
			(_, value) => {
				base.insert(key, value);
			}
		}
	}
}
