use std::net::SocketAddr;

use anyhow::Result;
use common::config::{DatabaseConfig, LoggingConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// The API serves user profiles and their social graph
pub struct AppConfig {
	/// The path to the config file
	pub config_file: Option<String>,

	/// Name of this instance
	pub name: String,

	///  The logging config
	pub logging: LoggingConfig,

	/// API Config
	pub api: ApiConfig,

	/// Database Config
	pub database: DatabaseConfig,

	/// Session Config
	pub session: SessionConfig,

	/// Public site Config
	pub app: SiteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Bind address for the API
	pub bind_address: SocketAddr,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			bind_address: "[::]:3000".parse().expect("failed to parse bind address"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
	/// Secret the session tokens are signed with
	pub secret: String,

	/// Issuer the session tokens must carry
	pub issuer: String,

	/// Cookie checked for a token when there is no Authorization header
	pub cookie_name: String,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			secret: "curiously".to_string(),
			issuer: "curiously".to_string(),
			cookie_name: "curiously_session".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
	/// Public base URL, used for the social graph calls and for link previews
	pub url: String,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			url: "http://localhost:3000".to_string(),
		}
	}
}

impl SiteConfig {
	pub fn base_url(&self) -> &str {
		self.url.trim_end_matches('/')
	}
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			config_file: Some("config.toml".to_string()),
			name: "curiously-api".to_string(),
			logging: LoggingConfig::default(),
			api: ApiConfig::default(),
			database: DatabaseConfig {
				uri: "postgres://localhost:5432/curiously".to_string(),
			},
			session: SessionConfig::default(),
			app: SiteConfig::default(),
		}
	}
}

impl AppConfig {
	pub fn parse() -> Result<Self> {
		let (mut config, config_file) =
			common::config::parse::<Self>(!cfg!(test), "CURIOUSLY", Self::default().config_file)?;

		config.config_file = config_file;

		Ok(config)
	}
}
