use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use common::context::Context;
use common::{logging, signal};
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use tokio::{select, time};

mod api;
mod config;
mod database;
mod global;
mod profile;


#[tokio::main]
async fn main() -> Result<()> {
	let config = config::AppConfig::parse()?;

	logging::init(&config.logging.level, config.logging.mode)?;

	if let Some(file) = &config.config_file {
		tracing::info!(file = file, "loaded config from file");
	}

	tracing::debug!("config: {:#?}", config);

	let db = Arc::new(
		sqlx::PgPool::connect_with(
			PgConnectOptions::from_str(&config.database.uri)
				.context("invalid database uri")?
				.disable_statement_logging()
				.to_owned(),
		)
		.await
		.context("failed to connect to database")?,
	);

	tracing::info!("connected to database");

	let http_client = reqwest::Client::builder()
		.user_agent(config.name.as_str())
		.build()
		.context("failed to build http client")?;

	let (ctx, handler) = Context::new();

	let global = Arc::new(global::GlobalState::new(config, db, http_client, ctx));

	let api_future = tokio::spawn(api::run(global.clone()));

	let mut signal_handler = signal::SignalHandler::shutdown().context("failed to register signal handlers")?;

	select! {
		r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
		kind = signal_handler.recv() => tracing::info!(signal = ?kind, "shutting down"),
	}

	// A context still held here would keep the handler from finishing.
	drop(global);

	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = handler.cancel() => tracing::info!("shutting down"),
	}

	Ok(())
}
