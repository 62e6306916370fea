// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Chartroom saved-query server binary.

use std::path::PathBuf;

use chartroom_server::{create_app_state, create_router, version};
use chartroom_server_config::{LogFormat, ServerConfig};
use clap::{Parser, Subcommand};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Chartroom server - saved queries guarded by team roles.
#[derive(Parser, Debug)]
#[command(
	name = "chartroom-server",
	about = "Chartroom saved-query server",
	version
)]
struct Args {
	/// Config file to use instead of /etc/chartroom/server.toml
	#[arg(long, global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Show version and build information
	Version,
}

fn init_tracing(config: &ServerConfig) {
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| config.logging.level.clone().into());

	let (json, text) = match config.logging.format {
		LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json()), None),
		LogFormat::Text => (None, Some(tracing_subscriber::fmt::layer())),
	};

	tracing_subscriber::registry()
		.with(filter)
		.with(json)
		.with(text)
		.init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => chartroom_server_config::load_config_with_file(path)?,
		None => chartroom_server_config::load_config()?,
	};

	init_tracing(&config);

	tracing::info!(
			host = %config.http.host,
			port = config.http.port,
			database = %config.database.url,
			environment = %config.auth.environment,
			"starting chartroom-server"
	);

	let pool = chartroom_server_db::create_pool(&config.database.url).await?;
	chartroom_server_db::run_migrations(&pool).await?;

	let state = create_app_state(pool.clone(), &config)?;

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);
	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	pool.close().await;
	tracing::info!("Server shutdown complete");
	Ok(())
}
