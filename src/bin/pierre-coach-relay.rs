// ABOUTME: Relay server binary for the Pierre mobile app
// ABOUTME: Initialises logging, loads configuration, wires external services, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pierre Coach Relay Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use pierre_coach_relay::{
    config::{load_dotenv, ServerConfig},
    logging,
    server::{serve, ServerResources},
};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "pierre-coach-relay")]
#[command(about = "Pierre Coach Relay - session ingestion and coaching answers for the mobile app")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logging settings may come from .env, and config loading logs
    let dotenv = load_dotenv();
    logging::init_from_env()?;
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => warn!("No .env file found or failed to load: {e}"),
    }
    info!("Starting Pierre Coach Relay");

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(config)?);

    if let Err(e) = serve(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}
