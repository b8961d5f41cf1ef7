use std::path::PathBuf;

use anyhow::Result;
use config::{DaemonConfig, DaemonOptions};
use engine::{actor::EngineActor, Engine};
use server::RequestServer;
use sink::{HttpSink, SummarySink};
use storage::{file_store::FileStore, state::StateStore};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::utils::clock::{Clock, DefaultClock};

pub mod args;
pub mod config;
pub mod engine;
pub mod protocol;
pub mod server;
pub mod shutdown;
pub mod sink;
pub mod storage;

/// Represents the starting point for the daemon
pub async fn start_daemon(app_dir: PathBuf, options: &DaemonOptions) -> Result<()> {
    std::env::set_current_dir("/")?;

    let config = DaemonConfig::new(app_dir, options);
    info!("Starting daemon with {config:?}");

    let shutdown_token = CancellationToken::new();
    let engine = create_engine(&config, DefaultClock).await?;
    let (actor, handle) = EngineActor::new(engine, config.tick_interval, shutdown_token.clone());
    let server = RequestServer::bind(config.listen).await?;

    let (_, _, server_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token.clone()),
        actor.run(),
        async {
            let result = server.run(handle, shutdown_token.clone()).await;
            // Without a server nobody can reach the engine, so take everything down.
            shutdown_token.cancel();
            result
        },
    );

    if let Err(server_result) = server_result {
        error!("Request server got an error {:?}", server_result);
    }

    Ok(())
}

async fn create_engine(config: &DaemonConfig, clock: impl Clock) -> Result<Engine> {
    let storage = FileStore::new(config.state_dir.clone())?;
    let sink = match &config.sink_url {
        Some(url) => Some(Box::new(HttpSink::new(url.clone())?) as Box<dyn SummarySink>),
        None => None,
    };
    let engine = Engine::start(StateStore::new(Box::new(storage)), Box::new(clock), sink).await?;
    Ok(engine)
}
