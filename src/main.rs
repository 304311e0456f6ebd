//! Main entry point for the mintsniff launch watcher.
//!
//! Wires the program-log feed, the bounded queue, the rate-limited
//! resolution worker and the flat-file sink together.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use mintsniff::pipeline::{
    LaunchLog, PipelineConfig, PipelineController, RpcMintInfoSource, RpcTransactionSource,
};
use mintsniff::report;
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcTransactionLogsConfig, RpcTransactionLogsFilter};
use solana_sdk::commitment_config::CommitmentConfig;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let mut config = PipelineConfig::default();
    if let Ok(url) = std::env::var("RPC_HTTP_URL") {
        config.rpc_http_url = url;
    }
    if let Ok(url) = std::env::var("RPC_WS_URL") {
        config.rpc_ws_url = url;
    }

    info!("Starting mintsniff launch watcher");

    let rpc = Arc::new(RpcClient::new(config.rpc_http_url.clone()));
    let tx_source = Arc::new(RpcTransactionSource::new(Arc::clone(&rpc)));
    let sink = Arc::new(LaunchLog::new(config.log_path.clone()));
    let controller = PipelineController::start(&config, tx_source, sink.clone())?;

    let pubsub = PubsubClient::new(&config.rpc_ws_url)
        .await
        .context("Failed to connect launch feed")?;
    let (mut logs, _unsubscribe) = pubsub
        .logs_subscribe(
            RpcTransactionLogsFilter::Mentions(vec![config.watched_program.clone()]),
            RpcTransactionLogsConfig {
                commitment: Some(CommitmentConfig::confirmed()),
            },
        )
        .await
        .context("Failed to subscribe to program logs")?;

    info!("Watching program {} for launches", config.watched_program);

    loop {
        tokio::select! {
            maybe_log = logs.next() => {
                match maybe_log {
                    Some(response) => {
                        let slot = response.context.slot;
                        let value = response.value;
                        // Duplicates and gaps from the feed are tolerated;
                        // only successful Create instructions count as launches.
                        if value.err.is_none()
                            && value.logs.iter().any(|l| l.contains("Instruction: Create"))
                        {
                            controller.feed(value.signature, slot);
                        }
                    }
                    None => {
                        warn!("Launch feed closed");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, shutting down");
                break;
            }
        }
    }

    controller.shutdown().await;

    // Score everything captured this session and leave a report next to
    // the launch log.
    match sink.read_all().await {
        Ok(records) if !records.is_empty() => {
            let mint_source = RpcMintInfoSource::new(rpc);
            let rows = report::assess_all(records, Some(&mint_source)).await;
            let report_path = config.log_path.with_extension("csv");
            match report::write_report(&report_path, &rows).await {
                Ok(()) => info!("Risk report written to {}", report_path.display()),
                Err(e) => warn!("Failed to write risk report: {:#}", e),
            }
        }
        Ok(_) => info!("No launches recorded this session"),
        Err(e) => warn!("Could not read launch log for report: {:#}", e),
    }

    Ok(())
}
