//! gpsd-watch - print the report stream of a gpsd daemon

mod cli;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use gpsd_core::SessionBuilder;
use tracing::{info, warn};

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.debug)?;

    let session = SessionBuilder::new()
        .capacity(args.capacity)
        .connect(args.addr.as_str())
        .await
        .with_context(|| format!("failed to connect to gpsd at {}", args.addr))?;

    session
        .stream(args.watch_flags(), args.device_path())
        .await
        .context("failed to send WATCH command")?;

    let mut printed = 0usize;
    loop {
        tokio::select! {
            report = session.recv() => {
                let Some(report) = report else { break };
                println!("{}", output::render(&report)?);
                printed += 1;
                if args.count.is_some_and(|count| printed >= count) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    if let Err(e) = session.close().await {
        warn!("Error closing gpsd connection: {}", e);
    }

    match session.err() {
        Some(err) if !err.is_closed() => {
            Err(err).with_context(|| format!("gpsd stream ended after {} reports", printed))
        }
        _ => Ok(()),
    }
}
