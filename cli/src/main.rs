mod commands;
mod terminal;

use std::process::ExitCode;

use anyhow::Context;
use commands::CommandLine;
use prober_common::config::Config;
use prober_common::network::range::NetworkRange;
use prober_core::network::http::ProbeError;
use prober_core::probe_loop::ProbeLoop;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::terminal::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    match run(commands).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = match e.downcast_ref::<ProbeError>() {
                Some(probe_err) => probe_err.kind(),
                None => "config".to_string(),
            };
            error!(kind = %kind, "{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(commands: CommandLine) -> anyhow::Result<()> {
    let network: NetworkRange = commands
        .network
        .parse()
        .with_context(|| format!("bad --network value '{}'", commands.network))?;
    info!("{network}");

    let cfg = Config::new(network);
    let probe_loop = ProbeLoop::new(&cfg);
    stop_on_interrupt(probe_loop.shutdown_token());

    probe_loop.run().await.context("unexpected probe error")?;
    Ok(())
}

fn stop_on_interrupt(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping");
            shutdown.cancel();
        }
    });
}
