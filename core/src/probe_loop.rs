//! The sequential probe loop.
//!
//! Each iteration draws one address, probes it inside its own cancellation
//! scope and either continues or hands the unexpected error back to the caller.

use std::fmt;

use prober_common::config::Config;
use prober_common::network::outcome::ProbeOutcome;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::generator::AddressGenerator;
use crate::network::http::{ProbeError, Prober};

/// Per-outcome counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub attempts: u64,
    pub success: u64,
    pub unreachable: u64,
    pub timeout: u64,
    pub cancelled: u64,
}

impl Tally {
    fn record(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Success => self.success += 1,
            ProbeOutcome::Unreachable(_) => self.unreachable += 1,
            ProbeOutcome::Timeout => self.timeout += 1,
            ProbeOutcome::Cancelled => self.cancelled += 1,
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} probes: {} success, {} unreachable, {} timeout, {} cancelled",
            self.attempts, self.success, self.unreachable, self.timeout, self.cancelled
        )
    }
}

pub struct ProbeLoop {
    generator: AddressGenerator,
    prober: Prober,
    shutdown: CancellationToken,
    tally: Tally,
}

impl ProbeLoop {
    pub fn new(cfg: &Config) -> Self {
        Self::with_parts(
            AddressGenerator::new(cfg.network, cfg.seed),
            Prober::from_config(cfg),
        )
    }

    pub fn with_parts(generator: AddressGenerator, prober: Prober) -> Self {
        Self {
            generator,
            prober,
            shutdown: CancellationToken::new(),
            tally: Tally::default(),
        }
    }

    /// Cancelling this token stops the loop after the in-flight probe.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Runs until shut down or until a probe fails unexpectedly.
    pub async fn run(mut self) -> Result<Tally, ProbeError> {
        while !self.shutdown.is_cancelled() {
            self.step().await?;
        }
        info!("stopped after {}", self.tally);
        Ok(self.tally)
    }

    /// One iteration: exactly one address drawn, exactly one probe attempt.
    pub async fn step(&mut self) -> Result<ProbeOutcome, ProbeError> {
        let scope = self.shutdown.child_token();
        let _release = scope.clone().drop_guard();

        let target = self.generator.next_candidate();
        self.tally.attempts += 1;

        let outcome = self.prober.probe(target, &scope).await?;
        debug!(%target, %outcome, "probe finished");
        self.tally.record(outcome);
        Ok(outcome)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
