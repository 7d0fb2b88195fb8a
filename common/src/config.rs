use std::time::Duration;

use crate::network::range::NetworkRange;

pub const DEFAULT_NETWORK: &str = "10.0.0.0/8";
pub const DEFAULT_PORT: u16 = 80;
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);
/// Fixed so that every run walks the same address sequence.
pub const DEFAULT_SEED: u64 = 1;

pub struct Config {
    /// Block the random targets are drawn from.
    pub network: NetworkRange,
    /// TCP port every probe connects to.
    pub port: u16,
    /// Deadline for a single probe, connect through body drain.
    pub timeout: Duration,
    pub seed: u64,
}

impl Config {
    pub fn new(network: NetworkRange) -> Self {
        Self {
            network,
            port: DEFAULT_PORT,
            timeout: PROBE_TIMEOUT,
            seed: DEFAULT_SEED,
        }
    }
}
