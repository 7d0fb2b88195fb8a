use clap::Parser;
use prober_common::config::DEFAULT_NETWORK;

#[derive(Parser)]
#[command(name = "http-prober")]
#[command(version, about = "Sends HTTP GET probes to random addresses in a network.")]
pub struct CommandLine {
    /// Network space to probe
    #[arg(long, value_name = "CIDR", default_value = DEFAULT_NETWORK)]
    pub network: String,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
