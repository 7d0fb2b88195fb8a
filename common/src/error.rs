use thiserror::Error;

/// Startup-time configuration failures. Always fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid CIDR address: {0}")]
    InvalidCidr(String),
    #[error("invalid prefix length: {0}")]
    InvalidPrefix(String),
    #[error("only IPv4 supported: {0}")]
    NotIpv4(String),
}
