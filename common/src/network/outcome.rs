//! # Probe Outcomes
//!
//! The benign results of a single probe. Anything not representable here is
//! an unexpected error and is surfaced by the prober as an `Err`.

use std::fmt;
use std::io;

/// How a benign probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// A response arrived and its body was drained.
    Success,
    /// The TCP connection could not be established.
    Unreachable(DialFailure),
    /// The per-probe deadline elapsed first.
    Timeout,
    /// The surrounding cancellation scope fired first.
    Cancelled,
}

impl ProbeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Success => "success",
            ProbeOutcome::Unreachable(_) => "unreachable",
            ProbeOutcome::Timeout => "timeout",
            ProbeOutcome::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Unreachable(reason) => write!(f, "unreachable ({reason})"),
            other => f.write_str(other.label()),
        }
    }
}

/// Why a connection attempt failed. Every variant is benign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialFailure {
    Refused,
    Reset,
    HostUnreachable,
    NetworkUnreachable,
    TimedOut,
    Other(io::ErrorKind),
}

impl DialFailure {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => DialFailure::Refused,
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => DialFailure::Reset,
            io::ErrorKind::HostUnreachable => DialFailure::HostUnreachable,
            io::ErrorKind::NetworkUnreachable | io::ErrorKind::NetworkDown => {
                DialFailure::NetworkUnreachable
            }
            io::ErrorKind::TimedOut => DialFailure::TimedOut,
            kind => DialFailure::Other(kind),
        }
    }
}

impl fmt::Display for DialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialFailure::Refused => f.write_str("connection refused"),
            DialFailure::Reset => f.write_str("connection reset"),
            DialFailure::HostUnreachable => f.write_str("host unreachable"),
            DialFailure::NetworkUnreachable => f.write_str("network unreachable"),
            DialFailure::TimedOut => f.write_str("connect timed out"),
            DialFailure::Other(kind) => write!(f, "{kind}"),
        }
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
