//! Probe engine: deterministic target selection, the single-shot HTTP prober
//! and the loop that ties them together.

pub mod generator;
pub mod network;
pub mod probe_loop;
