//! Deterministic target selection.
//!
//! The generator is seeded with a fixed value so two runs over the same range
//! visit the same addresses in the same order.

use std::net::Ipv4Addr;

use prober_common::network::range::NetworkRange;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct AddressGenerator {
    range: NetworkRange,
    rng: StdRng,
}

impl AddressGenerator {
    pub fn new(range: NetworkRange, seed: u64) -> Self {
        Self {
            range,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws one offset in `[0, address_space_size)` and maps it into the range.
    pub fn next_candidate(&mut self) -> Ipv4Addr {
        let offset: u64 = self.rng.random_range(0..self.range.address_space_size());
        self.range.candidate(offset)
    }
}

impl Iterator for AddressGenerator {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_candidate())
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
