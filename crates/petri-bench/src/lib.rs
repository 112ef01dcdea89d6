//! Benchmark profiles for the Petri net editor core.
//!
//! - [`reference_net`]: 100 places × 100 transitions, sparse
//! - [`dense_net`]: 40 × 40 with every pair connected about half the time

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use petri_core::Net;
use petri_test_utils::random_net;

/// Place and transition count of [`reference_net`].
pub const REFERENCE_SIZE: usize = 100;

/// A sparse net the size of a large hand-drawn model.
///
/// Each (place, transition) pair gets an input and an output arc with
/// probability 0.03, so a transition has about three of each.
pub fn reference_net(seed: u64) -> Net {
    random_net(seed, REFERENCE_SIZE, REFERENCE_SIZE, 0.03)
}

/// A small but heavily connected net.
pub fn dense_net(seed: u64) -> Net {
    random_net(seed, 40, 40, 0.5)
}
