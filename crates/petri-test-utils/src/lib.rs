//! Test utilities and engine doubles for Petri editor development.
//!
//! Provides a scripted [`SimulationEngine`](petri_engine::SimulationEngine)
//! implementation ([`ScriptedEngine`]) with per-operation call counting,
//! fixture nets, and seeded random nets for property and benchmark use.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod engine;
pub mod fixtures;
pub mod random;

pub use engine::{CallCounts, Gate, ScriptedEngine};
pub use fixtures::{chain_net, consumer_net, pnml_document};
pub use random::random_net;
