//! Simulation control for the Petri net editor.
//!
//! The firing rule and reachability analysis live in an external engine
//! reached through [`SimulationEngine`]. This crate sequences the calls:
//! [`SimulationController`] runs sessions on a dedicated thread and
//! reports progress as [`SimulationEvent`]s, [`ReachabilityQueryHandler`]
//! issues property checks, and [`Editor`] ties both to a
//! [`NetModel`](petri_core::NetModel).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
mod continuation;
pub mod controller;
pub mod editor;
pub mod event;
pub mod reachability;
pub mod rpc;

pub use config::{ConfigError, ControllerConfig, DEFAULT_BATCH_SIZE};
pub use controller::SimulationController;
pub use editor::Editor;
pub use event::{SimState, SimulationEvent};
pub use reachability::{
    format_count, Boundedness, Count, QueryError, ReachabilityQueryHandler, RgSummary, Verdict,
};
pub use rpc::{
    ContinueRequest, DeadlineEngine, EngineError, NetRequest, RgResponse, SimulationEngine,
    SimulationResponse, StartRequest,
};
