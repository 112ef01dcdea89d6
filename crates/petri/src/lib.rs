//! Petri net editor core.
//!
//! This facade re-exports the editor's sub-crates. Most users only need
//! the [`prelude`].
//!
//! # Quick start
//!
//! ```rust
//! use petri::prelude::*;
//!
//! let mut model = NetModel::new();
//! let p = model.add_place(Position::new(0.0, 0.0)).unwrap();
//! let t = model.add_transition(Position::new(80.0, 0.0)).unwrap();
//! let a = model.add_arc(&p, &t).unwrap();
//! model.set_tokens(&p, 2).unwrap();
//! model.set_weight(&a, 2).unwrap();
//!
//! let matrix = derive_matrix(model.net(), &DescendingId);
//! assert_eq!(matrix.marking, vec![2]);
//! assert_eq!(matrix.pxt_out[0][0], 2);
//!
//! let json = export_str(model.net(), NetFormat::Native, &PnmlOptions::default()).unwrap();
//! let import = import_str(&json, NetFormat::Native, &PnmlOptions::default()).unwrap();
//! assert_eq!(import.nets[0].place(&p).unwrap().tokens, 2);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`model`] | `petri-core` | Identities, the net model, matrices, clipboard |
//! | [`engine`] | `petri-engine` | Engine contract, simulation controller, reachability, editor |
//! | [`codec`] | `petri-codec` | Native JSON and PNML persistence |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Net model and matrix derivation (`petri-core`).
pub use petri_core as model;

/// Simulation control against an external engine (`petri-engine`).
///
/// Implement [`engine::SimulationEngine`] for your transport and hand it
/// to an [`engine::Editor`].
pub use petri_engine as engine;

/// Persistence (`petri-codec`).
pub use petri_codec as codec;

/// Common imports for typical editor usage.
pub mod prelude {
    // Model
    pub use petri_core::{
        derive_matrix, Clipboard, DescendingId, EditError, ElementId, ElementKind, Net, NetId,
        NetMatrix, NetModel, Position,
    };

    // Simulation
    pub use petri_engine::{
        ControllerConfig, Editor, EngineError, QueryError, RgResponse, RgSummary, SimState,
        SimulationEngine, SimulationEvent,
    };

    // Persistence
    pub use petri_codec::{
        export_file, export_str, import_file, import_str, CodecError, Import, NetFormat,
        PnmlOptions, Warnings,
    };
}
