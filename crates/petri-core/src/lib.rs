//! Core types for the Petri net editor.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! element identities, the net graph and its editable model, and the
//! derivation of incidence matrices handed to the simulation engine.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clipboard;
pub mod element;
pub mod error;
pub mod id;
pub mod matrix;
pub mod naming;
pub mod net;

pub use clipboard::{Clipboard, PASTE_OFFSET};
pub use element::{
    parse_token_text, parse_weight_text, Arc, ArcDirection, Place, Position, Transition,
};
pub use error::EditError;
pub use id::{ElementId, ElementKind, NetId};
pub use matrix::{derive_matrix, AscendingId, DescendingId, ElementOrdering, NetMatrix};
pub use naming::ElementNames;
pub use net::{Net, NetModel, NetSnapshot, Removed, DEFAULT_NET_TYPE};
