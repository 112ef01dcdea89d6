//! Error types for net editing.
//!
//! Every rejected edit leaves the model untouched: the caller receives
//! the error as its "not created" sentinel and nothing is marked dirty.

use std::error::Error;
use std::fmt;

use crate::id::{ElementId, ElementKind};

/// Errors from structural and value edits on a [`NetModel`](crate::NetModel).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditError {
    /// An arc must join exactly one place and one transition.
    InvalidArcEndpoints {
        /// Kind of the `from` endpoint.
        from: ElementKind,
        /// Kind of the `to` endpoint.
        to: ElementKind,
    },
    /// An arc with the same endpoints and direction already exists.
    DuplicateArc {
        /// The arc already joining the two endpoints.
        existing: ElementId,
    },
    /// The referenced element does not exist in the net.
    UnknownElement {
        /// The identity that could not be resolved.
        id: ElementId,
    },
    /// An element with this identity already exists in the net.
    DuplicateId {
        /// The conflicting identity.
        id: ElementId,
    },
    /// The operation does not apply to this kind of element.
    WrongKind {
        /// The element the operation was applied to.
        id: ElementId,
        /// The element's actual kind.
        found: ElementKind,
    },
    /// Arc weights are at least 1.
    ZeroWeight,
    /// The net is locked by an active simulation.
    NetLocked,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArcEndpoints { from, to } => {
                write!(f, "an arc cannot join a {from} to a {to}")
            }
            Self::DuplicateArc { existing } => {
                write!(f, "an arc with the same direction already exists ({existing})")
            }
            Self::UnknownElement { id } => write!(f, "unknown element '{id}'"),
            Self::DuplicateId { id } => write!(f, "element id '{id}' is already in use"),
            Self::WrongKind { id, found } => {
                write!(f, "element '{id}' is a {found}, which does not support this edit")
            }
            Self::ZeroWeight => write!(f, "arc weight must be at least 1"),
            Self::NetLocked => write!(f, "net is locked while a simulation is active"),
        }
    }
}

impl Error for EditError {}
