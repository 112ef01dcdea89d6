//! Strongly-typed identifiers for nets and net elements.

use std::fmt;

use uuid::Uuid;

/// Identifies a place, transition, or arc within a net.
///
/// Identities are opaque strings. Freshly created elements receive a
/// UUID v4 rendered in its hyphenated form; imported elements keep
/// whatever identity the source file carried. Two elements of the same
/// net never share an identity, regardless of their kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(String);

impl ElementId {
    /// Allocate a fresh, globally unique identity.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ElementId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl From<&str> for ElementId {
    fn from(v: &str) -> Self {
        Self(v.to_owned())
    }
}

/// Identifies a net (the unit of persistence).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(String);

impl NetId {
    /// Allocate a fresh, globally unique net identity.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NetId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl From<&str> for NetId {
    fn from(v: &str) -> Self {
        Self(v.to_owned())
    }
}

/// The kind of a net element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A place (holds tokens).
    Place,
    /// A transition (consumes and produces tokens when it fires).
    Transition,
    /// A weighted arc between a place and a transition.
    Arc,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place => write!(f, "place"),
            Self::Transition => write!(f, "transition"),
            Self::Arc => write!(f, "arc"),
        }
    }
}
