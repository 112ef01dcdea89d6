//! Plain data types for places, transitions, and arcs.
//!
//! These carry no rendering state. A canvas adapter observes the
//! [`NetModel`](crate::NetModel) and draws whatever it finds here.

use crate::id::ElementId;

/// A point on the editor canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This position moved by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A place holding a non-negative number of tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    /// Stable identity.
    pub id: ElementId,
    /// Canvas position.
    pub position: Position,
    /// Current token count (the place's marking component).
    pub tokens: u32,
    /// Free-text annotation.
    pub info_text: String,
    /// Display name, e.g. `p3`.
    pub name: String,
}

impl Place {
    /// A place with no tokens, no annotation, and no name.
    pub fn new(id: ElementId, position: Position) -> Self {
        Self {
            id,
            position,
            tokens: 0,
            info_text: String::new(),
            name: String::new(),
        }
    }

    /// Builder-style token count.
    pub fn with_tokens(mut self, tokens: u32) -> Self {
        self.tokens = tokens;
        self
    }
}

/// A transition.
///
/// `heat` is transient: it is written only when simulation events are
/// applied and is never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Stable identity.
    pub id: ElementId,
    /// Canvas position.
    pub position: Position,
    /// Free-text annotation.
    pub info_text: String,
    /// Display name, e.g. `t1`.
    pub name: String,
    /// Relative firing frequency of the last simulation batch, in `0.0..=1.0`.
    pub heat: Option<f64>,
}

impl Transition {
    /// A transition with no annotation and no name.
    pub fn new(id: ElementId, position: Position) -> Self {
        Self {
            id,
            position,
            info_text: String::new(),
            name: String::new(),
            heat: None,
        }
    }
}

/// Direction of an arc relative to its transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArcDirection {
    /// Place → Transition: the transition consumes from the place.
    Input,
    /// Transition → Place: the transition produces into the place.
    Output,
}

/// A weighted arc joining a place and a transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
    /// Stable identity.
    pub id: ElementId,
    /// Source endpoint.
    pub from: ElementId,
    /// Target endpoint.
    pub to: ElementId,
    /// Number of tokens moved per firing. Always at least 1.
    pub weight: u32,
    /// Free-text annotation.
    pub info_text: String,
}

impl Arc {
    /// An arc of weight 1.
    pub fn new(id: ElementId, from: ElementId, to: ElementId) -> Self {
        Self {
            id,
            from,
            to,
            weight: 1,
            info_text: String::new(),
        }
    }

    /// Builder-style weight. Zero is raised to 1.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight.max(1);
        self
    }

    /// Whether `id` is one of this arc's endpoints.
    pub fn touches(&self, id: &ElementId) -> bool {
        &self.from == id || &self.to == id
    }
}

/// Parse a token count typed into a label, keeping only its digits.
///
/// `"1a2"` becomes 12 and text without digits becomes 0. Values that
/// overflow saturate at `u32::MAX`.
pub fn parse_token_text(text: &str) -> u32 {
    digits_value(text).unwrap_or(0)
}

/// Parse an arc weight typed into a label, keeping only its digits.
///
/// Text without digits, or with value 0, yields the minimum weight 1.
pub fn parse_weight_text(text: &str) -> u32 {
    digits_value(text).unwrap_or(1).max(1)
}

fn digits_value(text: &str) -> Option<u32> {
    let mut value: Option<u32> = None;
    for d in text.chars().filter_map(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d));
    }
    value
}
