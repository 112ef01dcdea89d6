//! Reachability-graph property queries and their interpretation.
//!
//! Queries are stateless and independent of any simulation session: they
//! read a matrix and never touch the model.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use petri_core::NetMatrix;

use crate::rpc::{EngineError, NetRequest, RgResponse, SimulationEngine};

/// Message shown for unbounded nets when the engine gives none.
pub const UNBOUNDED_MESSAGE: &str = "net is unbounded";

/// Counts at or above this are shown in scientific notation.
const SCIENTIFIC_THRESHOLD: u64 = 10_000_000;

// ── Error types ─────────────────────────────────────────────────

/// A reachability query that produced no result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The engine call failed.
    Engine(EngineError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(e) => write!(f, "reachability graph generation failed: {e}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(e) => Some(e),
        }
    }
}

impl From<EngineError> for QueryError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

// ── Handler ─────────────────────────────────────────────────────

/// Issues `check_properties` calls.
pub struct ReachabilityQueryHandler {
    engine: Arc<dyn SimulationEngine>,
}

impl ReachabilityQueryHandler {
    /// Create a handler owning `engine`.
    pub fn new<E: SimulationEngine>(engine: E) -> Self {
        Self::with_shared(Arc::new(engine))
    }

    /// Create a handler around a shared engine.
    pub fn with_shared(engine: Arc<dyn SimulationEngine>) -> Self {
        Self { engine }
    }

    /// Build the reachability graph of `matrix` and report its properties.
    pub fn check(&self, matrix: &NetMatrix) -> Result<RgResponse, QueryError> {
        let request = NetRequest::from_matrix(matrix);
        match self.engine.check_properties(&request) {
            Ok(response) => {
                tracing::debug!(
                    states = response.states,
                    edges = response.edges,
                    bounded = response.bounded,
                    "reachability graph built"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(error = %e, "reachability query failed");
                Err(e.into())
            }
        }
    }
}

// ── Interpretation ──────────────────────────────────────────────

/// A count that may be infinite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Count {
    /// A finite count.
    Finite(u64),
    /// Unbounded; the reported value is meaningless.
    Infinite,
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(n) => f.write_str(&format_count(*n)),
            Self::Infinite => f.write_str("∞"),
        }
    }
}

/// A property that may be undecided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The property holds.
    Yes,
    /// The property does not hold.
    No,
    /// Not decidable from the response.
    Unknown,
}

impl From<bool> for Verdict {
    fn from(v: bool) -> Self {
        if v {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Whether the net is bounded, and by what.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundedness {
    /// No place ever holds more than `k` tokens.
    Bounded(u64),
    /// Some place can accumulate tokens without limit.
    Unbounded,
}

impl fmt::Display for Boundedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(k) => write!(f, "{k}"),
            Self::Unbounded => write!(f, "no"),
        }
    }
}

/// An [`RgResponse`] with the unbounded case made explicit.
///
/// For unbounded nets the engine's counts and verdicts carry no meaning,
/// so they are replaced by [`Count::Infinite`] and [`Verdict::Unknown`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgSummary {
    /// Reachable markings.
    pub states: Count,
    /// Reachability graph edges.
    pub edges: Count,
    /// Bound of the net.
    pub bounded: Boundedness,
    /// Liveness of every transition.
    pub liveness: Verdict,
    /// Reversibility.
    pub reversible: Verdict,
    /// Engine message, or [`UNBOUNDED_MESSAGE`] for silent unbounded results.
    pub message: String,
}

impl From<&RgResponse> for RgSummary {
    fn from(rg: &RgResponse) -> Self {
        if rg.bounded < 0 {
            let message = if rg.message.is_empty() {
                UNBOUNDED_MESSAGE.to_owned()
            } else {
                rg.message.clone()
            };
            return Self {
                states: Count::Infinite,
                edges: Count::Infinite,
                bounded: Boundedness::Unbounded,
                liveness: Verdict::Unknown,
                reversible: Verdict::Unknown,
                message,
            };
        }
        Self {
            states: Count::Finite(rg.states),
            edges: Count::Finite(rg.edges),
            bounded: Boundedness::Bounded(rg.bounded.unsigned_abs()),
            liveness: rg.liveness.into(),
            reversible: rg.reversible.into(),
            message: rg.message.clone(),
        }
    }
}

/// Render a count for display.
///
/// Counts of ten million or more use scientific notation with one
/// decimal (`1.2e+7`); smaller counts are grouped by thousands with
/// spaces (`1 234 567`).
pub fn format_count(n: u64) -> String {
    if n >= SCIENTIFIC_THRESHOLD {
        let sci = format!("{:.1e}", n as f64);
        return match sci.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => sci,
        };
    }
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1 000");
        assert_eq!(format_count(1_234_567), "1 234 567");
        assert_eq!(format_count(9_999_999), "9 999 999");
    }

    #[test]
    fn large_counts_are_scientific() {
        assert_eq!(format_count(10_000_000), "1.0e+7");
        assert_eq!(format_count(123_456_789), "1.2e+8");
    }

    #[test]
    fn negative_bound_means_unknown() {
        let rg = RgResponse {
            states: 17,
            edges: 99,
            bounded: -1,
            liveness: false,
            reversible: false,
            ..Default::default()
        };
        let s = RgSummary::from(&rg);
        assert_eq!(s.states, Count::Infinite);
        assert_eq!(s.edges, Count::Infinite);
        assert_eq!(s.liveness, Verdict::Unknown);
        assert_eq!(s.reversible, Verdict::Unknown);
        assert_eq!(s.message, UNBOUNDED_MESSAGE);
        assert_eq!(s.states.to_string(), "∞");
    }

    #[test]
    fn bounded_result_keeps_values() {
        let rg = RgResponse {
            states: 4,
            edges: 6,
            bounded: 2,
            liveness: true,
            reversible: false,
            message: "ok".into(),
            ..Default::default()
        };
        let s = RgSummary::from(&rg);
        assert_eq!(s.states, Count::Finite(4));
        assert_eq!(s.bounded, Boundedness::Bounded(2));
        assert_eq!(s.liveness, Verdict::Yes);
        assert_eq!(s.reversible, Verdict::No);
        assert_eq!(s.message, "ok");
    }

    proptest! {
        #[test]
        fn grouping_is_lossless_below_threshold(n in 0u64..SCIENTIFIC_THRESHOLD) {
            let text = format_count(n);
            prop_assert_eq!(text.replace(' ', "").parse::<u64>().unwrap(), n);
            prop_assert!(text.split(' ').skip(1).all(|g| g.len() == 3));
        }

        #[test]
        fn large_counts_use_one_decimal(n in SCIENTIFIC_THRESHOLD..u64::MAX) {
            let text = format_count(n);
            let (mantissa, exp) = text.split_once("e+").unwrap();
            prop_assert_eq!(mantissa.split_once('.').map(|(_, d)| d.len()), Some(1));
            prop_assert!(exp.parse::<u32>().unwrap() >= 7);
        }
    }
}
