//! Request/response contract with the external simulation engine.
//!
//! The engine exposes four blocking operations. Wire types serialize with
//! camelCase field names, matching what the engine's RPC layer expects.
//!
//! The engine keeps per-session state of its own: `simulate_continue`
//! resumes the session opened by the most recent `simulate_start`, so a
//! client must never call it without a preceding, unstopped start.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use petri_core::NetMatrix;
use serde::{Deserialize, Serialize};

// ── Wire types ──────────────────────────────────────────────────

/// Net description shared by every request that opens or inspects a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetRequest {
    /// Initial marking, one entry per place.
    pub marking: Vec<u32>,
    /// Tokens each transition consumes from each place (place → transition weights).
    pub transition_inputs: Vec<Vec<u32>>,
    /// Tokens each transition produces into each place (transition → place weights).
    pub transition_outputs: Vec<Vec<u32>>,
}

impl NetRequest {
    /// Build from a derived matrix.
    pub fn from_matrix(matrix: &NetMatrix) -> Self {
        Self {
            marking: matrix.marking.clone(),
            transition_inputs: matrix.pxt_out.clone(),
            transition_outputs: matrix.pxt_in.clone(),
        }
    }
}

/// Arguments of `simulate_start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    /// The net to simulate.
    #[serde(flatten)]
    pub net: NetRequest,
    /// Number of firings to perform before reporting back.
    pub steps: u32,
}

/// Arguments of `simulate_continue`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinueRequest {
    /// Number of firings to perform before reporting back.
    pub steps: u32,
}

/// Result of a simulation batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResponse {
    /// Marking after the batch.
    pub marking: Vec<u32>,
    /// How often each transition fired during the batch.
    pub firings: Vec<u32>,
    /// Whether no transition is enabled in the resulting marking.
    pub deadlocked: bool,
}

impl SimulationResponse {
    /// Check that the vectors match the net the session was opened with.
    pub fn check_shape(&self, places: usize, transitions: usize) -> Result<(), EngineError> {
        if self.marking.len() != places {
            return Err(EngineError::Malformed {
                reason: format!(
                    "marking has {} entries, net has {places} places",
                    self.marking.len()
                ),
            });
        }
        if self.firings.len() != transitions {
            return Err(EngineError::Malformed {
                reason: format!(
                    "firings has {} entries, net has {transitions} transitions",
                    self.firings.len()
                ),
            });
        }
        Ok(())
    }
}

/// Result of a reachability-graph property check.
///
/// `bounded` is the net's bound `k`, or negative when the net is
/// unbounded. In that case `states` and `edges` are meaningless.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgResponse {
    /// Number of reachable markings.
    pub states: u64,
    /// Number of edges in the reachability graph.
    pub edges: u64,
    /// Smallest `k` such that the net is k-bounded; `-1` if unbounded.
    pub bounded: i64,
    /// Whether every transition is live.
    pub liveness: bool,
    /// Whether the initial marking is reachable from every reachable marking.
    pub reversible: bool,
    /// Per-place bounds.
    #[serde(default)]
    pub bounded_vec: Vec<i64>,
    /// The reachability graph in Graphviz DOT syntax.
    #[serde(default)]
    pub dot_graph: String,
    /// Free-text diagnostic from the engine.
    #[serde(default)]
    pub message: String,
}

// ── Error types ─────────────────────────────────────────────────

/// Failure of a single engine call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The call could not be delivered or the engine reported an error.
    Transport {
        /// Human-readable description from the transport.
        reason: String,
    },
    /// The call did not complete within the configured deadline.
    Timeout {
        /// Name of the operation that timed out.
        operation: &'static str,
        /// The deadline that was exceeded.
        after: Duration,
    },
    /// The engine answered with something that does not fit the request.
    Malformed {
        /// What was wrong with the response.
        reason: String,
    },
    /// The worker carrying the call went away without answering.
    Disconnected,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => write!(f, "engine call failed: {reason}"),
            Self::Timeout { operation, after } => {
                write!(f, "{operation} did not answer within {after:?}")
            }
            Self::Malformed { reason } => write!(f, "malformed engine response: {reason}"),
            Self::Disconnected => write!(f, "engine call abandoned without a response"),
        }
    }
}

impl Error for EngineError {}

// ── Engine trait ────────────────────────────────────────────────

/// The external simulation and analysis engine.
///
/// Every method blocks until the engine answers. Implementations must be
/// shareable across threads: the controller calls them from its session
/// thread while queries may run elsewhere.
pub trait SimulationEngine: Send + Sync + 'static {
    /// Open a session and run the first batch.
    fn simulate_start(&self, request: &StartRequest) -> Result<SimulationResponse, EngineError>;

    /// Run another batch in the current session.
    fn simulate_continue(
        &self,
        request: &ContinueRequest,
    ) -> Result<SimulationResponse, EngineError>;

    /// Open a session and fire exactly one transition.
    fn simulate_start_step(&self, request: &NetRequest)
        -> Result<SimulationResponse, EngineError>;

    /// Build the reachability graph and report its properties.
    fn check_properties(&self, request: &NetRequest) -> Result<RgResponse, EngineError>;
}

impl<E: SimulationEngine + ?Sized> SimulationEngine for Arc<E> {
    fn simulate_start(&self, request: &StartRequest) -> Result<SimulationResponse, EngineError> {
        (**self).simulate_start(request)
    }

    fn simulate_continue(
        &self,
        request: &ContinueRequest,
    ) -> Result<SimulationResponse, EngineError> {
        (**self).simulate_continue(request)
    }

    fn simulate_start_step(
        &self,
        request: &NetRequest,
    ) -> Result<SimulationResponse, EngineError> {
        (**self).simulate_start_step(request)
    }

    fn check_properties(&self, request: &NetRequest) -> Result<RgResponse, EngineError> {
        (**self).check_properties(request)
    }
}

// ── Deadline wrapper ────────────────────────────────────────────

/// Wraps an engine so that each call fails with [`EngineError::Timeout`]
/// if it does not answer in time.
///
/// The call itself runs on a short-lived helper thread. A timed-out call
/// is abandoned, not cancelled: its helper thread finishes in the
/// background and its late answer is discarded.
pub struct DeadlineEngine {
    inner: Arc<dyn SimulationEngine>,
    timeout: Duration,
}

impl DeadlineEngine {
    /// Wrap `inner` with a per-call deadline.
    pub fn new(inner: Arc<dyn SimulationEngine>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn call<T, F>(&self, operation: &'static str, f: F) -> Result<T, EngineError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SimulationEngine) -> Result<T, EngineError> + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let inner = Arc::clone(&self.inner);
        thread::Builder::new()
            .name(format!("petri-rpc-{operation}"))
            .spawn(move || {
                // The receiver is gone when the call already timed out.
                let _ = tx.send(f(inner.as_ref()));
            })
            .map_err(|e| EngineError::Transport {
                reason: format!("could not spawn call thread: {e}"),
            })?;
        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(EngineError::Timeout {
                operation,
                after: self.timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }
}

impl SimulationEngine for DeadlineEngine {
    fn simulate_start(&self, request: &StartRequest) -> Result<SimulationResponse, EngineError> {
        let request = request.clone();
        self.call("simulate_start", move |e| e.simulate_start(&request))
    }

    fn simulate_continue(
        &self,
        request: &ContinueRequest,
    ) -> Result<SimulationResponse, EngineError> {
        let request = *request;
        self.call("simulate_continue", move |e| e.simulate_continue(&request))
    }

    fn simulate_start_step(
        &self,
        request: &NetRequest,
    ) -> Result<SimulationResponse, EngineError> {
        let request = request.clone();
        self.call("simulate_start_step", move |e| {
            e.simulate_start_step(&request)
        })
    }

    fn check_properties(&self, request: &NetRequest) -> Result<RgResponse, EngineError> {
        let request = request.clone();
        self.call("check_properties", move |e| e.check_properties(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn start_request_wire_names() {
        let req = StartRequest {
            net: NetRequest {
                marking: vec![3, 0],
                transition_inputs: vec![vec![2, 0]],
                transition_outputs: vec![vec![0, 1]],
            },
            steps: 100,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "marking": [3, 0],
                "transitionInputs": [[2, 0]],
                "transitionOutputs": [[0, 1]],
                "steps": 100,
            })
        );
    }

    #[test]
    fn request_maps_consumed_weights_to_inputs() {
        let matrix = NetMatrix {
            places: vec!["p".into()],
            transitions: vec!["t".into()],
            marking: vec![1],
            pxt_in: vec![vec![5]],
            pxt_out: vec![vec![2]],
        };
        let req = NetRequest::from_matrix(&matrix);
        assert_eq!(req.transition_inputs, vec![vec![2]]);
        assert_eq!(req.transition_outputs, vec![vec![5]]);
    }

    #[test]
    fn rg_response_tolerates_missing_optional_fields() {
        let rg: RgResponse = serde_json::from_value(json!({
            "states": 4, "edges": 5, "bounded": -1,
            "liveness": false, "reversible": true,
        }))
        .unwrap();
        assert_eq!(rg.bounded, -1);
        assert!(rg.dot_graph.is_empty());
        assert!(rg.bounded_vec.is_empty());
    }

    #[test]
    fn shape_check_rejects_short_marking() {
        let resp = SimulationResponse {
            marking: vec![1],
            firings: vec![0, 0],
            deadlocked: false,
        };
        assert!(resp.check_shape(1, 2).is_ok());
        assert!(matches!(
            resp.check_shape(2, 2),
            Err(EngineError::Malformed { .. })
        ));
    }

    struct Sleepy(Duration);

    impl SimulationEngine for Sleepy {
        fn simulate_start(&self, _: &StartRequest) -> Result<SimulationResponse, EngineError> {
            thread::sleep(self.0);
            Ok(SimulationResponse::default())
        }
        fn simulate_continue(
            &self,
            _: &ContinueRequest,
        ) -> Result<SimulationResponse, EngineError> {
            thread::sleep(self.0);
            Ok(SimulationResponse::default())
        }
        fn simulate_start_step(
            &self,
            _: &NetRequest,
        ) -> Result<SimulationResponse, EngineError> {
            Ok(SimulationResponse::default())
        }
        fn check_properties(&self, _: &NetRequest) -> Result<RgResponse, EngineError> {
            Err(EngineError::Transport {
                reason: "offline".into(),
            })
        }
    }

    #[test]
    fn deadline_turns_slow_calls_into_timeouts() {
        let engine = DeadlineEngine::new(
            Arc::new(Sleepy(Duration::from_millis(500))),
            Duration::from_millis(20),
        );
        let err = engine
            .simulate_continue(&ContinueRequest { steps: 1 })
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Timeout {
                operation: "simulate_continue",
                ..
            }
        ));
    }

    #[test]
    fn deadline_passes_through_fast_answers_and_errors() {
        let engine = DeadlineEngine::new(Arc::new(Sleepy(Duration::ZERO)), Duration::from_secs(5));
        assert!(engine
            .simulate_start_step(&NetRequest::from_matrix(&NetMatrix::default()))
            .is_ok());
        assert!(matches!(
            engine.check_properties(&NetRequest::from_matrix(&NetMatrix::default())),
            Err(EngineError::Transport { .. })
        ));
    }
}
