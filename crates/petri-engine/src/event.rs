//! Controller states and the events emitted on each state change.

use std::fmt;

/// Lifecycle state of a [`SimulationController`](crate::SimulationController).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SimState {
    /// No session. Initial and terminal state.
    #[default]
    Stopped,
    /// A session thread is issuing batches.
    Running,
    /// Pause recorded; the session thread honors it at its next checkpoint.
    PauseRequested,
    /// Session suspended between batches; may be resumed or stopped.
    Paused,
    /// Stop recorded; the session thread honors it at its next checkpoint.
    StopRequested,
}

impl SimState {
    /// Whether a session thread may currently be running.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Running | Self::PauseRequested | Self::StopRequested
        )
    }
}

impl fmt::Display for SimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Running => write!(f, "running"),
            Self::PauseRequested => write!(f, "pause requested"),
            Self::Paused => write!(f, "paused"),
            Self::StopRequested => write!(f, "stop requested"),
        }
    }
}

/// One observable step of a simulation session.
///
/// `marking` follows the matrix place order and `firings` the matrix
/// transition order of the session. Terminal `Stopped` events carry the
/// marking the session started from and no firings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationEvent {
    /// Token counts to show.
    pub marking: Vec<u32>,
    /// Firings per transition in the batch just completed.
    pub firings: Vec<u32>,
    /// Controller state at the time of emission.
    pub state: SimState,
    /// Whether the engine reported a deadlock for this batch.
    pub deadlocked: bool,
}

impl SimulationEvent {
    /// The terminal event that rolls the marking back to `start_state`.
    pub fn stopped(start_state: Vec<u32>) -> Self {
        Self {
            marking: start_state,
            firings: Vec::new(),
            state: SimState::Stopped,
            deadlocked: false,
        }
    }

    /// Whether this event ends the session.
    pub fn is_terminal(&self) -> bool {
        self.state == SimState::Stopped
    }
}
