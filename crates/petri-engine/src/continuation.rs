//! The session loop run on the controller's session thread.
//!
//! One iteration per engine call: issue the call (blocking), then take
//! the control lock and run the checkpoint. The checkpoint emits the
//! batch event, folds in a reported deadlock, and decides between
//! another batch, a pause, or a stop. Because the decision reads and
//! writes the state under the same lock that `pause()` and `stop()` use,
//! a request recorded during the call is honored exactly once.
//!
//! Engine failures of any kind end the session as if a stop had been
//! requested. Nothing is retried.

use std::sync::Arc;

use crate::controller::{Control, Shared};
use crate::event::{SimState, SimulationEvent};
use crate::rpc::{ContinueRequest, EngineError, NetRequest, SimulationResponse, StartRequest};

/// How a session begins.
pub(crate) enum Opening {
    /// `simulate_start`, then the loop.
    Start(StartRequest),
    /// `simulate_start_step`, then straight to `Paused`. No loop.
    Step(NetRequest),
    /// `simulate_continue` on the session the engine already holds.
    Resume,
}

/// What the checkpoint decided.
enum Next {
    /// Issue another `simulate_continue`.
    Batch,
    /// The session reached `Paused` or `Stopped`.
    Done,
}

/// State owned by the session thread.
pub(crate) struct Session {
    shared: Arc<Shared>,
}

impl Session {
    pub fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Run until the session pauses, stops, or fails.
    pub fn run(self, opening: Opening) {
        let mut outcome = match opening {
            Opening::Start(request) => self.shared.engine.simulate_start(&request),
            Opening::Resume => self.next_batch(),
            Opening::Step(request) => {
                let outcome = self.shared.engine.simulate_start_step(&request);
                self.complete_step(outcome);
                return;
            }
        };
        loop {
            let response = match outcome {
                Ok(response) => response,
                Err(e) => {
                    self.fail(&e);
                    return;
                }
            };
            match self.checkpoint(response) {
                Next::Batch => outcome = self.next_batch(),
                Next::Done => return,
            }
        }
    }

    fn next_batch(&self) -> Result<SimulationResponse, EngineError> {
        let steps = self.shared.lock().batch_size;
        self.shared
            .engine
            .simulate_continue(&ContinueRequest { steps })
    }

    fn checkpoint(&self, response: SimulationResponse) -> Next {
        let mut control = self.shared.lock();
        let (places, transitions) = control.dims;
        if let Err(e) = response.check_shape(places, transitions) {
            self.fail_locked(&mut control, &e);
            return Next::Done;
        }

        let current = control.state;
        let SimulationResponse {
            marking,
            firings,
            deadlocked,
        } = response;
        self.shared.emit(SimulationEvent {
            marking: marking.clone(),
            firings: firings.clone(),
            state: current,
            deadlocked,
        });

        let next = if deadlocked {
            tracing::debug!("engine reported deadlock");
            SimState::PauseRequested
        } else {
            current
        };
        match next {
            SimState::Running => Next::Batch,
            SimState::StopRequested => {
                self.shared.finalize_stop(&mut control);
                Next::Done
            }
            SimState::PauseRequested => {
                control.state = SimState::Paused;
                self.shared.emit(SimulationEvent {
                    marking,
                    firings,
                    state: SimState::Paused,
                    deadlocked,
                });
                tracing::debug!("simulation paused");
                Next::Done
            }
            SimState::Paused | SimState::Stopped => Next::Done,
        }
    }

    fn complete_step(&self, outcome: Result<SimulationResponse, EngineError>) {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => return self.fail(&e),
        };
        let mut control = self.shared.lock();
        let (places, transitions) = control.dims;
        if let Err(e) = response.check_shape(places, transitions) {
            return self.fail_locked(&mut control, &e);
        }
        if control.state == SimState::StopRequested {
            self.shared.finalize_stop(&mut control);
            return;
        }
        control.state = SimState::Paused;
        self.shared.emit(SimulationEvent {
            marking: response.marking,
            firings: response.firings,
            state: SimState::Paused,
            deadlocked: response.deadlocked,
        });
    }

    fn fail(&self, error: &EngineError) {
        let mut control = self.shared.lock();
        self.fail_locked(&mut control, error);
    }

    fn fail_locked(&self, control: &mut Control, error: &EngineError) {
        tracing::error!(%error, state = %control.state, "simulation engine call failed, stopping");
        self.shared.finalize_stop(control);
    }
}
