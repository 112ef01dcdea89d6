//! User-facing simulation state machine.
//!
//! [`SimulationController`] turns run/step/pause/stop intents into engine
//! calls. It never has more than one session thread: `start`, `resume`
//! and `step` are silent no-ops while a session is active. Pause and stop
//! requests made during an in-flight call are recorded in the shared
//! state and picked up by the session loop at its next checkpoint.
//!
//! Every state change produces [`SimulationEvent`]s on an unbounded
//! channel obtained from [`events`](SimulationController::events).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use petri_core::NetMatrix;

use crate::config::{ConfigError, ControllerConfig};
use crate::continuation::{Opening, Session};
use crate::event::{SimState, SimulationEvent};
use crate::rpc::{DeadlineEngine, NetRequest, SimulationEngine, StartRequest};

/// Mutable controller state, guarded by the shared mutex.
#[derive(Debug, Default)]
pub(crate) struct Control {
    pub state: SimState,
    /// Marking captured when the session was started from `Stopped`.
    pub start_state: Vec<u32>,
    /// Firings per batch for this session.
    pub batch_size: u32,
    /// `(places, transitions)` of the net the session was opened with.
    pub dims: (usize, usize),
}

/// State shared between the controller handle and its session thread.
pub(crate) struct Shared {
    pub engine: Arc<dyn SimulationEngine>,
    control: Mutex<Control>,
    events: Sender<SimulationEvent>,
}

impl Shared {
    pub fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn emit(&self, event: SimulationEvent) {
        tracing::trace!(state = %event.state, deadlocked = event.deadlocked, "emit");
        // The controller holds the receiver for as long as sessions can run.
        let _ = self.events.send(event);
    }

    /// End the session: back to `Stopped`, marking rolled back to the start state.
    pub fn finalize_stop(&self, control: &mut Control) {
        control.state = SimState::Stopped;
        self.emit(SimulationEvent::stopped(control.start_state.clone()));
        tracing::debug!("simulation stopped");
    }
}

/// Drives simulation sessions against a [`SimulationEngine`].
pub struct SimulationController {
    shared: Arc<Shared>,
    events: Receiver<SimulationEvent>,
    session: Mutex<Option<JoinHandle<()>>>,
}

impl SimulationController {
    /// Create a controller in the `Stopped` state.
    ///
    /// When `config.rpc_timeout` is set, every engine call is wrapped in a
    /// [`DeadlineEngine`].
    pub fn new<E: SimulationEngine>(
        engine: E,
        config: &ControllerConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_shared(Arc::new(engine), config)
    }

    /// Create a controller around an engine that is shared with other users,
    /// e.g. a [`ReachabilityQueryHandler`](crate::ReachabilityQueryHandler).
    pub fn with_shared(
        engine: Arc<dyn SimulationEngine>,
        config: &ControllerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine: Arc<dyn SimulationEngine> = match config.rpc_timeout {
            Some(timeout) => Arc::new(DeadlineEngine::new(engine, timeout)),
            None => engine,
        };
        let (tx, rx) = crossbeam_channel::unbounded();
        Ok(Self {
            shared: Arc::new(Shared {
                engine,
                control: Mutex::new(Control {
                    batch_size: config.batch_size,
                    ..Control::default()
                }),
                events: tx,
            }),
            events: rx,
            session: Mutex::new(None),
        })
    }

    /// A receiver for the controller's events.
    ///
    /// All clones share one queue: each event is delivered to exactly one
    /// receiver.
    pub fn events(&self) -> Receiver<SimulationEvent> {
        self.events.clone()
    }

    /// Current state.
    pub fn state(&self) -> SimState {
        self.shared.lock().state
    }

    /// Whether the controller is `Paused`.
    pub fn is_paused(&self) -> bool {
        self.state() == SimState::Paused
    }

    /// The marking a full stop rolls back to.
    pub fn start_state(&self) -> Vec<u32> {
        self.shared.lock().start_state.clone()
    }

    // ── Intents ─────────────────────────────────────────────────

    /// Start a session running batches of `update_time` firings.
    ///
    /// Accepted from `Stopped` or `Paused`; otherwise returns `false` and
    /// does nothing. The start state is only captured when coming from
    /// `Stopped`, so a full stop after restarting from `Paused` still
    /// rolls back to the original marking.
    pub fn start(&self, matrix: &NetMatrix, update_time: u32) -> bool {
        let request = {
            let mut control = self.shared.lock();
            match control.state {
                SimState::Stopped => control.start_state = matrix.marking.clone(),
                SimState::Paused => {}
                _ => return false,
            }
            control.state = SimState::Running;
            control.batch_size = update_time.max(1);
            control.dims = (matrix.place_count(), matrix.transition_count());
            StartRequest {
                net: NetRequest::from_matrix(matrix),
                steps: control.batch_size,
            }
        };
        tracing::debug!(steps = request.steps, "simulation started");
        self.launch(Opening::Start(request));
        true
    }

    /// Resume a paused session with the last batch size.
    ///
    /// Accepted only from `Paused`.
    pub fn resume(&self) -> bool {
        {
            let mut control = self.shared.lock();
            if control.state != SimState::Paused {
                return false;
            }
            control.state = SimState::Running;
        }
        tracing::debug!("simulation resumed");
        self.launch(Opening::Resume);
        true
    }

    /// Request a pause at the next checkpoint. Accepted only from `Running`.
    pub fn pause(&self) -> bool {
        let mut control = self.shared.lock();
        if control.state != SimState::Running {
            return false;
        }
        control.state = SimState::PauseRequested;
        tracing::debug!("pause requested");
        true
    }

    /// Stop the session.
    ///
    /// From `Running` the stop is recorded and honored at the next
    /// checkpoint. From `Paused` it is immediate and emits the terminal
    /// event carrying the start state.
    pub fn stop(&self) -> bool {
        let mut control = self.shared.lock();
        match control.state {
            SimState::Running => {
                control.state = SimState::StopRequested;
                tracing::debug!("stop requested");
                true
            }
            SimState::Paused => {
                self.shared.finalize_stop(&mut control);
                true
            }
            _ => false,
        }
    }

    /// Fire a single transition.
    ///
    /// While `Running` this is a pause request. From `Stopped` the current
    /// marking becomes the start state; from `Paused` the existing start
    /// state is kept. The session ends in `Paused` with the step's result.
    pub fn step(&self, matrix: &NetMatrix) -> bool {
        let request = {
            let mut control = self.shared.lock();
            match control.state {
                SimState::Running => {
                    control.state = SimState::PauseRequested;
                    tracing::debug!("step while running, pause requested");
                    return true;
                }
                SimState::Stopped => control.start_state = matrix.marking.clone(),
                SimState::Paused => {}
                SimState::PauseRequested | SimState::StopRequested => return false,
            }
            control.state = SimState::Running;
            control.dims = (matrix.place_count(), matrix.transition_count());
            NetRequest::from_matrix(matrix)
        };
        tracing::debug!("single step");
        self.launch(Opening::Step(request));
        true
    }

    /// Block until the current session thread, if any, has finished.
    ///
    /// A session only finishes on pause, stop, deadlock, or failure, so
    /// this does not return while the controller keeps running.
    pub fn wait(&self) {
        let handle = self.session_slot().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("simulation session thread panicked");
            }
        }
    }

    fn session_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn launch(&self, opening: Opening) {
        let mut slot = self.session_slot();
        // A previous session has already reached a resting state and is
        // only returning; reap it before starting the next one.
        if let Some(previous) = slot.take() {
            if previous.join().is_err() {
                tracing::error!("simulation session thread panicked");
            }
        }
        let session = Session::new(Arc::clone(&self.shared));
        match thread::Builder::new()
            .name("petri-session".into())
            .spawn(move || session.run(opening))
        {
            Ok(handle) => *slot = Some(handle),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn simulation session");
                let mut control = self.shared.lock();
                self.shared.finalize_stop(&mut control);
            }
        }
    }
}

impl Drop for SimulationController {
    fn drop(&mut self) {
        {
            let mut control = self.shared.lock();
            if matches!(control.state, SimState::Running | SimState::PauseRequested) {
                control.state = SimState::StopRequested;
            }
        }
        self.wait();
    }
}
