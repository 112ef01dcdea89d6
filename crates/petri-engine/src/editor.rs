//! Session owner tying a [`NetModel`] to a controller and a query handler.
//!
//! The editor translates UI commands into controller intents, locks the
//! model for the duration of a session, and applies emitted events back
//! onto the model: token counts from the marking, transition heat from
//! the firings. The terminal `Stopped` event unlocks the model again.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use petri_core::{
    derive_matrix, DescendingId, EditError, ElementOrdering, Net, NetMatrix, NetModel,
};

use crate::config::{ConfigError, ControllerConfig};
use crate::controller::SimulationController;
use crate::event::{SimState, SimulationEvent};
use crate::reachability::{QueryError, ReachabilityQueryHandler};
use crate::rpc::{RgResponse, SimulationEngine};

/// An editing session with simulation support.
pub struct Editor<O: ElementOrdering = DescendingId> {
    model: NetModel,
    controller: SimulationController,
    queries: ReachabilityQueryHandler,
    events: Receiver<SimulationEvent>,
    ordering: O,
    batch_size: u32,
    /// Matrix the running session was opened with; its orders map event
    /// vectors back onto elements.
    session: Option<NetMatrix>,
}

impl Editor<DescendingId> {
    /// Create an editor on an empty net, ordering matrices by descending id.
    pub fn new<E: SimulationEngine>(
        engine: E,
        config: ControllerConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_ordering(engine, config, DescendingId)
    }
}

impl<O: ElementOrdering> Editor<O> {
    /// Create an editor with an explicit matrix ordering.
    pub fn with_ordering<E: SimulationEngine>(
        engine: E,
        config: ControllerConfig,
        ordering: O,
    ) -> Result<Self, ConfigError> {
        let engine: Arc<dyn SimulationEngine> = Arc::new(engine);
        let controller = SimulationController::with_shared(Arc::clone(&engine), &config)?;
        let events = controller.events();
        Ok(Self {
            model: NetModel::new(),
            controller,
            queries: ReachabilityQueryHandler::with_shared(engine),
            events,
            ordering,
            batch_size: config.batch_size,
            session: None,
        })
    }

    /// The model being edited.
    pub fn model(&self) -> &NetModel {
        &self.model
    }

    /// Mutable access for edits. Edits fail with
    /// [`EditError::NetLocked`] while a session is active.
    pub fn model_mut(&mut self) -> &mut NetModel {
        &mut self.model
    }

    /// The underlying controller.
    pub fn controller(&self) -> &SimulationController {
        &self.controller
    }

    /// Controller state.
    pub fn state(&self) -> SimState {
        self.controller.state()
    }

    /// Replace the edited net. Refused while a session holds the lock.
    pub fn load(&mut self, net: Net) -> Result<(), EditError> {
        self.model.load(net, false)
    }

    /// Matrix of the current net under this editor's ordering.
    pub fn matrix(&self) -> NetMatrix {
        derive_matrix(self.model.net(), &self.ordering)
    }

    // ── Commands ────────────────────────────────────────────────

    /// Run: resume when paused, otherwise lock the net and start fresh.
    ///
    /// Pending events are applied first, so the terminal event of an
    /// earlier session releases its lock before a new one is taken.
    pub fn run(&mut self) -> bool {
        match self.current_state() {
            SimState::Paused => self.controller.resume(),
            SimState::Stopped => {
                let Some(matrix) = self.open_session() else {
                    return false;
                };
                let accepted = self.controller.start(&matrix, self.batch_size);
                if !accepted {
                    self.close_session();
                }
                accepted
            }
            _ => false,
        }
    }

    /// Fire one transition, or request a pause if running. Pending events
    /// are applied first, as for [`run`](Editor::run).
    pub fn step(&mut self) -> bool {
        match self.current_state() {
            SimState::Stopped => {
                let Some(matrix) = self.open_session() else {
                    return false;
                };
                let accepted = self.controller.step(&matrix);
                if !accepted {
                    self.close_session();
                }
                accepted
            }
            // The model already shows the paused marking.
            SimState::Paused => self.controller.step(&self.matrix()),
            SimState::Running => self.controller.pause(),
            _ => false,
        }
    }

    /// Request a pause.
    pub fn pause(&self) -> bool {
        self.controller.pause()
    }

    /// Stop the session.
    pub fn stop(&self) -> bool {
        self.controller.stop()
    }

    /// Check reachability-graph properties of the current net.
    pub fn check_properties(&self) -> Result<RgResponse, QueryError> {
        self.queries.check(&self.matrix())
    }

    // ── Event application ───────────────────────────────────────

    /// Apply every pending event to the model. Returns how many were applied.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(&event);
            applied += 1;
        }
        applied
    }

    /// Wait for the session thread to come to rest, then apply its events.
    pub fn settle(&mut self) -> usize {
        self.controller.wait();
        self.pump_events()
    }

    fn apply(&mut self, event: &SimulationEvent) {
        if let Some(session) = &self.session {
            self.model.apply_marking(&session.places, &event.marking);
            if !event.firings.is_empty() {
                self.model.apply_heat(&session.transitions, &event.firings);
            }
        }
        if event.is_terminal() {
            self.close_session();
        }
    }

    /// Controller state, with every event emitted up to it applied.
    fn current_state(&mut self) -> SimState {
        // The terminal event is queued before the state reads Stopped.
        let state = self.controller.state();
        self.pump_events();
        state
    }

    /// Lock the model for a new session. `None` while a lock is held.
    fn open_session(&mut self) -> Option<NetMatrix> {
        if self.model.is_locked() {
            tracing::warn!("net is still locked, session not opened");
            return None;
        }
        let snapshot = self.model.lock();
        let matrix = derive_matrix(&snapshot, &self.ordering);
        self.session = Some(matrix.clone());
        Some(matrix)
    }

    fn close_session(&mut self) {
        self.session = None;
        self.model.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{ContinueRequest, EngineError, NetRequest, SimulationResponse, StartRequest};
    use petri_core::Position;

    /// Refuses every call.
    struct Offline;

    impl SimulationEngine for Offline {
        fn simulate_start(&self, _: &StartRequest) -> Result<SimulationResponse, EngineError> {
            Err(EngineError::Disconnected)
        }
        fn simulate_continue(
            &self,
            _: &ContinueRequest,
        ) -> Result<SimulationResponse, EngineError> {
            Err(EngineError::Disconnected)
        }
        fn simulate_start_step(
            &self,
            _: &NetRequest,
        ) -> Result<SimulationResponse, EngineError> {
            Err(EngineError::Disconnected)
        }
        fn check_properties(&self, _: &NetRequest) -> Result<RgResponse, EngineError> {
            Err(EngineError::Disconnected)
        }
    }

    #[test]
    fn failed_start_unlocks_after_pump() {
        let mut editor = Editor::new(Offline, ControllerConfig::default()).unwrap();
        let p = editor.model_mut().add_place(Position::default()).unwrap();
        editor.model_mut().set_tokens(&p, 2).unwrap();

        assert!(editor.run());
        assert!(editor.model().is_locked());
        editor.settle();
        assert_eq!(editor.state(), SimState::Stopped);
        assert!(!editor.model().is_locked());
        assert_eq!(editor.model().net().place(&p).unwrap().tokens, 2);
    }

    #[test]
    fn restart_applies_the_previous_stop_first() {
        let mut editor = Editor::new(Offline, ControllerConfig::default()).unwrap();
        editor.model_mut().add_place(Position::default()).unwrap();

        assert!(editor.run());
        editor.controller().wait();
        // The first session's terminal event is still queued.
        assert!(editor.model().is_locked());

        assert!(editor.run());
        assert!(editor.model().is_locked());
        editor.settle();
        assert!(!editor.model().is_locked());
    }

    #[test]
    fn held_lock_refuses_a_new_session() {
        let mut editor = Editor::new(Offline, ControllerConfig::default()).unwrap();
        editor.model_mut().add_place(Position::default()).unwrap();
        editor.model_mut().lock();

        assert!(!editor.run());
        assert!(!editor.step());
        assert_eq!(editor.state(), SimState::Stopped);
        assert!(editor.model().is_locked());
    }

    #[test]
    fn query_errors_surface() {
        let editor = Editor::new(Offline, ControllerConfig::default()).unwrap();
        assert!(matches!(
            editor.check_properties(),
            Err(QueryError::Engine(EngineError::Disconnected))
        ));
    }
}
