//! Scripted engine double.
//!
//! [`ScriptedEngine`] answers each operation from its own queue of
//! scripted results and falls back to a fixed response when the queue is
//! empty. Every call is counted, so tests can assert exactly how many
//! engine calls a controller made. A gated engine additionally blocks
//! each `simulate_continue` until the test releases it through a
//! [`Gate`], which lets tests issue pause/stop requests while a call is
//! in flight.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use petri_engine::{
    ContinueRequest, EngineError, NetRequest, RgResponse, SimulationEngine, SimulationResponse,
    StartRequest,
};

/// Snapshot of how often each operation was called.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub start: usize,
    pub continues: usize,
    pub steps: usize,
    pub properties: usize,
}

#[derive(Default)]
struct Script {
    start: VecDeque<Result<SimulationResponse, EngineError>>,
    continues: VecDeque<Result<SimulationResponse, EngineError>>,
    steps: VecDeque<Result<SimulationResponse, EngineError>>,
    properties: VecDeque<Result<RgResponse, EngineError>>,
    start_requests: Vec<StartRequest>,
    continue_steps: Vec<u32>,
}

/// Releases gated `simulate_continue` calls.
#[derive(Clone)]
pub struct Gate {
    permits: Sender<()>,
}

impl Gate {
    /// Let `n` more `simulate_continue` calls answer.
    pub fn release(&self, n: usize) {
        for _ in 0..n {
            let _ = self.permits.send(());
        }
    }
}

/// Engine double answering from per-operation scripts.
pub struct ScriptedEngine {
    script: Mutex<Script>,
    fallback: SimulationResponse,
    gate: Option<Receiver<()>>,
    start: AtomicUsize,
    continues: AtomicUsize,
    steps: AtomicUsize,
    properties: AtomicUsize,
}

impl ScriptedEngine {
    /// An ungated engine answering `fallback` whenever a queue is empty.
    pub fn new(fallback: SimulationResponse) -> Self {
        Self {
            script: Mutex::new(Script::default()),
            fallback,
            gate: None,
            start: AtomicUsize::new(0),
            continues: AtomicUsize::new(0),
            steps: AtomicUsize::new(0),
            properties: AtomicUsize::new(0),
        }
    }

    /// An engine whose `simulate_continue` calls each wait for a permit.
    pub fn gated(fallback: SimulationResponse) -> (Self, Gate) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut engine = Self::new(fallback);
        engine.gate = Some(rx);
        (engine, Gate { permits: tx })
    }

    /// Queue a `simulate_start` result.
    pub fn push_start(&self, result: Result<SimulationResponse, EngineError>) -> &Self {
        self.script().start.push_back(result);
        self
    }

    /// Queue a `simulate_continue` result.
    pub fn push_continue(&self, result: Result<SimulationResponse, EngineError>) -> &Self {
        self.script().continues.push_back(result);
        self
    }

    /// Queue a `simulate_start_step` result.
    pub fn push_step(&self, result: Result<SimulationResponse, EngineError>) -> &Self {
        self.script().steps.push_back(result);
        self
    }

    /// Queue a `check_properties` result.
    pub fn push_properties(&self, result: Result<RgResponse, EngineError>) -> &Self {
        self.script().properties.push_back(result);
        self
    }

    /// Calls made so far.
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            start: self.start.load(Ordering::SeqCst),
            continues: self.continues.load(Ordering::SeqCst),
            steps: self.steps.load(Ordering::SeqCst),
            properties: self.properties.load(Ordering::SeqCst),
        }
    }

    /// Every `simulate_start` request received, in order.
    pub fn start_requests(&self) -> Vec<StartRequest> {
        self.script().start_requests.clone()
    }

    /// The `steps` argument of every `simulate_continue` call, in order.
    pub fn continue_steps(&self) -> Vec<u32> {
        self.script().continue_steps.clone()
    }

    /// Poll until `pred` holds for the call counts or `timeout` elapses.
    pub fn wait_for(&self, timeout: Duration, pred: impl Fn(&CallCounts) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if pred(&self.calls()) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SimulationEngine for ScriptedEngine {
    fn simulate_start(&self, request: &StartRequest) -> Result<SimulationResponse, EngineError> {
        self.start.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script();
        script.start_requests.push(request.clone());
        script
            .start
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn simulate_continue(
        &self,
        request: &ContinueRequest,
    ) -> Result<SimulationResponse, EngineError> {
        self.continues.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            if gate.recv().is_err() {
                return Err(EngineError::Disconnected);
            }
        }
        let mut script = self.script();
        script.continue_steps.push(request.steps);
        script
            .continues
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn simulate_start_step(
        &self,
        _request: &NetRequest,
    ) -> Result<SimulationResponse, EngineError> {
        self.steps.fetch_add(1, Ordering::SeqCst);
        self.script()
            .steps
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn check_properties(&self, _request: &NetRequest) -> Result<RgResponse, EngineError> {
        self.properties.fetch_add(1, Ordering::SeqCst);
        self.script()
            .properties
            .pop_front()
            .unwrap_or_else(|| Ok(RgResponse::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(n: u32) -> SimulationResponse {
        SimulationResponse {
            marking: vec![n],
            firings: vec![1],
            deadlocked: false,
        }
    }

    #[test]
    fn scripted_then_fallback() {
        let engine = ScriptedEngine::new(resp(0));
        engine.push_continue(Ok(resp(7)));
        let req = ContinueRequest { steps: 5 };
        assert_eq!(engine.simulate_continue(&req).unwrap().marking, vec![7]);
        assert_eq!(engine.simulate_continue(&req).unwrap().marking, vec![0]);
        assert_eq!(engine.calls().continues, 2);
        assert_eq!(engine.continue_steps(), vec![5, 5]);
    }

    #[test]
    fn gate_holds_continue_until_released() {
        let (engine, gate) = ScriptedEngine::gated(resp(1));
        let engine = std::sync::Arc::new(engine);
        let worker = {
            let engine = std::sync::Arc::clone(&engine);
            thread::spawn(move || engine.simulate_continue(&ContinueRequest { steps: 1 }))
        };
        assert!(engine.wait_for(Duration::from_secs(5), |c| c.continues == 1));
        gate.release(1);
        assert_eq!(worker.join().unwrap().unwrap().marking, vec![1]);
    }
}
