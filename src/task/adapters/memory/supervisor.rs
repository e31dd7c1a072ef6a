//! Scripted process supervisor for deterministic execution tests.

use crate::task::{
    domain::RunnerPid,
    ports::{ProcessHandle, ProcessOutcome, ProcessRequest, ProcessSupervisor},
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::oneshot;

/// Process supervisor that records launches instead of spawning processes.
///
/// Each launch receives a sequential pid and stays in flight until the test
/// settles it with [`ScriptedProcessSupervisor::finish`]. Launch failures can
/// be queued with [`ScriptedProcessSupervisor::fail_next_launch`].
#[derive(Debug, Clone)]
pub struct ScriptedProcessSupervisor {
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Debug)]
struct ScriptedState {
    next_pid: u32,
    launches: Vec<ProcessRequest>,
    in_flight: HashMap<RunnerPid, oneshot::Sender<ProcessOutcome>>,
    queued_failures: VecDeque<String>,
}

impl Default for ScriptedProcessSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProcessSupervisor {
    /// First pid handed out by a fresh supervisor.
    pub const FIRST_PID: u32 = 4200;

    /// Creates a supervisor with no recorded launches.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedState {
                next_pid: Self::FIRST_PID,
                launches: Vec::new(),
                in_flight: HashMap::new(),
                queued_failures: VecDeque::new(),
            })),
        }
    }

    /// Makes the next launch fail to start with `reason`.
    pub fn fail_next_launch(&self, reason: impl Into<String>) {
        self.lock().queued_failures.push_back(reason.into());
    }

    /// Returns every request launched so far, in order.
    #[must_use]
    pub fn launches(&self) -> Vec<ProcessRequest> {
        self.lock().launches.clone()
    }

    /// Returns the number of launched processes still awaiting an outcome.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.lock().in_flight.len()
    }

    /// Settles the in-flight process `pid` with `outcome`.
    ///
    /// Returns `false` when no such process is in flight or its handle has
    /// been dropped.
    pub fn finish(&self, pid: RunnerPid, outcome: ProcessOutcome) -> bool {
        let sender = self.lock().in_flight.remove(&pid);
        sender.is_some_and(|tx| tx.send(outcome).is_ok())
    }

    /// Settles `pid` as an exit with `exit_code` and `output`.
    pub fn exit(&self, pid: RunnerPid, exit_code: i32, output: impl Into<String>) -> bool {
        self.finish(
            pid,
            ProcessOutcome::Exited {
                exit_code: Some(exit_code),
                output: output.into(),
            },
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProcessSupervisor for ScriptedProcessSupervisor {
    fn launch(&self, request: ProcessRequest) -> ProcessHandle {
        let mut state = self.lock();
        state.launches.push(request);
        if let Some(reason) = state.queued_failures.pop_front() {
            return ProcessHandle::failed_to_start(reason);
        }

        let pid = RunnerPid::new(state.next_pid);
        state.next_pid += 1;
        let (sender, receiver) = oneshot::channel();
        state.in_flight.insert(pid, sender);
        ProcessHandle::new(Some(pid), receiver)
    }
}
