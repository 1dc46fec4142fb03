//! State shared between the caller and the mission loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use aviguard_core::state::{MissionSummary, TelemetrySnapshot};
use aviguard_core::types::Observation;
use aviguard_sim::TelemetryResult;

/// Commands sent to the mission loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// An externally supplied observation batch for the next cycle.
    Observations(Vec<Observation>),
    /// Stop after the current cycle and write the summary.
    Shutdown,
}

/// Handle to a running mission loop.
///
/// The loop thread is the only writer of `latest_snapshot`; everyone else
/// reads it under the lock.
pub struct MissionHandle {
    pub command_tx: mpsc::Sender<LoopCommand>,
    pub latest_snapshot: Arc<Mutex<Option<TelemetrySnapshot>>>,
    pub thread: JoinHandle<TelemetryResult<MissionSummary>>,
}

impl MissionHandle {
    /// Copy of the most recent snapshot, `None` before the first cycle.
    pub fn latest_snapshot(&self) -> Option<TelemetrySnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|snapshot| snapshot.clone())
    }

    /// Queue an observation batch. Returns false if the loop has exited.
    pub fn send_observations(&self, observations: Vec<Observation>) -> bool {
        self.command_tx
            .send(LoopCommand::Observations(observations))
            .is_ok()
    }

    /// Ask the loop to stop. Returns false if it already exited.
    pub fn shutdown(&self) -> bool {
        self.command_tx.send(LoopCommand::Shutdown).is_ok()
    }
}
