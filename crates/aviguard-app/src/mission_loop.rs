//! Mission loop thread: steps the engine and publishes snapshots.
//!
//! The engine is created inside this thread so it never crosses a thread
//! boundary. Commands arrive via an `mpsc` channel; the latest snapshot is
//! stored in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::info;

use aviguard_core::state::{MissionSummary, TelemetrySnapshot};
use aviguard_sim::telemetry::TelemetrySink;
use aviguard_sim::{EngineConfig, MissionEngine, TelemetryResult};

use crate::state::{LoopCommand, MissionHandle};

/// Spawns the mission loop in a new thread.
///
/// `cycle_interval` paces cycles in wall-clock time; zero runs as fast as
/// possible.
pub fn spawn_mission_loop(
    config: EngineConfig,
    mut sink: Box<dyn TelemetrySink + Send>,
    cycle_interval: Duration,
) -> std::io::Result<MissionHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let thread = std::thread::Builder::new()
        .name("aviguard-mission-loop".into())
        .spawn(move || {
            let mut engine = MissionEngine::new(config);
            run_mission_loop(&mut engine, sink.as_mut(), &cmd_rx, &shared, cycle_interval)
        })?;

    Ok(MissionHandle {
        command_tx: cmd_tx,
        latest_snapshot,
        thread,
    })
}

/// The mission loop. Runs until the mission ends, the step cap is hit, or a
/// Shutdown command arrives.
fn run_mission_loop(
    engine: &mut MissionEngine,
    sink: &mut dyn TelemetrySink,
    cmd_rx: &mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<TelemetrySnapshot>>,
    cycle_interval: Duration,
) -> TelemetryResult<MissionSummary> {
    let mut next_cycle_time = Instant::now();

    while engine.should_continue() {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Observations(batch)) => engine.inject(batch),
                Ok(LoopCommand::Shutdown) => {
                    info!(event = "loop.shutdown", tick = engine.controller().time().tick);
                    return engine.finish(sink);
                }
                // A dropped handle does not stop the mission.
                Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        // 2. Run one cycle and hand it to the sink
        let report = engine.step();
        report.publish(sink)?;

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(report.snapshot);
        }

        // 4. Sleep until the next cycle
        if !cycle_interval.is_zero() {
            next_cycle_time += cycle_interval;
            let now = Instant::now();
            if next_cycle_time > now {
                std::thread::sleep(next_cycle_time - now);
            } else if now - next_cycle_time > cycle_interval * 2 {
                // Too far behind; reset instead of bursting to catch up
                next_cycle_time = now;
            }
        }
    }

    engine.finish(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviguard_core::enums::{MissionStatus, ScenarioKind, Species, SystemMode};
    use aviguard_core::types::Observation;
    use aviguard_sim::telemetry::MemorySink;

    fn quiet_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.mission.scenario.kind = ScenarioKind::Quiet;
        config
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<LoopCommand>();

        tx.send(LoopCommand::Observations(Vec::new())).unwrap();
        tx.send(LoopCommand::Observations(vec![Observation::new(
            Species::Crow,
            100.0,
            60.0,
            0.9,
        )]))
        .unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(&commands[0], LoopCommand::Observations(b) if b.is_empty()));
        assert!(matches!(&commands[1], LoopCommand::Observations(b) if b.len() == 1));
        assert!(matches!(commands[2], LoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_runs_mission_to_completion() {
        let handle =
            spawn_mission_loop(quiet_config(), Box::new(MemorySink::new()), Duration::ZERO)
                .unwrap();
        while !handle.thread.is_finished() {
            std::thread::sleep(Duration::from_millis(1));
        }
        let snapshot = handle.latest_snapshot().unwrap();
        let summary = handle.thread.join().unwrap().unwrap();

        assert_eq!(summary.status, MissionStatus::Completed);
        assert_eq!(snapshot.mission.status, MissionStatus::Completed);
        assert_eq!(snapshot.mode, SystemMode::Standby);
    }

    #[test]
    fn test_shutdown_stops_paced_loop() {
        let handle = spawn_mission_loop(
            quiet_config(),
            Box::new(MemorySink::new()),
            Duration::from_millis(20),
        )
        .unwrap();
        assert!(handle.shutdown());
        let summary = handle.thread.join().unwrap().unwrap();

        assert_eq!(summary.status, MissionStatus::Running);
        assert!(summary.distance_m < summary.total_distance_m);
    }

    #[test]
    fn test_injected_observations_reach_controller() {
        let handle = spawn_mission_loop(
            quiet_config(),
            Box::new(MemorySink::new()),
            Duration::from_millis(2),
        )
        .unwrap();
        // Eagle at 40cm
        let eagle = Observation::new(Species::Eagle, 2500.0, 1500.0, 0.9);
        assert!(handle.send_observations(vec![eagle]));
        let summary = handle.thread.join().unwrap().unwrap();

        assert_eq!(summary.status, MissionStatus::Completed);
        assert_eq!(summary.activations, 1);
        assert_eq!(summary.species_activations.get(&Species::Eagle), Some(&1));
    }
}
