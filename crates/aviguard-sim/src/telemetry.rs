//! Telemetry sinks.
//!
//! Sinks are append-only consumers of controller output. Nothing written to a
//! sink feeds back into the control loop.

use std::io::Write;

use serde::{Deserialize, Serialize};

use aviguard_core::events::{ControllerEvent, DeterrentOutcome};
use aviguard_core::state::{MissionSummary, TelemetrySnapshot};

use crate::error::TelemetryResult;

pub trait TelemetrySink {
    fn record_outcome(&mut self, outcome: &DeterrentOutcome) -> TelemetryResult<()>;

    fn record_snapshot(&mut self, snapshot: &TelemetrySnapshot) -> TelemetryResult<()>;

    fn record_event(&mut self, _event: &ControllerEvent) -> TelemetryResult<()> {
        Ok(())
    }

    fn record_summary(&mut self, _summary: &MissionSummary) -> TelemetryResult<()> {
        Ok(())
    }

    fn flush(&mut self) -> TelemetryResult<()> {
        Ok(())
    }
}

/// One line of a JSON-lines telemetry stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum TelemetryRecord {
    Outcome(DeterrentOutcome),
    Snapshot(TelemetrySnapshot),
    Event(ControllerEvent),
    Summary(MissionSummary),
}

/// Keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub outcomes: Vec<DeterrentOutcome>,
    pub snapshots: Vec<TelemetrySnapshot>,
    pub events: Vec<ControllerEvent>,
    pub summary: Option<MissionSummary>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TelemetrySink for MemorySink {
    fn record_outcome(&mut self, outcome: &DeterrentOutcome) -> TelemetryResult<()> {
        self.outcomes.push(*outcome);
        Ok(())
    }

    fn record_snapshot(&mut self, snapshot: &TelemetrySnapshot) -> TelemetryResult<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }

    fn record_event(&mut self, event: &ControllerEvent) -> TelemetryResult<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn record_summary(&mut self, summary: &MissionSummary) -> TelemetryResult<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}

/// Writes one JSON object per line to any writer.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    records: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, records: 0 }
    }

    /// Lines written so far.
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, record: &TelemetryRecord) -> TelemetryResult<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn record_outcome(&mut self, outcome: &DeterrentOutcome) -> TelemetryResult<()> {
        self.write_record(&TelemetryRecord::Outcome(*outcome))
    }

    fn record_snapshot(&mut self, snapshot: &TelemetrySnapshot) -> TelemetryResult<()> {
        self.write_record(&TelemetryRecord::Snapshot(snapshot.clone()))
    }

    fn record_event(&mut self, event: &ControllerEvent) -> TelemetryResult<()> {
        self.write_record(&TelemetryRecord::Event(event.clone()))
    }

    fn record_summary(&mut self, summary: &MissionSummary) -> TelemetryResult<()> {
        self.write_record(&TelemetryRecord::Summary(summary.clone()))
    }

    fn flush(&mut self) -> TelemetryResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
