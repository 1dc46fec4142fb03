//! aviguard - bird-strike deterrent controller
//!
//! ## Commands
//!
//! - `run`: fly one simulated mission and print its summary
//! - `default-config`: print the default mission configuration as JSON

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};

use aviguard_app::logging::{init_tracing, LogFormat};
use aviguard_app::mission_loop::spawn_mission_loop;
use aviguard_core::config::MissionConfig;
use aviguard_core::enums::ScenarioKind;
use aviguard_core::state::MissionSummary;
use aviguard_sim::telemetry::{JsonLinesSink, MemorySink, TelemetrySink};
use aviguard_sim::EngineConfig;

/// How often a paced run logs mission progress.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "aviguard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bird-strike deterrent controller simulator", long_about = None)]
struct Cli {
    /// Raise the default log level to debug
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text, global = true)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one mission and print the summary
    Run {
        /// Mission configuration file (JSON); defaults apply to omitted fields
        #[arg(short, long, env = "AVIGUARD_CONFIG")]
        config: Option<PathBuf>,

        /// RNG seed; the same seed replays the same mission
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Override the encounter scenario from the config file
        #[arg(long, value_enum)]
        scenario: Option<ScenarioArg>,

        /// Write JSON-lines telemetry to this file
        #[arg(long)]
        telemetry: Option<PathBuf>,

        /// Wall-clock milliseconds per cycle (0 = as fast as possible)
        #[arg(long, default_value_t = 0)]
        pace_ms: u64,
    },

    /// Print the default mission configuration
    DefaultConfig,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenarioArg {
    /// No birds at all
    Quiet,
    /// Birds around the mid-route attack zone
    AttackZone,
}

impl From<ScenarioArg> for ScenarioKind {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Quiet => ScenarioKind::Quiet,
            ScenarioArg::AttackZone => ScenarioKind::AttackZone,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.log_format.into(), level);

    match cli.command {
        Commands::Run {
            config,
            seed,
            scenario,
            telemetry,
            pace_ms,
        } => cmd_run(config, seed, scenario, telemetry, pace_ms),
        Commands::DefaultConfig => cmd_default_config(),
    }
}

fn cmd_run(
    config_path: Option<PathBuf>,
    seed: u64,
    scenario: Option<ScenarioArg>,
    telemetry: Option<PathBuf>,
    pace_ms: u64,
) -> Result<()> {
    let mut mission = match &config_path {
        Some(path) => MissionConfig::load(path)
            .with_context(|| format!("Failed to load mission config: {:?}", path))?,
        None => MissionConfig::default(),
    };
    if let Some(kind) = scenario {
        mission.scenario.kind = kind.into();
    }

    let sink: Box<dyn TelemetrySink + Send> = match &telemetry {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create telemetry file: {:?}", path))?;
            Box::new(JsonLinesSink::new(BufWriter::new(file)))
        }
        None => Box::new(MemorySink::new()),
    };

    info!(
        event = "mission.start",
        seed,
        scenario = ?mission.scenario.kind,
        distance_m = mission.mission.total_distance_m,
        battery_wh = mission.mission.battery_capacity_wh,
    );

    let handle = spawn_mission_loop(
        EngineConfig { seed, mission },
        sink,
        Duration::from_millis(pace_ms),
    )
    .context("Failed to start mission loop")?;

    if pace_ms > 0 {
        while !handle.thread.is_finished() {
            std::thread::sleep(PROGRESS_INTERVAL);
            if let Some(snapshot) = handle.latest_snapshot() {
                info!(
                    event = "mission.progress",
                    tick = snapshot.time.tick,
                    mode = ?snapshot.mode,
                    threat = ?snapshot.threat_level,
                    distance_m = snapshot.mission.distance_traveled_m,
                    battery_percent = snapshot.mission.battery_percent,
                );
            }
        }
    }

    let summary = handle
        .thread
        .join()
        .map_err(|_| anyhow!("Mission loop panicked"))?
        .context("Failed to write telemetry")?;

    print_summary(&summary);
    if let Some(path) = telemetry {
        println!("Telemetry written to {}", path.display());
    }
    Ok(())
}

fn cmd_default_config() -> Result<()> {
    let json = serde_json::to_string_pretty(&MissionConfig::default())
        .context("Failed to serialize default config")?;
    println!("{json}");
    Ok(())
}

fn print_summary(summary: &MissionSummary) {
    println!("Mission {:?}", summary.status);
    println!(
        "  Distance:     {:.0} / {:.0} m",
        summary.distance_m, summary.total_distance_m
    );
    println!("  Duration:     {:.1} min", summary.elapsed_minutes);
    println!("  Battery left: {:.1}%", summary.final_battery_percent);
    println!("  Detections:   {}", summary.detections);
    println!("  Activations:  {}", summary.activations);
    match summary.success_rate_percent() {
        Some(rate) => println!(
            "  Deterred:     {} ({:.0}%)",
            summary.successful_deterrents, rate
        ),
        None => println!("  Deterred:     -"),
    }
    for (species, count) in &summary.species_activations {
        println!("    {:?}: {}", species, count);
    }
    println!(
        "  Power:        avg {:.1} W, peak {:.1} W",
        summary.average_power_w, summary.peak_power_w
    );
}
