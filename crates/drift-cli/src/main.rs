//! drift CLI - scripted top-down vehicle runs
//!
//! Loads a scenario file, drives the vehicle through its command script and
//! prints one line per tick.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drift_ir::{Command, Scenario};
use drift_physics::{Action, DriveEnv, Observation};
use drift_vehicle::{Segment, SegmentRecorder, SensorKind};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drift")]
#[command(about = "Top-down vehicle sensor simulation", long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print a per-tick trace
    Run {
        /// Scenario file (.toml or .json)
        scenario: PathBuf,
        /// Stop after this many ticks
        #[arg(short, long)]
        steps: Option<u64>,
        /// Print one JSON object per tick
        #[arg(long)]
        json: bool,
        /// Print every Nth tick only
        #[arg(long, default_value_t = 1)]
        every: u64,
    },
    /// Print the default scenario, including the stock sensor layout, as TOML
    Preset,
    /// Load a scenario, build its world and report what was compiled
    Check {
        /// Scenario file (.toml or .json)
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            scenario,
            steps,
            json,
            every,
        } => {
            run(&scenario, steps, json, every)?;
        }
        Commands::Preset => {
            print!("{}", Scenario::default().to_toml()?);
        }
        Commands::Check { scenario } => {
            check(&scenario)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let scenario = match ext.to_lowercase().as_str() {
        "json" => Scenario::from_json(&text)?,
        "toml" | "" => Scenario::from_toml(&text)?,
        _ => anyhow::bail!("Unknown scenario format: {}", ext),
    };
    debug!(path = %path.display(), ticks = scenario.total_ticks(), "scenario loaded");
    Ok(scenario)
}

/// One line of `--json` output.
#[derive(Serialize)]
struct TickRecord<'a> {
    #[serde(flatten)]
    observation: &'a Observation,
    overlay: &'a [Segment],
}

/// Expand the command script into one entry per tick, lazily.
///
/// With no script the vehicle idles for `fallback` ticks.
fn schedule(
    commands: &[Command],
    fallback: u64,
) -> Box<dyn Iterator<Item = (Action, bool)> + '_> {
    if commands.is_empty() {
        return Box::new((0..fallback).map(|_| (Action::default(), false)));
    }

    Box::new(commands.iter().flat_map(|cmd| {
        let action = Action {
            throttle: cmd.throttle,
            steer: cmd.steer,
        };
        (0..cmd.ticks).map(move |i| (action, cmd.toggle_overlay && i == 0))
    }))
}

fn run(path: &Path, steps: Option<u64>, json: bool, every: u64) -> Result<()> {
    if every == 0 {
        anyhow::bail!("--every must be at least 1");
    }

    let scenario = load_scenario(path)?;
    let commands = scenario.commands.clone();
    let mut env = DriveEnv::new(scenario)
        .with_context(|| format!("building scenario {}", path.display()))?;

    let planned = steps.map_or(env.max_steps(), |limit| limit.min(env.max_steps()));
    let ticks = schedule(&commands, env.max_steps())
        .take(usize::try_from(planned).unwrap_or(usize::MAX));
    info!(ticks = planned, "running");

    let mut canvas = SegmentRecorder::default();
    let mut last = env.observe();
    for (action, toggle) in ticks {
        if toggle {
            env.toggle_overlay();
        }
        let (obs, _) = env.step(action);

        if obs.step % every == 0 {
            canvas.clear();
            env.draw(&mut canvas);
            if json {
                let record = TickRecord {
                    observation: &obs,
                    overlay: &canvas.segments,
                };
                println!("{}", serde_json::to_string(&record)?);
            } else {
                let nearest = env
                    .vehicle()
                    .sensors()
                    .by_kind(SensorKind::Distance)
                    .map(|s| s.normalized())
                    .fold(1.0, f64::min);
                print_tick(&obs, nearest, canvas.segments.len());
            }
        }
        last = obs;
    }

    if !json {
        println!(
            "\n{} ticks, final position ({:.3}, {:.3}), contacts {}, last impact speed {:.3}",
            last.step,
            last.pose.position.x,
            last.pose.position.y,
            last.contact_count,
            last.last_impact_speed
        );
    }
    Ok(())
}

fn print_tick(obs: &Observation, nearest: f64, overlay: usize) {
    println!(
        "{:>6}  pos ({:>8.3}, {:>8.3})  hdg {:>7.3}  speed {:>6.3}  steer {:>6.3}  \
         engine {:>6.2}  brake {:>5.2}  contacts {}  impact {:>6.3}  nearest {:>5.3}  overlay {}",
        obs.step,
        obs.pose.position.x,
        obs.pose.position.y,
        obs.pose.heading,
        obs.speed.unwrap_or(0.0),
        obs.state.steer_value,
        obs.state.engine_force,
        obs.state.brake_force,
        obs.contact_count,
        obs.last_impact_speed,
        nearest,
        overlay
    );
}

fn check(path: &Path) -> Result<()> {
    let scenario = load_scenario(path)?;
    let env = DriveEnv::new(scenario)
        .with_context(|| format!("building scenario {}", path.display()))?;

    let sensors = env.vehicle().sensors();
    let distance = sensors.by_kind(SensorKind::Distance).count();
    let speed = sensors.by_kind(SensorKind::Speed).count();

    println!("drift scenario: {}", path.display());
    println!(
        "  Sensors: {} ({} distance, {} speed)",
        sensors.len(),
        distance,
        speed
    );
    println!("  Bodies: {}", env.world().body_count());
    println!("  Obstacles: {}", env.scenario().arena.obstacles.len());
    println!("  Scripted ticks: {}", env.scenario().total_ticks());
    println!("  Timestep: {} s", env.scenario().dt);

    let pose = env.observe().pose;
    println!(
        "  Spawn: ({:.3}, {:.3}) heading {:.3} rad",
        pose.position.x, pose.position.y, pose.heading
    );
    Ok(())
}
