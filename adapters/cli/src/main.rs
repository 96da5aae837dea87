#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a scripted Fleet Sim session.
//!
//! The session assembles a fleet (from a scenario string or a seeded demo
//! generator), plays it back against the headless map surface frame by
//! frame, and prints the operator-facing status lines and fleet tables on
//! stdout. Diagnostics go through `tracing`; set `RUST_LOG` to adjust them.

mod scenario;

use anyhow::Context as _;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

use fleetsim_core::{Command, EquipmentId, GeoPoint, MapSurface, MotionState};
use fleetsim_registry::{self as registry, query, Registry};
use fleetsim_rendering::{status, HeadlessSurface};
use fleetsim_system_capture::Capture;
use fleetsim_system_playback::Playback;

use crate::scenario::{FleetScenario, ScenarioRoute};

/// Anchor for generated demo routes.
const DEMO_HOME: GeoPoint = GeoPoint::new(-2.8, 104.8);
/// Frames between fleet table reports.
const REPORT_INTERVAL: u32 = 16;

/// Command-line options for the scripted session.
#[derive(Debug, Parser)]
#[command(name = "fleetsim", about = "Scripted fleet playback session")]
struct Cli {
    /// Number of demo equipment when no scenario string is given.
    #[arg(long, default_value_t = 3)]
    equipment: u32,

    /// Frames to simulate after the fleet is assembled.
    #[arg(long, default_value_t = 48)]
    frames: u32,

    /// Seed for the demo route generator.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Progress gained by each motion tick.
    #[arg(long, default_value_t = 0.05)]
    step: f64,

    /// Scenario transfer string to load instead of the generated demo fleet.
    #[arg(long)]
    scenario: Option<String>,

    /// Print the session as a scenario transfer string before exiting.
    #[arg(long)]
    emit_scenario: bool,
}

/// Entry point for the Fleet Sim command-line interface.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let scenario = match &cli.scenario {
        Some(encoded) => FleetScenario::decode(encoded)
            .context("could not decode the --scenario string")?,
        None => demo_scenario(cli.equipment, cli.seed),
    };
    let mut session = Session::new(cli.step);
    info!(
        routes = scenario.routes.len(),
        frames = cli.frames,
        step = query::progress_step(&session.registry),
        "session configured"
    );
    println!("{}", query::welcome_banner(&session.registry));

    session.assemble(&scenario);
    session.run(cli.frames);
    session.report();
    session.shutdown();

    if cli.emit_scenario {
        println!("{}", scenario.encode());
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// One scripted operator session against the headless map surface.
struct Session {
    registry: Registry,
    surface: HeadlessSurface,
    playback: Playback,
    capture: Capture,
    pending: Vec<Command>,
    first_started: Option<EquipmentId>,
    frames_run: u32,
}

impl Session {
    fn new(step: f64) -> Self {
        Self {
            registry: Registry::new().with_progress_step(step),
            surface: HeadlessSurface::new(),
            playback: Playback::new(),
            capture: Capture::new(),
            pending: Vec::new(),
            first_started: None,
            frames_run: 0,
        }
    }

    /// Builds the fleet. The first route's opening waypoint arrives through
    /// the interactive capture flow; every other waypoint is appended
    /// directly. A fresh registry assigns ids 1..=n in add order.
    fn assemble(&mut self, scenario: &FleetScenario) {
        let mut setup: Vec<Command> = scenario
            .routes
            .iter()
            .map(|_| Command::AddEquipment)
            .collect();
        let captured = scenario
            .routes
            .first()
            .and_then(|route| route.waypoints.first())
            .copied();
        if captured.is_some() {
            setup.push(Command::RequestWaypoint {
                equipment: EquipmentId::new(1),
            });
        }
        self.run_frame(setup);

        if let Some(point) = captured {
            self.surface.push_click(point);
            self.run_frame(Vec::new());
        }

        let mut appends = Vec::new();
        for (index, route) in scenario.routes.iter().enumerate() {
            let equipment = EquipmentId::new(index as u32 + 1);
            let skip = usize::from(index == 0 && captured.is_some());
            for point in route.waypoints.iter().skip(skip) {
                appends.push(Command::AppendWaypoint {
                    equipment,
                    point: *point,
                });
            }
        }
        self.run_frame(appends);

        let mut starts = Vec::new();
        for (index, route) in scenario.routes.iter().enumerate() {
            if route.start {
                let equipment = EquipmentId::new(index as u32 + 1);
                if self.first_started.is_none() {
                    self.first_started = Some(equipment);
                }
                starts.push(Command::StartMotion { equipment });
            }
        }
        self.run_frame(starts);
    }

    /// Plays back `frames` frames with the scripted stop milestones.
    fn run(&mut self, frames: u32) {
        for frame in 0..frames {
            let mut operator = Vec::new();
            if frames >= 3 {
                if frame == frames / 3 {
                    if let Some(equipment) = self.first_started {
                        operator.push(Command::StopMotion { equipment });
                    }
                }
                if frame == frames / 3 * 2 {
                    operator.push(Command::StopAll);
                }
            }
            self.run_frame(operator);

            if (frame + 1) % REPORT_INTERVAL == 0 {
                self.report();
            }
        }
    }

    /// Runs one frame: queued ticks first, then capture resolutions carried
    /// over from the previous frame, then operator commands.
    fn run_frame(&mut self, operator: Vec<Command>) {
        let mut commands = Vec::new();
        self.playback.begin_frame(&mut commands);
        commands.extend(self.pending.drain(..));
        commands.extend(operator);

        let mut events = Vec::new();
        for command in commands {
            registry::apply(&mut self.registry, &mut self.surface, command, &mut events);
        }

        let mut clicks = Vec::new();
        while let Some(point) = self.surface.take_click() {
            clicks.push(point);
        }
        self.capture.handle(&events, &clicks, &mut self.pending);
        self.playback.handle(&events);

        for event in &events {
            if let Some(line) = status::describe(event) {
                println!("{line}");
            }
        }
        self.frames_run += 1;
        debug!(
            frame = self.frames_run,
            events = events.len(),
            queued = self.playback.queued(),
            "frame complete"
        );
    }

    /// Prints the fleet table and the aggregate totals.
    fn report(&self) {
        let view = query::fleet_view(&self.registry);
        if view.is_empty() {
            println!("fleet is empty");
            return;
        }

        println!("id   state    progress  waypoints      route");
        for snapshot in view.snapshots() {
            println!(
                "{:<4} {:<8} {:>7.1}%  {:>9}  {:>9.1} m",
                snapshot.id,
                state_label(snapshot.state),
                snapshot.progress.get() * 100.0,
                snapshot.waypoint_count,
                snapshot.path_meters,
            );
        }

        let totals = query::fleet_totals(&self.registry);
        println!(
            "fleet: {} equipment, {} waypoints, {:.1} m",
            totals.equipment_count, totals.waypoint_count, totals.route_meters
        );
    }

    /// Clears the fleet and confirms every rendered artifact was released.
    fn shutdown(&mut self) {
        self.run_frame(vec![Command::ResetAll]);
        info!(
            live_artifacts = self.surface.live_artifacts(),
            stale_operations = self.surface.counters().stale_operations,
            "session closed"
        );
    }
}

fn state_label(state: MotionState) -> &'static str {
    match state {
        MotionState::Idle => "idle",
        MotionState::Moving => "moving",
        MotionState::Stopped => "stopped",
    }
}

/// Generates reproducible routes that drift eastward from the demo anchor.
fn demo_scenario(equipment: u32, seed: u64) -> FleetScenario {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut routes = Vec::new();

    for _ in 0..equipment {
        let mut lat = DEMO_HOME.latitude() + rng.gen_range(-0.02..0.02);
        let mut lon = DEMO_HOME.longitude() + rng.gen_range(-0.02..0.02);
        let waypoint_count = rng.gen_range(3..=5);

        let mut waypoints = Vec::new();
        for _ in 0..waypoint_count {
            waypoints.push(GeoPoint::new(lat, lon));
            lat += rng.gen_range(-0.008..0.008);
            lon += rng.gen_range(0.004..0.012);
        }

        routes.push(ScenarioRoute {
            waypoints,
            start: true,
        });
    }

    FleetScenario { routes }
}
