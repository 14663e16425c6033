use std::{path::PathBuf, process::ExitCode};

use bevy::prelude::*;
use clap::Parser;
use log::{info, LevelFilter};

use jyro_sim::{config::ScenarioSpec, simulation::Simulation};

mod controller;
mod resource;
mod simulator;
mod visualizer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON). The built-in demo scenario is used if omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Run without a window and print the final state.
    #[arg(long)]
    headless: bool,

    /// Number of ticks to run in headless mode.
    #[arg(long, default_value_t = 100)]
    ticks: u64,

    /// Overrides the scenario's random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Log level in headless mode (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.headless {
        env_logger::Builder::new()
            .filter_level(args.log_level)
            .init();
    }

    let mut scenario = match &args.scenario {
        Some(path) => match ScenarioSpec::load(path) {
            Ok(scenario) => scenario,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => ScenarioSpec::demo(),
    };
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }
    let simulation = match scenario.build() {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.headless {
        run_headless(simulation, args.ticks);
    } else {
        App::new()
            .add_plugins(DefaultPlugins)
            .insert_resource(resource::SimulationRes::from(simulation))
            .add_plugins(controller::Controller)
            .add_plugins(visualizer::Visualizer)
            .add_plugins(simulator::Simulator {
                tick_rate: scenario.tick_rate,
            })
            .run();
    }
    ExitCode::SUCCESS
}

fn run_headless(mut simulation: Simulation, ticks: u64) {
    info!("running {ticks} ticks");
    simulation.run(ticks);
    for robot in simulation.world().robots() {
        let readings = robot
            .range_sensors()
            .iter()
            .map(|sensor| format!("{:.3}", sensor.reading()))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{} x={:.2} y={:.2} direction={:.3} stalled={} ir=[{readings}]",
            robot.name(),
            robot.x(),
            robot.y(),
            robot.direction(),
            robot.stalled()
        );
    }
    println!("time={:.2}s ticks={}", simulation.time(), simulation.ticks());
}
