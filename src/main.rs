use solsim::{load_scenario, Scenario};
use solsim::{bench_advance, bench_gravity};
use solsim::simulation::diagnostics::{has_non_finite, readouts, total_energy};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "solsim")]
#[command(about = "Headless solar-system N-body simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario for a number of ticks and print where everything ended up
    Run {
        /// Scenario file, relative paths resolve against ./scenarios
        #[arg(short, long, default_value = "solar_system.yaml")]
        file_name: PathBuf,

        #[arg(short, long, default_value_t = 10_000)]
        ticks: usize,

        /// Override the scenario's initial time scale
        #[arg(long)]
        time_scale: Option<f64>,

        /// Log energy drift every K ticks, 0 disables
        #[arg(long, default_value_t = 1_000)]
        report_every: usize,
    },
    /// Time the force pass and a full tick over a range of body counts
    Bench {
        #[arg(long, default_value_t = 64)]
        max_n: usize,

        #[arg(long, default_value_t = 100)]
        steps: usize,
    },
}

// resolve here to keep main clean
fn scenario_path(file_name: PathBuf) -> PathBuf {
    if file_name.is_absolute() || file_name.exists() {
        file_name
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
    }
}

fn run(file_name: PathBuf, ticks: usize, time_scale: Option<f64>, report_every: usize) -> Result<()> {
    let path = scenario_path(file_name);
    let cfg = load_scenario(&path).with_context(|| format!("loading {}", path.display()))?;
    let mut scenario = Scenario::build_scenario(cfg).context("building scenario")?;
    if let Some(scale) = time_scale {
        scenario.engine.set_time_scale(scale);
    }

    let (g, eps) = (scenario.parameters.G, scenario.parameters.eps);
    let e0 = total_energy(&scenario.system, g, eps);

    for i in 1..=ticks {
        scenario.tick();
        if report_every > 0 && i % report_every == 0 {
            let e = total_energy(&scenario.system, g, eps);
            debug!(tick = i, t = scenario.system.t, drift = (e - e0) / e0.abs(), "energy");
        }
    }

    if has_non_finite(&scenario.system) {
        warn!("non-finite state after {ticks} ticks");
    }
    info!(ticks, t = scenario.system.t, "run finished");

    println!("{:<10} {:>12} {:>12} {:>10}", "body", "mass", "distance", "speed");
    for r in readouts(&scenario.system) {
        println!("{:<10} {:>12.3e} {:>12.4} {:>10.4}", r.name, r.mass, r.distance_from_central, r.speed);
    }
    for s in &scenario.system.satellites {
        println!("{:<10} {:>12.3e} angle {:.4} rad", s.name, s.m, s.angle);
    }
    Ok(())
}

fn bench(max_n: usize, steps: usize) {
    let ns: Vec<usize> = std::iter::successors(Some(2usize), |n| n.checked_mul(2))
        .take_while(|&n| n <= max_n.max(2))
        .collect();

    println!("N,force_ms,tick_ms");
    let forces = bench_gravity(&ns);
    let ticks = bench_advance(&ns, steps);
    for (f, t) in forces.iter().zip(ticks.iter()) {
        println!("{},{:.6},{:.6}", f.n, f.ms, t.ms);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Run { file_name, ticks, time_scale, report_every } => run(file_name, ticks, time_scale, report_every)?,
        Command::Bench { max_n, steps } => bench(max_n, steps),
    }

    Ok(())
}
