//! Workforce planner command line
//!
//! ```text
//! wfm-plan plan --config plan.toml --intervals intervals.json \
//!     --staffing staffing.json --disciplines disciplines.json --out plan.json
//! wfm-plan erlang --contacts 96 --aht 300 --agents 10
//! wfm-plan solve --contacts 96 --aht 300 --target 0.8 --shrinkage 0.3
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wfm_planner_core_rs::queueing::erlang_metrics;
use wfm_planner_core_rs::staffing::{
    required_agents_realtime, required_agents_throughput, SolverConfig,
};
use wfm_planner_core_rs::{
    discipline_map, DisciplineAssignment, IntervalRecord, Planner, PlannerConfig, StaffingRecord,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Contact-center forecasting and scenario planning", long_about = None)]
struct Args {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Forecast demand and simulate the scenario catalog
    Plan {
        /// TOML planner configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON array of historical interval records
        #[arg(long)]
        intervals: PathBuf,

        /// JSON array of historical staffing records
        #[arg(long)]
        staffing: Option<PathBuf>,

        /// JSON array of {channel, queue, discipline} entries
        #[arg(long)]
        disciplines: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Erlang-C metrics for a single interval
    Erlang {
        #[arg(long)]
        contacts: f64,

        /// Average handle time in seconds
        #[arg(long)]
        aht: f64,

        #[arg(long)]
        agents: u32,

        /// Service-level threshold in seconds
        #[arg(long, default_value = "20")]
        threshold: f64,

        #[arg(long, default_value = "3600")]
        interval_seconds: u32,
    },

    /// Minimum staffing for a single interval
    Solve {
        #[arg(long)]
        contacts: f64,

        #[arg(long)]
        aht: f64,

        #[arg(long, default_value = "0.8")]
        target: f64,

        #[arg(long, default_value = "20")]
        threshold: f64,

        #[arg(long, default_value = "0.3")]
        shrinkage: f64,

        #[arg(long, default_value = "3600")]
        interval_seconds: u32,

        #[arg(long, value_enum, default_value = "real-time")]
        discipline: Discipline,

        /// Throughput productivity factor
        #[arg(long, default_value = "1.0")]
        productivity: f64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Discipline {
    RealTime,
    Throughput,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    let Some(path) = path else {
        return Ok(PlannerConfig::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    PlannerConfig::from_toml_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_output(out: Option<&Path>, body: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "plan written");
        }
        None => println!("{}", body),
    }
    Ok(())
}

fn run_plan(
    config: Option<&Path>,
    intervals: &Path,
    staffing: Option<&Path>,
    disciplines: Option<&Path>,
    out: Option<&Path>,
) -> Result<()> {
    let planner = Planner::new(load_config(config)?).context("invalid planner configuration")?;

    let history: Vec<IntervalRecord> = read_json(intervals)?;
    let staffing: Vec<StaffingRecord> = match staffing {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    let assignments: Vec<DisciplineAssignment> = match disciplines {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };

    let output = planner
        .run(&history, &staffing, &discipline_map(assignments))
        .context("planning run failed")?;
    write_output(out, &serde_json::to_string_pretty(&output)?)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    EnvFilter::new(format!("wfm_planner_core_rs={level},wfm_plan={level}"))
                }),
        )
        .init();

    match args.command {
        Command::Plan {
            config,
            intervals,
            staffing,
            disciplines,
            out,
        } => run_plan(
            config.as_deref(),
            &intervals,
            staffing.as_deref(),
            disciplines.as_deref(),
            out.as_deref(),
        ),
        Command::Erlang {
            contacts,
            aht,
            agents,
            threshold,
            interval_seconds,
        } => {
            let result = erlang_metrics(contacts, interval_seconds, aht, agents, threshold)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Command::Solve {
            contacts,
            aht,
            target,
            threshold,
            shrinkage,
            interval_seconds,
            discipline,
            productivity,
        } => {
            let solver = SolverConfig::default();
            let result = match discipline {
                Discipline::RealTime => required_agents_realtime(
                    contacts,
                    interval_seconds,
                    aht,
                    threshold,
                    target,
                    shrinkage,
                    &solver,
                )?,
                Discipline::Throughput => required_agents_throughput(
                    contacts,
                    interval_seconds,
                    aht,
                    shrinkage,
                    productivity,
                    &solver,
                )?,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}
