//! schedsim - Run a scheduling simulation over a workload file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use schedsim::report::{write_csv, write_header, write_report, ReportOptions};
use schedsim::{load_workload, Algorithm, Scenario, SimConfig, SimFormat, SimStats};

/// Simulate FCFS, RR, SRTF or SJF scheduling on one or more CPUs.
#[derive(Parser)]
#[command(name = "schedsim")]
struct Cli {
    /// Workload file: one "<pid> <arrival> <burst> [priority]" per line.
    #[arg(short, long, value_name = "PATH")]
    file: PathBuf,

    /// Scheduling algorithm (FCFS, RR, SRTF, SJF), case-insensitive.
    #[arg(short, long, env = "SCHEDSIM_ALGORITHM", default_value = "FCFS")]
    algorithm: Algorithm,

    /// Number of simulated CPUs. Values below 1 become 1.
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    cpus: i64,

    /// Round Robin time quantum in ticks. Values below 1 fall back to 2.
    #[arg(short, long, default_value_t = 2, allow_negative_numbers = true)]
    quantum: i64,

    /// Abort the run after this many ticks.
    ///
    /// Defaults to five times the larger of 1000 and the last arrival plus
    /// the total burst.
    #[arg(long, value_name = "TICKS")]
    max_ticks: Option<u64>,

    /// Print the timeline without ANSI colors.
    #[arg(long)]
    no_color: bool,

    /// Print scheduling events to stderr.
    #[arg(long)]
    dump_trace: bool,

    /// Also write the CSV datasets to this file.
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = SimConfig::new(cli.file.clone())
        .algorithm(cli.algorithm)
        .cpus(cli.cpus)
        .quantum(cli.quantum)
        .tick_limit(cli.max_ticks);

    let workload = load_workload(&config.input)
        .with_context(|| format!("failed to load workload {}", config.input.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if workload.processes.is_empty() {
        writeln!(
            out,
            "Warning: No valid processes found in {}",
            config.input.display()
        )?;
        writeln!(out, "No processes loaded or simulation not possible.")?;
        out.flush()?;
        return Ok(());
    }
    writeln!(
        out,
        "Loaded {} processes from {}",
        workload.processes.len(),
        config.input.display()
    )?;

    let mut builder = Scenario::builder()
        .cpus(config.nr_cpus)
        .processes(workload.processes);
    if let Some(limit) = config.tick_limit {
        builder = builder.tick_limit(limit);
    }
    let scenario = builder.build();

    write_header(&mut out, config.algorithm, config.nr_cpus, config.quantum)?;
    out.flush()?;

    let result = config.simulator().run(&scenario);
    if cli.dump_trace {
        result.trace.dump();
    }
    let stats = SimStats::from_result(&result);

    let opts = ReportOptions {
        color: !cli.no_color,
    };
    write_report(&mut out, &result, &stats, opts).context("failed to write report")?;

    writeln!(out, "\n\n--- CSV Output ---")?;
    write_csv(&mut out, &stats).context("failed to write CSV output")?;
    writeln!(out, "--- End CSV Output ---")?;
    out.flush()?;

    if let Some(path) = &cli.csv {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        write_csv(&mut w, &stats).with_context(|| format!("failed to write {}", path.display()))?;
        w.flush()?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .event_format(SimFormat)
        .try_init();
}
