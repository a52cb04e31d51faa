//! Text and CSV rendering of simulation results.
//!
//! The text report is meant for a terminal: a colored execution timeline
//! cut into fixed-width windows, followed by per-process and per-CPU
//! tables and the averages. The CSV report carries the same numbers as
//! three datasets for scripted comparison.

use std::io::{self, Write};

use serde::{Serialize, Serializer};

use crate::engine::SimulationResult;
use crate::policy::Algorithm;
use crate::stats::{AverageStats, CpuStats, ProcessStats, SimStats};
use crate::timeline::Timeline;
use crate::types::{CpuId, Pid, Tick};

/// Total width of one timeline line, in columns.
pub const TIMELINE_WIDTH: usize = 80;

/// Columns per tick in the timeline.
pub const TIME_UNIT_WIDTH: usize = 5;

/// Ticks per timeline window.
pub const TICKS_PER_WINDOW: usize = (TIMELINE_WIDTH - 5) / TIME_UNIT_WIDTH;

/// Color key entries per line.
const KEY_PER_ROW: usize = 8;

const COLOR_RESET: &str = "\x1b[0m";
const PROCESS_COLORS: [&str; 7] = [
    "\x1b[31m", "\x1b[32m", "\x1b[33m", "\x1b[34m", "\x1b[35m", "\x1b[36m", "\x1b[37m",
];

const TABLE_RULE: &str = "----------------------------------------------------------------";
const CPU_RULE: &str = "------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Emit ANSI colors in the timeline.
    pub color: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions { color: true }
    }
}

/// ANSI color for a pid. Negative pids wrap like positive ones.
pub fn pid_color(pid: Pid) -> &'static str {
    PROCESS_COLORS[pid.0.rem_euclid(PROCESS_COLORS.len() as i32) as usize]
}

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, pid: Pid, text: &str) -> String {
        if self.color {
            format!("{}{text}{COLOR_RESET}", pid_color(pid))
        } else {
            text.to_string()
        }
    }
}

/// "Starting simulation with ..." line.
pub fn write_header<W: Write>(
    w: &mut W,
    algorithm: Algorithm,
    nr_cpus: u32,
    quantum: Tick,
) -> io::Result<()> {
    write!(
        w,
        "\nStarting simulation with {} on {nr_cpus} CPU(s)",
        algorithm.full_name()
    )?;
    if algorithm == Algorithm::Rr {
        write!(w, ", Quantum={quantum}")?;
    }
    writeln!(w)
}

/// Color key followed by the timeline in windows of [`TICKS_PER_WINDOW`].
pub fn write_timeline<W: Write>(
    w: &mut W,
    timeline: &Timeline,
    pids: &[Pid],
    opts: ReportOptions,
) -> io::Result<()> {
    let painter = Painter { color: opts.color };

    writeln!(w, "\nExecution Timeline:")?;
    writeln!(w, "\nColor Key:")?;
    for (i, pid) in pids.iter().enumerate() {
        write!(w, "{} ", painter.paint(*pid, &format!("PID {:<2}", pid.0)))?;
        if (i + 1) % KEY_PER_ROW == 0 && i + 1 < pids.len() {
            writeln!(w)?;
        }
    }
    writeln!(w)?;

    let total = timeline.len();
    for start in (0..total).step_by(TICKS_PER_WINDOW) {
        let end = (start + TICKS_PER_WINDOW).min(total);
        writeln!(w, "\nTime {start} to {}:", end - 1)?;

        write!(w, "Time: ")?;
        for t in start..end {
            write!(w, "{t:<width$}", width = TIME_UNIT_WIDTH)?;
        }
        writeln!(w)?;

        for cpu in 0..timeline.nr_cpus() {
            write!(w, "CPU{cpu:<2} ")?;
            for t in start..end {
                match timeline.get(t as Tick, CpuId(cpu)) {
                    None => write!(w, "{:<width$}", ".", width = TIME_UNIT_WIDTH)?,
                    Some(pid) => {
                        let cell = format!("{:<width$}", pid.0, width = TIME_UNIT_WIDTH);
                        write!(w, "{}", painter.paint(pid, &cell))?;
                    }
                }
            }
            writeln!(w)?;
        }
    }
    Ok(())
}

pub fn write_process_table<W: Write>(w: &mut W, procs: &[ProcessStats]) -> io::Result<()> {
    writeln!(w, "\nProcess Statistics:")?;
    writeln!(
        w,
        "{:<6} {:<7} {:<7} {:<7} {:<7} {:<7} {:<7} {:<7}",
        "PID", "Arrival", "Burst", "Start", "Finish", "Turn.", "Waiting", "Resp."
    )?;
    writeln!(w, "{TABLE_RULE}")?;

    for p in procs {
        let (Some(finish), Some(turnaround), Some(waiting)) = (p.finish, p.turnaround, p.waiting)
        else {
            let started = |v: Option<Tick>| if v.is_some() { "-" } else { "N/A" };
            writeln!(
                w,
                "{:<6} {:<7} {:<7} {:<7} {:<7} {:<7} {:<7} {:<7}",
                p.pid.0,
                p.arrival,
                p.burst,
                started(p.start),
                "N/A",
                "N/A",
                "N/A",
                started(p.response)
            )?;
            continue;
        };
        writeln!(
            w,
            "{:<6} {:<7} {:<7} {:<7} {:<7} {:<7} {:<7} {:<7}",
            p.pid.0,
            p.arrival,
            p.burst,
            p.start.unwrap_or_default(),
            finish,
            turnaround,
            waiting,
            p.response.unwrap_or_default()
        )?;
    }
    writeln!(w, "{TABLE_RULE}")
}

pub fn write_cpu_table<W: Write>(w: &mut W, cpus: &[CpuStats]) -> io::Result<()> {
    writeln!(w, "\nCPU Statistics:")?;
    writeln!(
        w,
        "{:<6} {:<9} {:<9} {:<12}",
        "CPU ID", "Busy Time", "Idle Time", "Utilization"
    )?;
    writeln!(w, "{CPU_RULE}")?;
    for c in cpus {
        writeln!(
            w,
            "{:<6} {:<9} {:<9} {:<11.2}%",
            c.cpu.0, c.busy, c.idle, c.utilization
        )?;
    }
    writeln!(w, "{CPU_RULE}")
}

pub fn write_averages<W: Write>(w: &mut W, averages: Option<&AverageStats>) -> io::Result<()> {
    let Some(avg) = averages else {
        return writeln!(
            w,
            "\nNo processes completed. Cannot calculate average statistics."
        );
    };
    writeln!(
        w,
        "\nAverage Statistics (for {} completed processes):",
        avg.completed()
    )?;
    for (label, metric) in [
        ("Turnaround", &avg.turnaround),
        ("Waiting", &avg.waiting),
        ("Response", &avg.response),
    ] {
        let label = format!("{label} Time:");
        write!(w, "  Average {label:<17}{:.2}", metric.mean())?;
        if let Some((lo, hi)) = metric.range {
            write!(w, "  (min {lo}, max {hi})")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Full text report: timeline, process table, CPU table and averages.
pub fn write_report<W: Write>(
    w: &mut W,
    result: &SimulationResult,
    stats: &SimStats,
    opts: ReportOptions,
) -> io::Result<()> {
    writeln!(w, "\n--- Simulation Results ---")?;
    let pids: Vec<Pid> = result.processes.iter().map(|p| p.pid).collect();
    write_timeline(w, &result.timeline, &pids, opts)?;
    write_process_table(w, &stats.processes)?;
    write_cpu_table(w, &stats.cpus)?;
    write_averages(w, stats.averages.as_ref())
}

fn na_or_tick<S: Serializer>(v: &Option<Tick>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(v) => s.serialize_u64(*v),
        None => s.serialize_str("N/A"),
    }
}

fn two_decimals<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{v:.2}"))
}

fn na_or_two_decimals<S: Serializer>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(v) => two_decimals(v, s),
        None => s.serialize_str("N/A"),
    }
}

#[derive(Debug, Serialize)]
struct ProcessRow {
    #[serde(rename = "PID")]
    pid: i32,
    #[serde(rename = "Arrival")]
    arrival: Tick,
    #[serde(rename = "Burst")]
    burst: Tick,
    #[serde(rename = "Priority")]
    priority: i32,
    #[serde(rename = "Start", serialize_with = "na_or_tick")]
    start: Option<Tick>,
    #[serde(rename = "Finish", serialize_with = "na_or_tick")]
    finish: Option<Tick>,
    #[serde(rename = "Turnaround", serialize_with = "na_or_tick")]
    turnaround: Option<Tick>,
    #[serde(rename = "Waiting", serialize_with = "na_or_tick")]
    waiting: Option<Tick>,
    #[serde(rename = "Response", serialize_with = "na_or_tick")]
    response: Option<Tick>,
}

impl From<&ProcessStats> for ProcessRow {
    fn from(p: &ProcessStats) -> Self {
        // Unfinished processes report every derived column as N/A.
        let done = p.is_completed();
        let when_done = |v: Option<Tick>| if done { v } else { None };
        ProcessRow {
            pid: p.pid.0,
            arrival: p.arrival,
            burst: p.burst,
            priority: p.priority,
            start: when_done(p.start),
            finish: p.finish,
            turnaround: p.turnaround,
            waiting: p.waiting,
            response: when_done(p.response),
        }
    }
}

#[derive(Debug, Serialize)]
struct CpuRow {
    #[serde(rename = "CPU_ID")]
    cpu: u32,
    #[serde(rename = "BusyTime")]
    busy: Tick,
    #[serde(rename = "IdleTime")]
    idle: Tick,
    #[serde(rename = "Utilization%", serialize_with = "two_decimals")]
    utilization: f64,
}

#[derive(Debug, Serialize)]
struct AverageRow {
    #[serde(rename = "AvgTurnaround", serialize_with = "na_or_two_decimals")]
    turnaround: Option<f64>,
    #[serde(rename = "AvgWaiting", serialize_with = "na_or_two_decimals")]
    waiting: Option<f64>,
    #[serde(rename = "AvgResponse", serialize_with = "na_or_two_decimals")]
    response: Option<f64>,
}

fn write_dataset<W, R, I>(w: &mut W, rows: I) -> csv::Result<()>
where
    W: Write,
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut wtr = csv::Writer::from_writer(&mut *w);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// The three CSV datasets, each preceded by a title line.
pub fn write_csv<W: Write>(w: &mut W, stats: &SimStats) -> csv::Result<()> {
    writeln!(w, "\nProcess Stats (CSV):")?;
    write_dataset(w, stats.processes.iter().map(ProcessRow::from))?;

    writeln!(w, "\nCPU Stats (CSV):")?;
    write_dataset(
        w,
        stats.cpus.iter().map(|c| CpuRow {
            cpu: c.cpu.0,
            busy: c.busy,
            idle: c.idle,
            utilization: c.utilization,
        }),
    )?;

    writeln!(w, "\nAverage Stats (CSV):")?;
    let avg = stats.averages.as_ref();
    write_dataset(
        w,
        [AverageRow {
            turnaround: avg.map(|a| a.turnaround.mean()),
            waiting: avg.map(|a| a.waiting.mean()),
            response: avg.map(|a| a.response.mean()),
        }],
    )?;
    Ok(())
}
