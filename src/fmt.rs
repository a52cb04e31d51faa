//! Compact formatting helpers for log output.

use std::cell::Cell;
use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::types::Tick;

thread_local! {
    static SIM_TICK: Cell<Option<Tick>> = const { Cell::new(None) };
}

/// Set the tick shown on log lines from this thread. `None` outside a run.
pub fn set_sim_tick(tick: Option<Tick>) {
    SIM_TICK.with(|t| t.set(tick));
}

/// Tick of the simulation running on this thread, if any.
pub fn sim_tick() -> Option<Tick> {
    SIM_TICK.with(Cell::get)
}

/// Displays a tick count with `_` between groups of three digits.
struct Grouped(u64);

impl fmt::Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1_000 {
            return write!(f, "{}", self.0);
        }
        write!(f, "{}_{:03}", Grouped(self.0 / 1_000), self.0 % 1_000)
    }
}

/// Tick stamp for log lines, right-aligned with grouped digits.
///
/// - `[       42:T]` inside a run
/// - `[        -:T]` outside a run
pub struct FmtTick(pub Option<Tick>);

impl fmt::Display for FmtTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            // Padding needs the rendered width, so render first.
            Some(tick) => write!(f, "{:>9}:T", Grouped(tick).to_string()),
            None => write!(f, "{:>9}:T", "-"),
        }
    }
}

/// Event formatter that shows the simulated tick instead of wall-clock
/// time and uses plain colored text (no italic/background).
pub struct SimFormat;

impl<S, N> FormatEvent<S, N> for SimFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}] ", FmtTick(sim_tick()))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::ERROR => "\x1b[31m",
                Level::WARN => "\x1b[33m",
                Level::INFO => "\x1b[32m",
                Level::DEBUG => "\x1b[34m",
                Level::TRACE => "\x1b[35m",
            };
            write!(writer, "{color}{level:>5}\x1b[0m ")?;
        } else {
            write!(writer, "{level:>5} ")?;
        }

        let mut line = EventLine::default();
        event.record(&mut line);
        writeln!(writer, "{}{}", line.message, line.fields)
    }
}

/// The message of an event followed by its ` key=value` pairs.
#[derive(Default)]
struct EventLine {
    message: String,
    fields: String,
}

impl Visit for EventLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            name => {
                let _ = write!(self.fields, " {name}={value}");
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            name => {
                let _ = write!(self.fields, " {name}={value:?}");
            }
        }
    }
}
