//! Pure time-tracking logic with no platform dependencies.
//! Engines advance on fixed-step ticks supplied by the caller, so every
//! transition is testable on host without a clock.

mod aggregator;
mod countdown;
mod duration;
mod report;
mod stopwatch;

pub use aggregator::{ProductivitySummary, TaskAggregator};
pub use countdown::{TimerEngine, TimerError, COUNTDOWN_TICK_MS};
pub use duration::{parse_hms, DurationError, DEFAULT_TIMER_INPUT};
pub use report::{Completion, CompletionReport, TimerKind};
pub use stopwatch::{LapRecord, StopwatchEngine, STOPWATCH_TICK_MS};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Configured,
    Running,
    Paused,
}

/// Format milliseconds as "MM:SS.CC". Minutes do not roll over into hours.
pub fn format_stopwatch(ms: u64) -> String {
    let m = ms / 60_000;
    let s = (ms % 60_000) / 1000;
    let cs = (ms % 1000) / 10;
    format!("{:02}:{:02}.{:02}", m, s, cs)
}

/// Format milliseconds as "HH:MM:SS"
pub fn format_timer(ms: u64) -> String {
    let h = ms / 3_600_000;
    let m = (ms % 3_600_000) / 60_000;
    let s = (ms % 60_000) / 1000;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Format milliseconds as "Xh Ym Zs" for summaries.
pub fn format_duration(ms: u64) -> String {
    let h = ms / 3_600_000;
    let m = (ms % 3_600_000) / 60_000;
    let s = (ms % 60_000) / 1000;
    format!("{}h {}m {}s", h, m, s)
}
