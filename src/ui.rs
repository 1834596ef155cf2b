use std::fmt::Write;

use timer_core::{
    format_duration, CompletionReport, LapRecord, TaskAggregator, TimerKind, TimerState,
};

use crate::app::Snapshot;

const BAR_WIDTH: usize = 20;

pub const HELP_TEXT: &str = "\
Commands:
  add stopwatch|timer [label]   new entry (ctrl+s / ctrl+t also work)
  start <id> | stop <id>        run or halt an entry
  lap <id>                      record a lap on a running stopwatch
  reset <id>                    back to zero
  rename <id> [label]           relabel; without a label you are asked
  target <id> [minutes]         stopwatch goal; omit minutes to clear
  duration <id> HH:MM:SS        countdown length
  category <id> <tag>           activity tag used in the summary
  remove <id>                   delete an entry
  list | summary | help | quit";

fn progress_bar(pct: f64) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}] {:>3.0}%", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled), pct)
}

fn state_label(state: TimerState) -> &'static str {
    match state {
        TimerState::Idle => "idle",
        TimerState::Configured => "ready",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
    }
}

pub fn draw_board(snapshots: &[Snapshot]) -> String {
    let mut out = String::new();
    if snapshots.is_empty() {
        out.push_str("No timers. Try `add stopwatch`.\n");
        return out;
    }
    for snap in snapshots {
        let icon = match snap.kind {
            TimerKind::Stopwatch => "SW",
            TimerKind::Timer => "TM",
        };
        write!(
            out,
            "#{:<3} {} {:<24} {:>12}  {:<7}",
            snap.id,
            icon,
            snap.label,
            snap.display,
            state_label(snap.state)
        )
        .ok();
        if let Some(pct) = snap.progress {
            write!(out, "  {}", progress_bar(pct)).ok();
        }
        if snap.category != snap.kind.as_str() {
            write!(out, "  ({})", snap.category).ok();
        }
        out.push('\n');
        if let Some(input) = &snap.duration_input {
            if snap.state == TimerState::Idle {
                writeln!(out, "      duration {}", input).ok();
            }
        }
        for lap in &snap.laps {
            writeln!(out, "      {}", draw_lap(lap)).ok();
        }
    }
    out
}

/// One-line view for live refresh.
pub fn draw_status_line(snapshots: &[Snapshot]) -> String {
    snapshots
        .iter()
        .filter(|s| s.state == TimerState::Running)
        .map(|s| format!("{} {}", s.label, s.display))
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn draw_lap(lap: &LapRecord) -> String {
    format!("Lap {}: {}", lap.sequence, lap.display)
}

pub fn draw_completion(report: &CompletionReport) -> String {
    let mut out = format!(
        "Completed: {} - {}",
        report.label(),
        format_duration(report.final_duration_ms())
    );
    if let Some(target) = report.target_duration_ms() {
        let verdict = if report.reached_target() { "reached" } else { "missed" };
        write!(out, " (target {} {})", format_duration(target), verdict).ok();
    }
    if !report.laps().is_empty() {
        write!(out, ", {} lap(s)", report.laps().len()).ok();
    }
    out
}

pub fn draw_summary(aggregator: &TaskAggregator) -> String {
    let mut out = String::new();
    writeln!(out, "Productivity Summary").ok();
    writeln!(
        out,
        "Total Productive Time: {}",
        format_duration(aggregator.total_productive_ms())
    )
    .ok();
    writeln!(out, "Completed Tasks:").ok();
    for report in aggregator.list_completions() {
        let duration = format_duration(report.final_duration_ms());
        writeln!(out, "  {} - {}", report.label(), duration).ok();
    }
    let by_category = aggregator.totals_by_category();
    if by_category.len() > 1 {
        writeln!(out, "By category:").ok();
        for (category, ms) in by_category {
            writeln!(out, "  {}: {}", category, format_duration(ms)).ok();
        }
    }
    out
}
