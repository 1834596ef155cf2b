use crate::report::{Completion, TimerKind};
use crate::{format_stopwatch, TimerState};

/// Fixed step added on every stopwatch tick.
pub const STOPWATCH_TICK_MS: u64 = 10;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LapRecord {
    pub sequence: u32,
    pub elapsed_ms: u64,
    pub display: String,
}

#[derive(Debug, Default)]
pub struct StopwatchEngine {
    elapsed_ms: u64,
    running: bool,
    target_ms: Option<u64>,
    laps: Vec<LapRecord>,
}

impl StopwatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_ms = self.elapsed_ms.saturating_add(STOPWATCH_TICK_MS);
        }
    }

    /// Stop and snapshot the run. `None` if the stopwatch was not running,
    /// so a repeated stop never reports twice.
    pub fn stop(&mut self) -> Option<Completion> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Completion {
            kind: TimerKind::Stopwatch,
            final_duration_ms: self.elapsed_ms,
            target_duration_ms: self.target_ms,
            laps: self.laps.clone(),
            reached_target: self.target_reached(),
        })
    }

    pub fn lap(&mut self) -> Option<&LapRecord> {
        if !self.running {
            return None;
        }
        self.laps.push(LapRecord {
            sequence: u32::try_from(self.laps.len()).unwrap_or(u32::MAX).saturating_add(1),
            elapsed_ms: self.elapsed_ms,
            display: format_stopwatch(self.elapsed_ms),
        });
        self.laps.last()
    }

    /// Back to zero. The target survives a reset.
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_ms = 0;
        self.laps.clear();
    }

    pub fn set_target(&mut self, minutes: Option<u64>) {
        self.target_ms = minutes.map(|m| m.saturating_mul(60_000));
    }

    pub fn target_ms(&self) -> Option<u64> {
        self.target_ms
    }

    fn target_reached(&self) -> bool {
        match self.target_ms {
            Some(target) => self.elapsed_ms >= target,
            None => true,
        }
    }

    /// Percentage of the target covered, capped at 100.
    pub fn progress_percent(&self) -> Option<f64> {
        self.target_ms.map(|target| {
            if target == 0 {
                return 100.0;
            }
            let pct = self.elapsed_ms as f64 / target as f64 * 100.0;
            if pct > 100.0 { 100.0 } else { pct }
        })
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }
}
