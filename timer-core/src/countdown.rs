use thiserror::Error;

use crate::duration::{hms_to_ms, parse_hms, DurationError, DEFAULT_TIMER_INPUT};
use crate::report::{Completion, TimerKind};
use crate::TimerState;

/// Countdown step per tick.
pub const COUNTDOWN_TICK_MS: u64 = 1000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error(transparent)]
    Duration(#[from] DurationError),

    #[error("timer is busy; reset it before setting a new duration")]
    Busy,

    #[error("timer has no duration set")]
    ZeroDuration,
}

#[derive(Debug)]
pub struct TimerEngine {
    remaining_ms: u64,
    initial_ms: u64,
    running: bool,
    /// Stopped mid-countdown with time left.
    paused: bool,
    input: String,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self {
            remaining_ms: 0,
            initial_ms: 0,
            running: false,
            paused: false,
            input: DEFAULT_TIMER_INPUT.to_string(),
        }
    }
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only legal while idle: not running and nothing left on the clock.
    pub fn configure(&mut self, hh: u64, mm: u64, ss: u64) -> Result<(), TimerError> {
        if self.running || self.remaining_ms > 0 {
            return Err(TimerError::Busy);
        }
        let ms = hms_to_ms(hh, mm, ss)?;
        self.apply(ms, format!("{:02}:{:02}:{:02}", hh, mm, ss));
        Ok(())
    }

    /// Parse and apply "HH:MM:SS". The text is kept so a finished timer
    /// restarts with the same duration.
    pub fn configure_str(&mut self, input: &str) -> Result<(), TimerError> {
        if self.running || self.remaining_ms > 0 {
            return Err(TimerError::Busy);
        }
        let ms = parse_hms(input)?;
        self.apply(ms, input.trim().to_string());
        Ok(())
    }

    fn apply(&mut self, ms: u64, input: String) {
        self.initial_ms = ms;
        self.remaining_ms = ms;
        self.paused = false;
        self.input = input;
    }

    /// Start or resume. Returns `Ok(false)` when already running.
    pub fn start(&mut self) -> Result<bool, TimerError> {
        if self.running {
            return Ok(false);
        }
        if self.remaining_ms == 0 {
            let input = self.input.clone();
            self.configure_str(&input)?;
        }
        if self.remaining_ms == 0 {
            return Err(TimerError::ZeroDuration);
        }
        self.running = true;
        self.paused = false;
        Ok(true)
    }

    /// Count down one step. Emits the completion when the clock hits zero.
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.running {
            return None;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(COUNTDOWN_TICK_MS);
        if self.remaining_ms > 0 {
            return None;
        }
        self.running = false;
        Some(Completion {
            kind: TimerKind::Timer,
            final_duration_ms: self.initial_ms,
            target_duration_ms: Some(self.initial_ms),
            laps: Vec::new(),
            reached_target: true,
        })
    }

    /// Pause mid-countdown. Never produces a report.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.paused |= was_running;
        was_running
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.paused = false;
        self.remaining_ms = 0;
        self.initial_ms = 0;
        self.input = DEFAULT_TIMER_INPUT.to_string();
    }

    pub fn progress_percent(&self) -> f64 {
        if self.initial_ms == 0 {
            return 0.0;
        }
        (self.initial_ms - self.remaining_ms) as f64 / self.initial_ms as f64 * 100.0
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn initial_ms(&self) -> u64 {
        self.initial_ms
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> TimerState {
        if self.running {
            TimerState::Running
        } else if self.paused {
            TimerState::Paused
        } else if self.remaining_ms == 0 {
            TimerState::Idle
        } else {
            TimerState::Configured
        }
    }
}
