use crate::stopwatch::LapRecord;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum TimerKind {
    Stopwatch,
    Timer,
}

impl TimerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::Stopwatch => "stopwatch",
            TimerKind::Timer => "timer",
        }
    }
}

/// What an engine knows when it stops or finishes. The owner attaches the
/// label and category to turn it into a [`CompletionReport`].
#[derive(Clone, PartialEq, Debug)]
pub struct Completion {
    pub kind: TimerKind,
    pub final_duration_ms: u64,
    pub target_duration_ms: Option<u64>,
    pub laps: Vec<LapRecord>,
    pub reached_target: bool,
}

impl Completion {
    pub fn labelled(self, label: &str, category: &str) -> CompletionReport {
        CompletionReport {
            label: label.to_string(),
            category: category.to_string(),
            kind: self.kind,
            final_duration_ms: self.final_duration_ms,
            target_duration_ms: self.target_duration_ms,
            laps: self.laps,
            reached_target: self.reached_target,
        }
    }
}

/// One stop/finish event. Immutable once built.
#[derive(Clone, PartialEq, Debug)]
pub struct CompletionReport {
    label: String,
    category: String,
    kind: TimerKind,
    final_duration_ms: u64,
    target_duration_ms: Option<u64>,
    laps: Vec<LapRecord>,
    reached_target: bool,
}

impl CompletionReport {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn final_duration_ms(&self) -> u64 {
        self.final_duration_ms
    }

    pub fn target_duration_ms(&self) -> Option<u64> {
        self.target_duration_ms
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn reached_target(&self) -> bool {
        self.reached_target
    }
}
