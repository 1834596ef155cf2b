use serde::{Deserialize, Serialize};
use timer_core::{StopwatchEngine, TimerEngine, TimerKind};

/// Persisted description of one widget on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEntry {
    pub id: u64,
    #[serde(rename = "type", with = "kind_serde")]
    pub kind: TimerKind,
    pub label: String,
    #[serde(default)]
    pub category: String,
}

impl TimerEntry {
    pub fn new(id: u64, kind: TimerKind, label: String) -> Self {
        Self {
            id,
            kind,
            label,
            category: kind.as_str().to_string(),
        }
    }

    /// Category to stamp on reports, falling back to the kind name.
    pub fn category(&self) -> &str {
        if self.category.is_empty() { self.kind.as_str() } else { self.category.as_str() }
    }
}

pub fn default_entries() -> Vec<TimerEntry> {
    vec![TimerEntry::new(1, TimerKind::Stopwatch, "Task 1".to_string())]
}

mod kind_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use timer_core::TimerKind;

    pub fn serialize<S: Serializer>(kind: &TimerKind, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(kind.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TimerKind, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.as_str() {
            "stopwatch" => Ok(TimerKind::Stopwatch),
            "timer" => Ok(TimerKind::Timer),
            other => Err(serde::de::Error::unknown_variant(other, &["stopwatch", "timer"])),
        }
    }
}

pub enum Engine {
    Stopwatch(StopwatchEngine),
    Timer(TimerEngine),
}

impl Engine {
    pub fn for_kind(kind: TimerKind) -> Self {
        match kind {
            TimerKind::Stopwatch => Engine::Stopwatch(StopwatchEngine::new()),
            TimerKind::Timer => Engine::Timer(TimerEngine::new()),
        }
    }

    pub fn is_running(&self) -> bool {
        match self {
            Engine::Stopwatch(sw) => sw.is_running(),
            Engine::Timer(cd) => cd.is_running(),
        }
    }
}
