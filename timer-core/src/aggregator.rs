use std::collections::BTreeMap;

use crate::report::CompletionReport;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ProductivitySummary {
    pub total_ms: u64,
    pub completed: usize,
}

/// Append-only log of completion reports.
#[derive(Debug, Default)]
pub struct TaskAggregator {
    reports: Vec<CompletionReport>,
}

impl TaskAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_completion(&mut self, report: CompletionReport) {
        self.reports.push(report);
    }

    pub fn total_productive_ms(&self) -> u64 {
        self.reports
            .iter()
            .fold(0u64, |total, r| total.saturating_add(r.final_duration_ms()))
    }

    /// Reports in recording order. The iterator is `Clone`, so a display can
    /// walk it again without asking for a new one.
    pub fn list_completions(&self) -> impl Iterator<Item = &CompletionReport> + Clone + '_ {
        self.reports.iter()
    }

    pub fn summary(&self) -> ProductivitySummary {
        ProductivitySummary {
            total_ms: self.total_productive_ms(),
            completed: self.reports.len(),
        }
    }

    pub fn totals_by_category(&self) -> BTreeMap<String, u64> {
        let mut totals = BTreeMap::new();
        for r in &self.reports {
            let slot = totals.entry(r.category().to_string()).or_insert(0u64);
            *slot = slot.saturating_add(r.final_duration_ms());
        }
        totals
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
