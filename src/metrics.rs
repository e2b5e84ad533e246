use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing query activity.
#[derive(Default)]
pub struct QueryMetrics {
    searches: AtomicU64,
    synthesized_answers: AtomicU64,
    snippet_answers: AtomicU64,
}

impl QueryMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ranked search.
    pub fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an answer request, noting whether the heuristic produced a direct answer.
    pub fn record_answer(&self, synthesized: bool) {
        let counter = if synthesized {
            &self.synthesized_answers
        } else {
            &self.snippet_answers
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            synthesized_answers: self.synthesized_answers.load(Ordering::Relaxed),
            snippet_answers: self.snippet_answers.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of query counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Ranked searches served since startup, including those behind snippet answers.
    pub searches: u64,
    /// Answers produced directly by the latest-role heuristic.
    pub synthesized_answers: u64,
    /// Answers that fell back to ranked snippets.
    pub snippet_answers: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_searches_and_answers() {
        let metrics = QueryMetrics::new();
        metrics.record_search();
        metrics.record_answer(true);
        metrics.record_answer(false);
        metrics.record_answer(false);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.searches, 1);
        assert_eq!(snapshot.synthesized_answers, 1);
        assert_eq!(snapshot.snippet_answers, 2);
    }

    #[test]
    fn snapshot_is_consistent() {
        let metrics = QueryMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
