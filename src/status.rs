//! Running tallies for the PEP status audit.
//!
//! A [`StatusAudit`] is created per run from the configured label set, fed one
//! (expected, observed) pair per PEP, and turned into report rows at the end.

use crate::results::ResultTable;

pub const TOTAL_LABEL: &str = "Total";

/// Counts per known status label plus a synthetic total.
///
/// `total()` always equals the sum of the per-label counts.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCounter {
    counts: Vec<(String, u64)>,
    total: u64,
}

impl StatusCounter {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        Self {
            counts: labels.iter().map(|l| (l.as_ref().to_string(), 0)).collect(),
            total: 0,
        }
    }

    /// Increment `label` and the total. Returns false if the label is not tracked.
    pub fn increment(&mut self, label: &str) -> bool {
        match self.counts.iter_mut().find(|(known, _)| known == label) {
            Some((_, count)) => {
                *count += 1;
                self.total += 1;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        if label == TOTAL_LABEL {
            return Some(self.total);
        }
        self.counts
            .iter()
            .find(|(known, _)| known == label)
            .map(|(_, count)| *count)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.counts.iter().map(|(label, _)| label.as_str())
    }

    /// `Status, Count` header, one row per label in configured order, then the total.
    pub fn to_table(&self) -> ResultTable {
        let mut table = ResultTable::with_header(&["Status", "Count"]);
        for (label, count) in &self.counts {
            table.push(vec![label.clone(), count.to_string()]);
        }
        table.push(vec![TOTAL_LABEL.to_string(), self.total.to_string()]);
        table
    }
}

/// A PEP whose index status disagrees with its own page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchRecord {
    pub url: String,
    pub observed: String,
    pub expected: String,
}

impl std::fmt::Display for MismatchRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mismatched status:\n{}\nStatus on page: {}\nExpected status: {}",
            self.url, self.observed, self.expected
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusAudit {
    pub counter: StatusCounter,
    pub mismatches: Vec<MismatchRecord>,
}

impl StatusAudit {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        Self {
            counter: StatusCounter::new(labels),
            mismatches: Vec::new(),
        }
    }

    /// Count a matching pair, or log it as a mismatch without touching any counter.
    pub fn record(&mut self, url: &str, expected: &str, observed: &str) {
        if expected != observed {
            self.mismatches.push(MismatchRecord {
                url: url.to_string(),
                observed: observed.to_string(),
                expected: expected.to_string(),
            });
            return;
        }
        if !self.counter.increment(observed) {
            log::warn!("Untracked status {:?} at {}", observed, url);
        }
    }

    pub fn report_mismatches(&self) {
        for mismatch in &self.mismatches {
            log::error!("{}", mismatch);
        }
    }
}
