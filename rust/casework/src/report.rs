//! Run results.

use std::fmt;
use std::time::Duration;

use crate::signal::Severity;

/// How one case ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    /// A soft (`expect_*`) check failed.
    SoftFailed(String),
    /// A hard (`require_*`) check failed.
    HardFailed(String),
    /// Something outside the check protocol went wrong: a panic in
    /// uninstrumented code, or an error forwarded with `?`.
    Crashed(String),
}

impl CaseStatus {
    pub(crate) fn failed(severity: Severity, message: String) -> Self {
        match severity {
            Severity::Soft => CaseStatus::SoftFailed(message),
            Severity::Hard => CaseStatus::HardFailed(message),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, CaseStatus::Passed)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            CaseStatus::Passed => None,
            CaseStatus::SoftFailed(message)
            | CaseStatus::HardFailed(message)
            | CaseStatus::Crashed(message) => Some(message),
        }
    }

    /// Short fixed-width-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            CaseStatus::Passed => "PASS",
            CaseStatus::SoftFailed(_) => "FAIL",
            CaseStatus::HardFailed(_) => "FATAL",
            CaseStatus::Crashed(_) => "CRASH",
        }
    }

    /// Same classification, ignoring the message.
    pub fn same_kind(&self, other: &CaseStatus) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// The outcome of one executed case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub suite: String,
    pub name: String,
    pub status: CaseStatus,
    pub duration: Duration,
}

impl CaseOutcome {
    /// `Suite.name`
    pub fn id(&self) -> String {
        format!("{}.{}", self.suite, self.name)
    }
}

/// Aggregate counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub passed: usize,
    pub soft_failed: usize,
    pub hard_failed: usize,
    pub crashed: usize,
}

impl Counts {
    fn record(&mut self, status: &CaseStatus) {
        self.total += 1;
        match status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::SoftFailed(_) => self.soft_failed += 1,
            CaseStatus::HardFailed(_) => self.hard_failed += 1,
            CaseStatus::Crashed(_) => self.crashed += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total, {} passed, {} failed, {} fatal, {} crashed",
            self.total, self.passed, self.soft_failed, self.hard_failed, self.crashed
        )
    }
}

/// Every outcome of a run, in execution order, plus derived counts.
///
/// Immutable once built by the runner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    outcomes: Vec<CaseOutcome>,
    counts: Counts,
    duration: Duration,
}

impl RunReport {
    pub(crate) fn new(outcomes: Vec<CaseOutcome>, duration: Duration) -> Self {
        let mut counts = Counts::default();
        for outcome in &outcomes {
            counts.record(&outcome.status);
        }
        Self {
            outcomes,
            counts,
            duration,
        }
    }

    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.total
    }

    pub fn passed(&self) -> usize {
        self.counts.passed
    }

    pub fn soft_failed(&self) -> usize {
        self.counts.soft_failed
    }

    pub fn hard_failed(&self) -> usize {
        self.counts.hard_failed
    }

    pub fn crashed(&self) -> usize {
        self.counts.crashed
    }

    /// Wall time of the whole run.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Look up an outcome by suite and case name (first match).
    pub fn outcome(&self, suite: &str, name: &str) -> Option<&CaseOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.suite == suite && o.name == name)
    }

    /// Outcomes that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> + '_ {
        self.outcomes.iter().filter(|o| !o.status.is_passed())
    }

    /// True iff every case passed.
    pub fn is_success(&self) -> bool {
        self.counts.failed() == 0
    }

    /// Process exit status: 0 iff every case passed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }

    /// Whether two runs classified every case the same way. Messages and
    /// timings are ignored.
    pub fn same_classification(&self, other: &RunReport) -> bool {
        self.counts == other.counts
            && self.outcomes.len() == other.outcomes.len()
            && self.outcomes.iter().zip(&other.outcomes).all(|(a, b)| {
                a.suite == b.suite && a.name == b.name && a.status.same_kind(&b.status)
            })
    }
}
