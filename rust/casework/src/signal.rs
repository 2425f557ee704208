//! Failure signals and the short-circuiting result channel.
//!
//! Every check and every case body returns a [`CaseResult`]. A check that
//! does not hold produces `Err(Stop::Fail(..))`, which the case body forwards
//! with `?`, so the first failing check ends the case whatever its severity.
//! The severity only decides how the runner classifies the outcome.

use std::fmt;

/// How the runner classifies a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Raised by `expect_*` checks. Reported as an assertion mismatch.
    Soft,
    /// Raised by `require_*` checks. Reported as a case-fatal error.
    Hard,
}

impl Severity {
    /// Lowercase name, used in logs and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Soft => "soft",
            Severity::Hard => "hard",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed check: its severity plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureSignal {
    pub severity: Severity,
    pub message: String,
}

impl FailureSignal {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn soft(message: impl Into<String>) -> Self {
        Self::new(Severity::Soft, message)
    }

    pub fn hard(message: impl Into<String>) -> Self {
        Self::new(Severity::Hard, message)
    }

    /// Unwind with this signal as the panic payload.
    ///
    /// For callbacks that cannot return a [`CaseResult`]. The runner and
    /// [`Check::evaluate`](crate::Check::evaluate) both recognise the payload
    /// and classify it as a signal rather than a crash.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }
}

impl fmt::Display for FailureSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Why a case body stopped before reaching its end.
///
/// `Stop` deliberately does not implement `std::error::Error`: that is what
/// allows the blanket `From` impl below, so `?` on any ordinary error inside
/// a case body turns it into [`Stop::Foreign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    /// Explicit early success (`succeed!()`). The case is reported as passed.
    Pass,
    /// A check did not hold.
    Fail(FailureSignal),
    /// An error that did not come from a check.
    Foreign(String),
}

impl Stop {
    pub fn soft(message: impl Into<String>) -> Self {
        Stop::Fail(FailureSignal::soft(message))
    }

    pub fn hard(message: impl Into<String>) -> Self {
        Stop::Fail(FailureSignal::hard(message))
    }
}

impl<E> From<E> for Stop
where
    E: std::error::Error,
{
    fn from(err: E) -> Self {
        Stop::Foreign(err.to_string())
    }
}

/// What every check and every case body returns.
pub type CaseResult = Result<(), Stop>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_severity() {
        assert_eq!(FailureSignal::soft("a").severity, Severity::Soft);
        assert_eq!(FailureSignal::hard("b").severity, Severity::Hard);
        assert_eq!(FailureSignal::hard("b").to_string(), "b");
    }

    #[test]
    fn question_mark_turns_std_errors_into_foreign_stops() {
        fn body() -> CaseResult {
            let _: u8 = "300".parse()?;
            Ok(())
        }

        match body() {
            Err(Stop::Foreign(message)) => assert!(message.contains("too large")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn raise_unwinds_with_the_signal_as_payload() {
        let result: std::thread::Result<()> =
            std::panic::catch_unwind(|| FailureSignal::hard("boom").raise());
        let payload = result.expect_err("raise must unwind");
        let signal = payload
            .downcast::<FailureSignal>()
            .expect("payload is the signal");
        assert_eq!(*signal, FailureSignal::hard("boom"));
    }
}
