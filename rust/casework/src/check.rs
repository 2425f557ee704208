//! The check protocol.
//!
//! A check is evaluated in two layers:
//!
//! - a *verdict* function (`eq`, `lt`, `str_eq_ignore_case`, ...) decides
//!   whether the relation holds and, if not, describes the operands;
//! - [`Check::evaluate`] runs the verdict under `catch_unwind` and turns the
//!   outcome into a [`CaseResult`] at the check's [`Severity`].
//!
//! A panic while evaluating the condition (including inside a user's
//! `PartialEq` or predicate) is re-signalled at the check's own severity, so
//! it is attributed to the check instead of crashing the case.
//!
//! The `expect_*!` / `require_*!` macros evaluate their operands inside the
//! verdict closure and label the failure with the operand source text.

use std::any::{Any, type_name};
use std::fmt::{Debug, Display};
use std::panic::{self, AssertUnwindSafe};

use crate::float::Float;
use crate::raise::{self, Raise, Raised, payload_message};
use crate::signal::{CaseResult, FailureSignal, Severity, Stop};

/// `Ok(())` if the relation holds, otherwise a description of the operands.
pub type Verdict = Result<(), String>;

/// One check: a severity and, when invoked through a macro, a label made of
/// the macro name and the operand source text.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    severity: Severity,
    label: Option<Label>,
}

#[derive(Debug, Clone, Copy)]
struct Label {
    name: &'static str,
    operands: &'static str,
}

impl Check {
    pub const fn new(severity: Severity) -> Self {
        Self {
            severity,
            label: None,
        }
    }

    /// A check whose failure is reported as an assertion mismatch.
    pub const fn soft() -> Self {
        Self::new(Severity::Soft)
    }

    /// A check whose failure is reported as a case-fatal error.
    pub const fn hard() -> Self {
        Self::new(Severity::Hard)
    }

    /// Attach the invoking macro's name and operand text to failure messages.
    pub const fn labeled(mut self, name: &'static str, operands: &'static str) -> Self {
        self.label = Some(Label { name, operands });
        self
    }

    fn stop(&self, detail: impl Display) -> Stop {
        let message = match self.label {
            Some(label) => format!("{}!({}): {}", label.name, label.operands, detail),
            None => detail.to_string(),
        };
        Stop::Fail(FailureSignal::new(self.severity, message))
    }

    /// Run a verdict and classify it at this check's severity.
    pub fn evaluate<F>(self, verdict: F) -> CaseResult
    where
        F: FnOnce() -> Verdict,
    {
        match panic::catch_unwind(AssertUnwindSafe(verdict)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(detail)) => Err(self.stop(detail)),
            Err(payload) => {
                // A signal raised by a nested check keeps its message verbatim.
                if let Some(signal) = payload.downcast_ref::<FailureSignal>() {
                    return Err(self.stop(&signal.message));
                }
                let message = payload_message(payload.as_ref());
                tracing::debug!(severity = %self.severity, %message, "check condition panicked");
                Err(self.stop(format_args!("condition panicked: {message}")))
            }
        }
    }

    pub fn is_true(self, condition: bool) -> CaseResult {
        self.evaluate(|| is_true(condition))
    }

    pub fn is_false(self, condition: bool) -> CaseResult {
        self.evaluate(|| is_false(condition))
    }

    pub fn eq<A, B>(self, a: A, b: B) -> CaseResult
    where
        A: PartialEq<B> + Debug,
        B: Debug,
    {
        self.evaluate(|| eq(&a, &b))
    }

    pub fn ne<A, B>(self, a: A, b: B) -> CaseResult
    where
        A: PartialEq<B> + Debug,
        B: Debug,
    {
        self.evaluate(|| ne(&a, &b))
    }

    pub fn lt<A, B>(self, a: A, b: B) -> CaseResult
    where
        A: PartialOrd<B> + Debug,
        B: Debug,
    {
        self.evaluate(|| lt(&a, &b))
    }

    pub fn le<A, B>(self, a: A, b: B) -> CaseResult
    where
        A: PartialOrd<B> + Debug,
        B: Debug,
    {
        self.evaluate(|| le(&a, &b))
    }

    pub fn gt<A, B>(self, a: A, b: B) -> CaseResult
    where
        A: PartialOrd<B> + Debug,
        B: Debug,
    {
        self.evaluate(|| gt(&a, &b))
    }

    pub fn ge<A, B>(self, a: A, b: B) -> CaseResult
    where
        A: PartialOrd<B> + Debug,
        B: Debug,
    {
        self.evaluate(|| ge(&a, &b))
    }

    /// Equality under the default relative tolerance.
    pub fn float_eq<F: Float>(self, a: F, b: F) -> CaseResult {
        self.evaluate(|| float_eq(a, b))
    }

    pub fn float_eq_within<F: Float>(self, a: F, b: F, tolerance: F) -> CaseResult {
        self.evaluate(|| float_eq_within(a, b, tolerance))
    }

    pub fn float_ne_within<F: Float>(self, a: F, b: F, tolerance: F) -> CaseResult {
        self.evaluate(|| float_ne_within(a, b, tolerance))
    }

    pub fn str_eq(self, a: impl AsRef<str>, b: impl AsRef<str>) -> CaseResult {
        self.evaluate(|| str_eq(&a, &b))
    }

    pub fn str_ne(self, a: impl AsRef<str>, b: impl AsRef<str>) -> CaseResult {
        self.evaluate(|| str_ne(&a, &b))
    }

    pub fn str_eq_ignore_case(self, a: impl AsRef<str>, b: impl AsRef<str>) -> CaseResult {
        self.evaluate(|| str_eq_ignore_case(&a, &b))
    }

    pub fn str_ne_ignore_case(self, a: impl AsRef<str>, b: impl AsRef<str>) -> CaseResult {
        self.evaluate(|| str_ne_ignore_case(&a, &b))
    }

    pub fn pred1<A, P>(self, predicate: P, a: A) -> CaseResult
    where
        A: Debug,
        P: FnOnce(&A) -> bool,
    {
        self.evaluate(|| pred1(predicate, &a))
    }

    pub fn pred2<A, B, P>(self, predicate: P, a: A, b: B) -> CaseResult
    where
        A: Debug,
        B: Debug,
        P: FnOnce(&A, &B) -> bool,
    {
        self.evaluate(|| pred2(predicate, &a, &b))
    }

    /// Fail unconditionally.
    pub fn fail(self, message: impl Display) -> CaseResult {
        Err(self.stop(format_args!("explicit failure: {message}")))
    }

    /// The statement must raise something.
    pub fn raises_any<R, F>(self, statement: F) -> CaseResult
    where
        R: Raise,
        F: FnOnce() -> R,
    {
        match raise::capture(statement) {
            Some(_) => Ok(()),
            None => Err(self.stop("no error raised")),
        }
    }

    /// The statement must not raise anything.
    pub fn raises_none<R, F>(self, statement: F) -> CaseResult
    where
        R: Raise,
        F: FnOnce() -> R,
    {
        match raise::capture(statement) {
            None => Ok(()),
            Some(raised) => Err(self.stop(format_args!(
                "raised an error: {}",
                raised.message()
            ))),
        }
    }

    /// The statement must raise an error of kind `K`.
    pub fn raises<K, R, F>(self, statement: F) -> CaseResult
    where
        K: Any,
        R: Raise,
        F: FnOnce() -> R,
    {
        self.raises_matching(type_name::<K>(), Raised::is::<K>, statement)
    }

    /// The statement must raise something `matches` accepts. `kind` names
    /// the expected kind in failure messages.
    pub fn raises_matching<R, F>(
        self,
        kind: &str,
        matches: fn(&Raised) -> bool,
        statement: F,
    ) -> CaseResult
    where
        R: Raise,
        F: FnOnce() -> R,
    {
        match raise::capture(statement) {
            Some(raised) if matches(&raised) => Ok(()),
            Some(raised) => Err(self.stop(format_args!(
                "raised an error but not of the expected kind `{kind}`: {}",
                raised.message()
            ))),
            None => Err(self.stop(format_args!("no error raised, expected `{kind}`"))),
        }
    }
}

/// End the case early with a passed outcome.
pub fn succeed() -> CaseResult {
    Err(Stop::Pass)
}

// ============================================================================
// Verdicts
// ============================================================================

pub fn is_true(condition: bool) -> Verdict {
    if condition {
        Ok(())
    } else {
        Err("returned false".to_string())
    }
}

pub fn is_false(condition: bool) -> Verdict {
    if condition {
        Err("returned true".to_string())
    } else {
        Ok(())
    }
}

pub fn eq<A, B>(a: &A, b: &B) -> Verdict
where
    A: PartialEq<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    relation(a == b, a, "!=", b)
}

pub fn ne<A, B>(a: &A, b: &B) -> Verdict
where
    A: PartialEq<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    relation(a != b, a, "==", b)
}

pub fn lt<A, B>(a: &A, b: &B) -> Verdict
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    relation(a < b, a, ">=", b)
}

pub fn le<A, B>(a: &A, b: &B) -> Verdict
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    relation(a <= b, a, ">", b)
}

pub fn gt<A, B>(a: &A, b: &B) -> Verdict
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    relation(a > b, a, "<=", b)
}

pub fn ge<A, B>(a: &A, b: &B) -> Verdict
where
    A: PartialOrd<B> + Debug + ?Sized,
    B: Debug + ?Sized,
{
    relation(a >= b, a, "<", b)
}

/// On failure the message shows the operator that *does* hold between the
/// operands, e.g. `2 >= 1` for a failed `lt(2, 1)`.
fn relation<A, B>(holds: bool, a: &A, negated: &str, b: &B) -> Verdict
where
    A: Debug + ?Sized,
    B: Debug + ?Sized,
{
    if holds {
        Ok(())
    } else {
        Err(format!("{a:?} {negated} {b:?}"))
    }
}

pub fn float_eq<F: Float>(a: F, b: F) -> Verdict {
    if a.nearly_equal(b) {
        Ok(())
    } else {
        Err(format!(
            "{a:?} vs {b:?} (|a - b| = {:?} exceeds 4 epsilon relative tolerance)",
            a.abs_diff(b)
        ))
    }
}

pub fn float_eq_within<F: Float>(a: F, b: F, tolerance: F) -> Verdict {
    if a.within(b, tolerance) {
        Ok(())
    } else {
        Err(format!("|{a:?} - {b:?}| > {tolerance:?}"))
    }
}

pub fn float_ne_within<F: Float>(a: F, b: F, tolerance: F) -> Verdict {
    if a.beyond(b, tolerance) {
        Ok(())
    } else {
        Err(format!("|{a:?} - {b:?}| <= {tolerance:?}"))
    }
}

pub fn str_eq<A, B>(a: &A, b: &B) -> Verdict
where
    A: AsRef<str> + ?Sized,
    B: AsRef<str> + ?Sized,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    if a == b {
        Ok(())
    } else {
        Err(format!("{a:?} vs {b:?}"))
    }
}

pub fn str_ne<A, B>(a: &A, b: &B) -> Verdict
where
    A: AsRef<str> + ?Sized,
    B: AsRef<str> + ?Sized,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    if a != b {
        Ok(())
    } else {
        Err(format!("both are {a:?}"))
    }
}

/// ASCII-only case folding; the message keeps the original text.
pub fn str_eq_ignore_case<A, B>(a: &A, b: &B) -> Verdict
where
    A: AsRef<str> + ?Sized,
    B: AsRef<str> + ?Sized,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.eq_ignore_ascii_case(b) {
        Ok(())
    } else {
        Err(format!("{a:?} vs {b:?} (ignoring case)"))
    }
}

pub fn str_ne_ignore_case<A, B>(a: &A, b: &B) -> Verdict
where
    A: AsRef<str> + ?Sized,
    B: AsRef<str> + ?Sized,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.eq_ignore_ascii_case(b) {
        Err(format!("both are {a:?} (ignoring case)"))
    } else {
        Ok(())
    }
}

pub fn pred1<A, P>(predicate: P, a: &A) -> Verdict
where
    A: Debug + ?Sized,
    P: FnOnce(&A) -> bool,
{
    if predicate(a) {
        Ok(())
    } else {
        Err(format!("predicate returned false for ({a:?})"))
    }
}

pub fn pred2<A, B, P>(predicate: P, a: &A, b: &B) -> Verdict
where
    A: Debug + ?Sized,
    B: Debug + ?Sized,
    P: FnOnce(&A, &B) -> bool,
{
    if predicate(a, b) {
        Ok(())
    } else {
        Err(format!("predicate returned false for ({a:?}, {b:?})"))
    }
}
