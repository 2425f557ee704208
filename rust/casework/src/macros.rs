//! Check macros.
//!
//! `expect_*!` checks fail with [`Severity::Soft`](crate::Severity::Soft),
//! `require_*!` checks with [`Severity::Hard`](crate::Severity::Hard). Every
//! macro evaluates to a [`CaseResult`](crate::CaseResult); forward it with `?`:
//!
//! ```ignore
//! expect_eq!(parse("1"), 1)?;
//! require_str_eq_ignore_case!(header, "Content-Type")?;
//! ```
//!
//! Operands are evaluated inside the check, so a panic while computing them
//! is reported as this check's failure.

#[doc(hidden)]
#[macro_export]
macro_rules! __check {
    ($severity:ident, $name:literal, ($($operand:expr),+), $verdict:expr) => {
        $crate::Check::new($crate::Severity::$severity)
            .labeled($name, ::core::stringify!($($operand),+))
            .evaluate(|| $verdict)
    };
}

// ============================================================================
// Boolean
// ============================================================================

#[macro_export]
macro_rules! expect_true {
    ($cond:expr $(,)?) => {
        $crate::__check!(Soft, "expect_true", ($cond), $crate::check::is_true($cond))
    };
}

#[macro_export]
macro_rules! expect_false {
    ($cond:expr $(,)?) => {
        $crate::__check!(Soft, "expect_false", ($cond), $crate::check::is_false($cond))
    };
}

#[macro_export]
macro_rules! require_true {
    ($cond:expr $(,)?) => {
        $crate::__check!(Hard, "require_true", ($cond), $crate::check::is_true($cond))
    };
}

#[macro_export]
macro_rules! require_false {
    ($cond:expr $(,)?) => {
        $crate::__check!(Hard, "require_false", ($cond), $crate::check::is_false($cond))
    };
}

// ============================================================================
// Equality and ordering
// ============================================================================

#[macro_export]
macro_rules! expect_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_eq", ($a, $b), $crate::check::eq(&$a, &$b))
    };
}

#[macro_export]
macro_rules! expect_ne {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_ne", ($a, $b), $crate::check::ne(&$a, &$b))
    };
}

#[macro_export]
macro_rules! expect_lt {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_lt", ($a, $b), $crate::check::lt(&$a, &$b))
    };
}

#[macro_export]
macro_rules! expect_le {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_le", ($a, $b), $crate::check::le(&$a, &$b))
    };
}

#[macro_export]
macro_rules! expect_gt {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_gt", ($a, $b), $crate::check::gt(&$a, &$b))
    };
}

#[macro_export]
macro_rules! expect_ge {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_ge", ($a, $b), $crate::check::ge(&$a, &$b))
    };
}

#[macro_export]
macro_rules! require_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_eq", ($a, $b), $crate::check::eq(&$a, &$b))
    };
}

#[macro_export]
macro_rules! require_ne {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_ne", ($a, $b), $crate::check::ne(&$a, &$b))
    };
}

#[macro_export]
macro_rules! require_lt {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_lt", ($a, $b), $crate::check::lt(&$a, &$b))
    };
}

#[macro_export]
macro_rules! require_le {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_le", ($a, $b), $crate::check::le(&$a, &$b))
    };
}

#[macro_export]
macro_rules! require_gt {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_gt", ($a, $b), $crate::check::gt(&$a, &$b))
    };
}

#[macro_export]
macro_rules! require_ge {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_ge", ($a, $b), $crate::check::ge(&$a, &$b))
    };
}

// ============================================================================
// Floating point
// ============================================================================

/// Two operands: default relative tolerance. Three: absolute tolerance.
#[macro_export]
macro_rules! expect_float_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_float_eq", ($a, $b), $crate::check::float_eq($a, $b))
    };
    ($a:expr, $b:expr, $tolerance:expr $(,)?) => {
        $crate::__check!(
            Soft,
            "expect_float_eq",
            ($a, $b, $tolerance),
            $crate::check::float_eq_within($a, $b, $tolerance)
        )
    };
}

#[macro_export]
macro_rules! expect_float_ne {
    ($a:expr, $b:expr, $tolerance:expr $(,)?) => {
        $crate::__check!(
            Soft,
            "expect_float_ne",
            ($a, $b, $tolerance),
            $crate::check::float_ne_within($a, $b, $tolerance)
        )
    };
}

/// Two operands: default relative tolerance. Three: absolute tolerance.
#[macro_export]
macro_rules! require_float_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_float_eq", ($a, $b), $crate::check::float_eq($a, $b))
    };
    ($a:expr, $b:expr, $tolerance:expr $(,)?) => {
        $crate::__check!(
            Hard,
            "require_float_eq",
            ($a, $b, $tolerance),
            $crate::check::float_eq_within($a, $b, $tolerance)
        )
    };
}

#[macro_export]
macro_rules! require_float_ne {
    ($a:expr, $b:expr, $tolerance:expr $(,)?) => {
        $crate::__check!(
            Hard,
            "require_float_ne",
            ($a, $b, $tolerance),
            $crate::check::float_ne_within($a, $b, $tolerance)
        )
    };
}

// ============================================================================
// Strings
// ============================================================================

#[macro_export]
macro_rules! expect_str_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_str_eq", ($a, $b), $crate::check::str_eq(&$a, &$b))
    };
}

#[macro_export]
macro_rules! expect_str_ne {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Soft, "expect_str_ne", ($a, $b), $crate::check::str_ne(&$a, &$b))
    };
}

#[macro_export]
macro_rules! expect_str_eq_ignore_case {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(
            Soft,
            "expect_str_eq_ignore_case",
            ($a, $b),
            $crate::check::str_eq_ignore_case(&$a, &$b)
        )
    };
}

#[macro_export]
macro_rules! expect_str_ne_ignore_case {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(
            Soft,
            "expect_str_ne_ignore_case",
            ($a, $b),
            $crate::check::str_ne_ignore_case(&$a, &$b)
        )
    };
}

#[macro_export]
macro_rules! require_str_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_str_eq", ($a, $b), $crate::check::str_eq(&$a, &$b))
    };
}

#[macro_export]
macro_rules! require_str_ne {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(Hard, "require_str_ne", ($a, $b), $crate::check::str_ne(&$a, &$b))
    };
}

#[macro_export]
macro_rules! require_str_eq_ignore_case {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(
            Hard,
            "require_str_eq_ignore_case",
            ($a, $b),
            $crate::check::str_eq_ignore_case(&$a, &$b)
        )
    };
}

#[macro_export]
macro_rules! require_str_ne_ignore_case {
    ($a:expr, $b:expr $(,)?) => {
        $crate::__check!(
            Hard,
            "require_str_ne_ignore_case",
            ($a, $b),
            $crate::check::str_ne_ignore_case(&$a, &$b)
        )
    };
}

// ============================================================================
// Predicates
// ============================================================================

/// The predicate receives its argument by reference.
#[macro_export]
macro_rules! expect_pred1 {
    ($pred:expr, $a:expr $(,)?) => {
        $crate::__check!(Soft, "expect_pred1", ($pred, $a), $crate::check::pred1($pred, &$a))
    };
}

/// The predicate receives its arguments by reference.
#[macro_export]
macro_rules! expect_pred2 {
    ($pred:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__check!(
            Soft,
            "expect_pred2",
            ($pred, $a, $b),
            $crate::check::pred2($pred, &$a, &$b)
        )
    };
}

#[macro_export]
macro_rules! require_pred1 {
    ($pred:expr, $a:expr $(,)?) => {
        $crate::__check!(Hard, "require_pred1", ($pred, $a), $crate::check::pred1($pred, &$a))
    };
}

#[macro_export]
macro_rules! require_pred2 {
    ($pred:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__check!(
            Hard,
            "require_pred2",
            ($pred, $a, $b),
            $crate::check::pred2($pred, &$a, &$b)
        )
    };
}

// ============================================================================
// Explicit control
// ============================================================================

/// End the case now with a passed outcome.
///
/// Usable from helpers too: the early success travels through `?` like a
/// failure would.
#[macro_export]
macro_rules! succeed {
    () => {
        return $crate::check::succeed()
    };
}

#[macro_export]
macro_rules! expect_fail {
    ($($msg:tt)+) => {
        $crate::Check::soft().fail(::core::format_args!($($msg)+))
    };
}

#[macro_export]
macro_rules! require_fail {
    ($($msg:tt)+) => {
        $crate::Check::hard().fail(::core::format_args!($($msg)+))
    };
}

// ============================================================================
// Raise expectations
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __statement {
    ($stmt:expr) => {
        || {
            #[allow(unused_imports)]
            use $crate::raise::{ClassifyResult as _, ClassifyValue as _};
            (&$crate::raise::Evaluated::new($stmt)).classify()
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __raises {
    ($severity:ident, $name:literal, $stmt:expr, $kind:ty) => {
        $crate::Check::new($crate::Severity::$severity)
            .labeled($name, ::core::stringify!($stmt, $kind))
            .raises_matching(
                ::core::any::type_name::<$kind>(),
                {
                    #[allow(unused_imports)]
                    use $crate::raise::{ErrorKind as _, PayloadKind as _};
                    (&$crate::raise::Kind::<$kind>::expected()).matcher()
                },
                $crate::__statement!($stmt),
            )
    };
}

/// The statement must panic, or evaluate to an `Err`, with kind `$kind`.
///
/// When `$kind` is an error type it also matches inside a boxed
/// `dyn Error`, so `?`-converted errors keep their kind.
#[macro_export]
macro_rules! expect_raises {
    ($stmt:expr, $kind:ty $(,)?) => {
        $crate::__raises!(Soft, "expect_raises", $stmt, $kind)
    };
}

/// The statement may evaluate to any type; only `Result`s can carry an error.
#[macro_export]
macro_rules! expect_raises_any {
    ($stmt:expr $(,)?) => {
        $crate::Check::soft()
            .labeled("expect_raises_any", ::core::stringify!($stmt))
            .raises_any($crate::__statement!($stmt))
    };
}

#[macro_export]
macro_rules! expect_no_raise {
    ($stmt:expr $(,)?) => {
        $crate::Check::soft()
            .labeled("expect_no_raise", ::core::stringify!($stmt))
            .raises_none($crate::__statement!($stmt))
    };
}

#[macro_export]
macro_rules! require_raises {
    ($stmt:expr, $kind:ty $(,)?) => {
        $crate::__raises!(Hard, "require_raises", $stmt, $kind)
    };
}

#[macro_export]
macro_rules! require_raises_any {
    ($stmt:expr $(,)?) => {
        $crate::Check::hard()
            .labeled("require_raises_any", ::core::stringify!($stmt))
            .raises_any($crate::__statement!($stmt))
    };
}

#[macro_export]
macro_rules! require_no_raise {
    ($stmt:expr $(,)?) => {
        $crate::Check::hard()
            .labeled("require_no_raise", ::core::stringify!($stmt))
            .raises_none($crate::__statement!($stmt))
    };
}
