#![doc = include_str!("../README.md")]

// Macro hygiene: `#[case]` expands to `::casework::` paths. This makes them
// resolve inside this crate's own unit tests too.
extern crate self as casework;

pub mod check;
pub mod cli;
pub mod console;
pub mod float;
mod macros;
pub mod raise;
pub mod registry;
pub mod report;
pub mod runner;
pub mod signal;

// Re-export the declaration attribute
pub use casework_macros::case;

// Re-export inventory for macro-generated code
#[doc(hidden)]
pub extern crate inventory;

pub use check::{Check, Verdict, succeed};
pub use cli::{CliError, Format, HarnessArgs, main};
pub use console::ConsoleObserver;
pub use float::Float;
pub use raise::{Raise, Raised, raise};
pub use registry::{
    CaseBody, CaseEntry, CaseRegistry, RegistryError, Suite, TestCase, all_suites, register,
};
pub use report::{CaseOutcome, CaseStatus, Counts, RunReport};
pub use runner::{NoopObserver, Observer, RunState, Runner, run_all, run_all_with};
pub use signal::{CaseResult, FailureSignal, Severity, Stop};

/// Everything a test file usually needs: `use casework::prelude::*;`
pub mod prelude {
    pub use crate::{CaseResult, Check, case, raise};
    pub use crate::{
        expect_eq, expect_fail, expect_false, expect_float_eq, expect_float_ne, expect_ge,
        expect_gt, expect_le, expect_lt, expect_ne, expect_no_raise, expect_pred1, expect_pred2,
        expect_raises, expect_raises_any, expect_str_eq, expect_str_eq_ignore_case, expect_str_ne,
        expect_str_ne_ignore_case, expect_true,
    };
    pub use crate::{
        require_eq, require_fail, require_false, require_float_eq, require_float_ne, require_ge,
        require_gt, require_le, require_lt, require_ne, require_no_raise, require_pred1,
        require_pred2, require_raises, require_raises_any, require_str_eq,
        require_str_eq_ignore_case, require_str_ne, require_str_ne_ignore_case, require_true,
    };
    pub use crate::succeed;
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[case(suite = "Crate", name = "declared_in_unit_tests")]
    fn declared() -> CaseResult {
        expect_true!(true)
    }

    #[test]
    fn attribute_submits_to_the_global_registry() {
        let registry = crate::all_suites();
        let case = registry
            .cases()
            .find(|c| c.suite() == "Crate" && c.name() == "declared_in_unit_tests");
        assert_eq!(case.map(|c| c.call()), Some(Ok(())));
    }
}
