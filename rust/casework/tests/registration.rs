//! Process-wide registry behaviour: declared and runtime-registered cases,
//! ordering, duplicates, and sealing once a run starts.
//!
//! Trials observe state captured by `main` before and after `run_all()`,
//! because sealing is a one-way, process-wide transition.

use casework::prelude::*;
use casework::{CaseStatus, RegistryError};
use libtest_mimic::{Arguments, Failed, Trial};

#[case(suite = "Declared", name = "second_by_line")]
fn declared_b() -> CaseResult {
    Ok(())
}

#[case(suite = "Declared", name = "third_by_line")]
fn declared_c() -> CaseResult {
    Ok(())
}

#[case(suite = "Other")]
fn r#loop() -> CaseResult {
    Ok(())
}

#[case(suite = "Declared")]
fn duplicated() -> CaseResult {
    expect_true!(true)
}

fn expect<T: PartialEq + std::fmt::Debug>(actual: T, expected: T) -> Result<(), Failed> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {actual:?}").into())
    }
}

fn main() {
    let args = Arguments::from_args();

    let empty_suite = casework::register("", "x", || Ok(()));
    let empty_name = casework::register("Runtime", "", || Ok(()));
    let added = casework::register("Runtime", "added", || require_eq!(1, 1));
    let duplicate = casework::register("Declared", "duplicated", || require_fail!("second copy"));

    let before = casework::all_suites();
    let listing: Vec<(String, Vec<String>)> = before
        .suites()
        .map(|suite| {
            (
                suite.name.to_string(),
                suite.cases.iter().map(|c| c.name().to_string()).collect(),
            )
        })
        .collect();
    let sealed_before = before.is_sealed();

    let report = casework::run_all();
    let late = casework::register("Runtime", "late", || Ok(()));
    let after = casework::all_suites();

    let trials = vec![
        Trial::test("register.rejects_empty_names", move || {
            expect(empty_suite, Err(RegistryError::EmptySuiteName))?;
            expect(empty_name, Err(RegistryError::EmptyCaseName))
        }),
        Trial::test("register.accepts_closures", move || {
            expect(added, Ok(()))?;
            expect(duplicate, Ok(()))
        }),
        Trial::test("registry.suites_in_declaration_order", move || {
            let suites: Vec<&str> = listing.iter().map(|(s, _)| s.as_str()).collect();
            expect(suites, vec!["Declared", "Other", "Runtime"])?;
            expect(
                listing[0].1.clone(),
                vec![
                    "second_by_line".to_string(),
                    "third_by_line".to_string(),
                    "duplicated".to_string(),
                    "duplicated".to_string(),
                ],
            )?;
            expect(listing[1].1.clone(), vec!["loop".to_string()])
        }),
        Trial::test("registry.open_until_run", move || expect(sealed_before, false)),
        Trial::test("registry.sealed_after_run", move || {
            expect(late, Err(RegistryError::Sealed))?;
            expect(after.is_sealed(), true)?;
            expect(after.len(), 6)
        }),
        Trial::test("run.duplicates_both_run", move || {
            let statuses: Vec<&CaseStatus> = report
                .outcomes()
                .iter()
                .filter(|o| o.suite == "Declared" && o.name == "duplicated")
                .map(|o| &o.status)
                .collect();
            expect(statuses.len(), 2)?;
            expect(statuses[0].label(), "PASS")?;
            expect(statuses[1].label(), "FATAL")?;
            expect(report.total(), 6)?;
            expect(report.exit_code(), 1)
        }),
    ];

    libtest_mimic::run(&args, trials).exit();
}
