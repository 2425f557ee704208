use casework::prelude::*;

#[case(suite = "Ui")]
fn default_name() -> CaseResult {
    expect_eq!(1, 1)
}

#[case(suite = "Ui", name = "custom name")]
fn renamed() -> CaseResult {
    require_str_ne!("a", "b")
}

#[case(suite = "Ui")]
fn r#match() -> CaseResult {
    succeed!()
}

#[case(suite = r"Ui", name = "caf\u{e9} \"quoted\"")]
fn escaped() -> CaseResult {
    let mut stack = vec![1];
    expect_no_raise!(stack.pop())
}

fn main() {
    let registry = casework::all_suites();
    let names: Vec<&str> = registry.cases().map(|c| c.name()).collect();
    assert_eq!(names, ["default_name", "custom name", "match", "café \"quoted\""]);

    let report = casework::run_all();
    assert!(report.is_success());
    assert_eq!(report.total(), 4);
}
