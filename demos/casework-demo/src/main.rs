//! casework self-test.
//!
//! Every check macro, used the way a test author would, plus the checks
//! turned on themselves: a failing check is itself an error, so wrapping it
//! in `expect_raises_any!` must succeed.
//!
//! ```bash
//! cargo run -p casework-demo
//! cargo run -p casework-demo -- --list
//! RUST_LOG=casework=debug cargo run -p casework-demo -- --format json
//! ```

use casework::prelude::*;

#[derive(Debug)]
struct Exception;

#[derive(Debug)]
struct RuntimeError;

fn throws() {
    raise(Exception);
}

fn two() -> i32 {
    1 + 1
}

#[case(suite = "Expect", name = "Throw")]
fn expect_throw() -> CaseResult {
    expect_raises!(throws(), Exception)?;
    expect_no_raise!(two())?;
    expect_raises_any!(throws())?;

    expect_raises_any!(expect_raises!(two(), Exception))?;
    expect_raises_any!(expect_raises!(throws(), RuntimeError))?;
    expect_raises_any!(expect_no_raise!(throws()))?;
    expect_raises_any!(expect_raises_any!(two()))?;
    Ok(())
}

#[case(suite = "Expect", name = "Eq")]
fn expect_compare() -> CaseResult {
    expect_eq!(1, 1)?;
    expect_ne!(1, 2)?;
    expect_lt!(1, 2)?;
    expect_le!(1, 2)?;
    expect_le!(1, 1)?;
    expect_gt!(2, 1)?;
    expect_ge!(2, 1)?;
    expect_ge!(1, 1)?;

    expect_raises_any!(expect_eq!(1, 2))?;
    expect_raises_any!(expect_ne!(1, 1))?;
    expect_raises_any!(expect_lt!(2, 1))?;
    expect_raises_any!(expect_lt!(1, 1))?;
    expect_raises_any!(expect_le!(2, 1))?;
    expect_raises_any!(expect_gt!(1, 2))?;
    expect_raises_any!(expect_gt!(1, 1))?;
    expect_raises_any!(expect_ge!(1, 2))?;
    Ok(())
}

#[case(suite = "Assert", name = "Throw")]
fn assert_throw() -> CaseResult {
    require_raises!(throws(), Exception)?;
    require_no_raise!(two())?;
    require_raises_any!(throws())?;

    expect_raises_any!(require_raises!(two(), Exception))?;
    expect_raises_any!(require_raises!(throws(), RuntimeError))?;
    expect_raises_any!(require_no_raise!(throws()))?;
    expect_raises_any!(require_raises_any!(two()))?;
    Ok(())
}

#[case(suite = "Assert", name = "Eq")]
fn assert_compare() -> CaseResult {
    require_eq!(1, 1)?;
    require_ne!(1, 2)?;
    require_lt!(1, 2)?;
    require_le!(1, 2)?;
    require_le!(1, 1)?;
    require_gt!(2, 1)?;
    require_ge!(2, 1)?;
    require_ge!(1, 1)?;

    expect_raises_any!(require_eq!(1, 2))?;
    expect_raises_any!(require_ne!(1, 1))?;
    expect_raises_any!(require_lt!(2, 1))?;
    expect_raises_any!(require_lt!(1, 1))?;
    expect_raises_any!(require_le!(2, 1))?;
    expect_raises_any!(require_gt!(1, 2))?;
    expect_raises_any!(require_gt!(1, 1))?;
    expect_raises_any!(require_ge!(1, 2))?;
    Ok(())
}

#[case(suite = "Float", name = "Default")]
fn float_default() -> CaseResult {
    expect_float_eq!(1.0_f64, 1.0_f64)?;
    expect_float_eq!(0.1_f64 + 0.2, 0.3)?;
    require_float_eq!(1.000_000_1_f32, 1.000_000_2_f32)?;

    expect_raises_any!(expect_float_eq!(1.0_f64, 2.0_f64))?;
    expect_raises_any!(require_float_eq!(1.0_f32, 1.001_f32))?;
    Ok(())
}

#[case(suite = "Float", name = "Tolerance")]
fn float_tolerance() -> CaseResult {
    expect_float_eq!(1.05_f64, 1.04, 0.02)?;
    expect_float_ne!(1.05_f64, 1.04, 0.002)?;
    require_float_ne!(10.0_f32, 12.0, 1.0)?;

    expect_raises_any!(expect_float_eq!(1.05_f64, 1.04, 0.002))?;
    expect_raises_any!(require_float_ne!(1.05_f64, 1.04, 0.02))?;
    Ok(())
}

#[case(suite = "String", name = "Eq")]
fn string_eq() -> CaseResult {
    let owned = String::from("hello");
    expect_str_eq!(owned, "hello")?;
    expect_str_ne!("hello", "world")?;
    require_str_eq!("", String::new())?;

    expect_raises_any!(expect_str_eq!("hello", "Hello"))?;
    expect_raises_any!(require_str_ne!("same", "same"))?;
    Ok(())
}

#[case(suite = "String", name = "IgnoreCase")]
fn string_ignore_case() -> CaseResult {
    expect_str_eq_ignore_case!("Hello", "hello")?;
    expect_str_ne_ignore_case!("hello", "world")?;
    require_str_eq_ignore_case!("CONTENT-TYPE", "content-type")?;

    expect_raises_any!(expect_str_eq_ignore_case!("hello", "world"))?;
    expect_raises_any!(require_str_ne_ignore_case!("ABC", "abc"))?;
    Ok(())
}

fn is_even(n: &i32) -> bool {
    n % 2 == 0
}

fn divides(d: &i32, n: &i32) -> bool {
    *d != 0 && n % d == 0
}

#[case(suite = "Predicate", name = "Arity")]
fn predicate_arity() -> CaseResult {
    expect_pred1!(is_even, 4)?;
    expect_pred2!(divides, 3, 12)?;
    require_pred1!(|s: &&str| s.starts_with('c'), "casework")?;

    expect_raises_any!(expect_pred1!(is_even, 3))?;
    expect_raises_any!(require_pred2!(divides, 0, 12))?;
    Ok(())
}

#[case(suite = "Bool", name = "Truth")]
fn bool_truth() -> CaseResult {
    expect_true!(two() == 2)?;
    require_false!(two() == 3)?;

    expect_raises_any!(expect_true!(false))?;
    expect_raises_any!(require_false!(true))?;
    Ok(())
}

#[case(suite = "Control", name = "Fail")]
fn control_fail() -> CaseResult {
    expect_raises_any!(expect_fail!("soft {}", "failure"))?;
    expect_raises_any!(require_fail!("hard failure"))?;
    Ok(())
}

#[case(suite = "Control", name = "Succeed")]
fn control_succeed() -> CaseResult {
    expect_eq!(two(), 2)?;
    succeed!()
}

fn main() {
    casework::main()
}
