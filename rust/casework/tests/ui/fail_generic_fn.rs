#![allow(dead_code)]

use casework::prelude::*;

#[case(suite = "Ui")]
fn generic<T>() -> CaseResult {
    Ok(())
}

fn main() {}
