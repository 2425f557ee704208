#![allow(dead_code)]

use casework::prelude::*;

#[case(name = "orphan")]
fn orphan() -> CaseResult {
    Ok(())
}

fn main() {}
