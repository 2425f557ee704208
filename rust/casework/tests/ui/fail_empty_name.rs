#![allow(dead_code)]

use casework::prelude::*;

#[case(suite = "Ui", name = "")]
fn unnamed() -> CaseResult {
    Ok(())
}

fn main() {}
