#![allow(dead_code)]

use casework::prelude::*;

#[case(suite = "Ui", tag = "slow")]
fn tagged() -> CaseResult {
    Ok(())
}

fn main() {}
