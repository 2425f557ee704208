#![allow(dead_code)]

use casework::prelude::*;

#[case(suite = "")]
fn nowhere() -> CaseResult {
    Ok(())
}

fn main() {}
