#![allow(dead_code)]

use casework::prelude::*;

#[case(suite = "Ui")]
fn with_input(_input: u32) -> CaseResult {
    Ok(())
}

fn main() {}
