#![allow(dead_code)]

use casework::prelude::*;

#[case(suite = 3)]
fn numbered() -> CaseResult {
    Ok(())
}

fn main() {}
