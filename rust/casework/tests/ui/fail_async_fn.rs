#![allow(dead_code)]

use casework::prelude::*;

#[case(suite = "Ui")]
async fn later() -> CaseResult {
    Ok(())
}

fn main() {}
