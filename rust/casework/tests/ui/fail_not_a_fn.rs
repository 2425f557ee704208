#![allow(dead_code)]

use casework::prelude::*;

#[case(suite = "Ui")]
struct NotAFunction;

fn main() {}
