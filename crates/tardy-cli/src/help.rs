// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text for CLI commands.

use crate::output;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_usage() {
    println!(
        "{} {} - Lowering for late-initialized variables",
        output::title("Tardy"),
        output::version(VERSION)
    );
    println!();
    println!(
        "{}: {} {} {}",
        output::section_header("Usage"),
        output::command("tardy"),
        output::arg("<command>"),
        output::arg("[options]")
    );
    println!();
    println!("{}", output::section_header("Commands:"));
    println!("  {} {}  Lower one late variable and print its accessors", output::command("lower"), output::arg("[options]"));
    println!("  {}          Print the encoding for each strategy and type", output::command("strategies"));
    println!("  {}                Show this help", output::command("help"));
    println!("  {}             Show version", output::command("version"));
    println!();
    print_lower_options();
}

pub fn print_lower_options() {
    println!("{}", output::section_header("Lower options:"));
    println!("  {} {}      Variable name (default: x)", output::arg("--name"), output::arg("<id>"));
    println!("  {} {}     Declared type: int, int? (nullable), <T> (type parameter)", output::arg("--type"), output::arg("<ty>"));
    println!("  {} {}   field, static or local (default: field)", output::arg("--kind"), output::arg("<kind>"));
    println!("  {}            Variable is final", output::arg("--final"));
    println!("  {} {}      Initializer: an int literal", output::arg("--init"), output::arg("<n>"));
    println!("  {} {}   sound or unsound (default: sound)", output::arg("--mode"), output::arg("<mode>"));
    println!("  {}         Target supports sentinel values", output::arg("--sentinel"));
    println!("  {}     Setters return the written value", output::arg("--return-value"));
    println!("  {}             Print the storage plan as JSON", output::arg("--json"));
    println!("  {}          Debug logging (RUST_LOG overrides)", output::arg("--verbose"));
}
