// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI output styling.
//!
//! Respects NO_COLOR and FORCE_COLOR. Colors are off when output is piped.

use colored::{ColoredString, Colorize};
use tardy_lower::IsSetEncoding;

/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn hint_label() -> ColoredString {
    "hint".cyan()
}

pub fn title(name: &str) -> ColoredString {
    name.bold()
}

pub fn version(v: &str) -> ColoredString {
    v.dimmed()
}

pub fn section_header(header: &str) -> ColoredString {
    header.yellow().bold()
}

pub fn command(name: &str) -> ColoredString {
    name.green()
}

pub fn arg(name: &str) -> ColoredString {
    name.cyan()
}

pub fn key(name: &str) -> ColoredString {
    format!("{:<10}", name).dimmed()
}

/// `text` is printed in the color of `encoding`.
pub fn encoding(encoding: IsSetEncoding, text: &str) -> ColoredString {
    match encoding {
        IsSetEncoding::UseIsSetField => text.magenta(),
        IsSetEncoding::UseSentinel => text.blue(),
        IsSetEncoding::UseNull => text.normal(),
    }
}

pub fn separator(width: usize) -> ColoredString {
    "─".repeat(width).dimmed()
}

/// Print an error and its optional hint to stderr.
pub fn report(message: &str, hint: Option<&str>) {
    eprintln!("{}: {}", error_label(), message);
    if let Some(hint) = hint {
        eprintln!("  {}: {}", hint_label(), hint.dimmed());
    }
}
