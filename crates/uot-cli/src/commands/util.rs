//! Shared helpers for CLI commands.

use std::io::{IsTerminal, Read};

use anyhow::{Context, Result};
use log::info;

/// Resolve the text to translate from trailing arguments or stdin.
///
/// Arguments are joined with single spaces. With no arguments stdin is
/// read to end-of-input, whether piped or typed interactively and closed
/// with Ctrl+D; an interactive read is announced at info level.
pub fn resolve_input(args: &[String]) -> Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    if std::io::stdin().is_terminal() {
        info!("waiting for input on stdin (Ctrl+D to end)");
    }
    read_all(std::io::stdin())
}

fn read_all(mut input: impl Read) -> Result<String> {
    let mut buffer = String::new();
    input
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Formats a byte count in human-readable form.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}
