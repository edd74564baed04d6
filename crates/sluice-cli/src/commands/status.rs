//! Status command: describe a numeric status code.

use anyhow::{Context, Result};
use sluice_io::{StatusCode, standard, stream_println};
use sluice_status::status_string;

pub fn run(code: &str) -> Result<()> {
    let code = parse_code(code)?;
    standard::with(|streams| {
        stream_println!(
            streams.stdout,
            "{code} ({}): {}",
            code.namespace(),
            status_string(code)
        )
    })??;
    Ok(())
}

/// Parses a decimal or `0x`-prefixed hexadecimal code.
fn parse_code(text: &str) -> Result<StatusCode> {
    let value = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => text.parse(),
    }
    .with_context(|| format!("invalid status code '{text}'"))?;
    Ok(StatusCode::new(value))
}
