use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty JSON on stdout.
pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{}", text);
    Ok(())
}
