use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;

fn parse_series<T: FromStr>(text: &str, what: &str) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let val: T = trimmed
            .parse()
            .ok()
            .with_context(|| format!("line {} is not {}: {}", idx + 1, what, trimmed))?;
        out.push(val);
    }
    if out.is_empty() {
        anyhow::bail!("no {} values found", what);
    }
    Ok(out)
}

/// Parse newline-delimited amplitudes, ignoring blank/comment lines.
pub fn parse_amplitude_series(text: &str) -> Result<Vec<u16>> {
    parse_series(text, "a 16-bit amplitude")
}

/// Read newline-delimited amplitudes from disk.
pub fn read_amplitude_series(path: &Path) -> Result<Vec<u16>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_amplitude_series(&text)
}

/// Parse newline-delimited RR intervals in whole milliseconds.
pub fn parse_rr_series(text: &str) -> Result<Vec<u64>> {
    parse_series(text, "an RR interval in ms")
}

pub fn read_rr_series(path: &Path) -> Result<Vec<u64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_rr_series(&text)
}
