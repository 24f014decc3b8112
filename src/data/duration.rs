//! Refresh-interval parsing and age formatting.

use std::time::Duration;

use anyhow::{anyhow, bail, Result};

/// Suffix to milliseconds multiplier (longer suffixes first).
const UNITS: &[(&str, u64)] = &[
    ("ms", 1),
    ("s", 1_000),
    ("m", 60_000),
    ("h", 3_600_000),
];

/// Parse an interval like `"10s"`, `"500ms"`, `"2m"` or a bare number of seconds.
///
/// Zero is rejected since a zero refresh interval would spin.
pub fn parse_interval(s: &str) -> Result<Duration> {
    let s = s.trim();

    let millis = match UNITS.iter().find_map(|(suffix, mult)| Some((s.strip_suffix(suffix)?, mult))) {
        Some((value, mult)) => {
            let value: f64 = value.trim().parse()?;
            let millis = value * *mult as f64;
            if !millis.is_finite() || millis < 0.0 || millis >= u64::MAX as f64 {
                bail!("Interval out of range: {}", s);
            }
            millis as u64
        }
        None => match s.parse::<u64>() {
            Ok(secs) => secs
                .checked_mul(1_000)
                .ok_or_else(|| anyhow!("Interval too large: {}", s))?,
            Err(_) => bail!("Unknown interval format: {}", s),
        },
    };

    if millis == 0 {
        bail!("Interval must be greater than zero: {}", s);
    }
    Ok(Duration::from_millis(millis))
}

/// Compact age for the status bar, e.g. `"4s"`, `"3m 12s"`, `"2h 5m"`.
pub fn format_age(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3_600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3_600, (secs % 3_600) / 60)
    }
}
