//! Health status shared by assets and nodes.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

/// Health status for an asset or node.
///
/// Variants are declared in ascending severity so that the derived `Ord`
/// gives the roll-up order directly: `Critical > Warning > Offline > Healthy`.
/// An asset's status is the `max()` of its nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthStatus {
    #[default]
    Healthy,
    Offline,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Every status, most severe first.
    pub const BY_SEVERITY: [HealthStatus; 4] = [
        HealthStatus::Critical,
        HealthStatus::Warning,
        HealthStatus::Offline,
        HealthStatus::Healthy,
    ];

    /// The wire name used by the feed.
    pub const fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Warning => "Warning",
            HealthStatus::Critical => "Critical",
            HealthStatus::Offline => "Offline",
        }
    }

    /// Returns a short symbol for display.
    pub const fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "OK",
            HealthStatus::Warning => "WARN",
            HealthStatus::Critical => "CRIT",
            HealthStatus::Offline => "OFF",
        }
    }

    /// Whether this status needs operator attention.
    pub const fn is_unhealthy(&self) -> bool {
        !matches!(self, HealthStatus::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Healthy" => Ok(HealthStatus::Healthy),
            "Warning" => Ok(HealthStatus::Warning),
            "Critical" => Ok(HealthStatus::Critical),
            "Offline" => Ok(HealthStatus::Offline),
            other => Err(ParseStatusError {
                value: String::from(other),
            }),
        }
    }
}

/// A status string that is not one of the four recognised values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    /// The rejected value, verbatim.
    pub value: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised health status {:?}", self.value)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseStatusError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(HealthStatus::Critical > HealthStatus::Warning);
        assert!(HealthStatus::Warning > HealthStatus::Offline);
        assert!(HealthStatus::Offline > HealthStatus::Healthy);

        let worst = [
            HealthStatus::Healthy,
            HealthStatus::Offline,
            HealthStatus::Warning,
        ]
        .into_iter()
        .max();
        assert_eq!(worst, Some(HealthStatus::Warning));
    }

    #[test]
    fn test_by_severity_is_descending() {
        let mut sorted = HealthStatus::BY_SEVERITY;
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(sorted, HealthStatus::BY_SEVERITY);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("Offline".parse::<HealthStatus>(), Ok(HealthStatus::Offline));
        assert!("offline".parse::<HealthStatus>().is_err());
        assert!("".parse::<HealthStatus>().is_err());

        let err = "Unknown".parse::<HealthStatus>().unwrap_err();
        assert_eq!(err.value, "Unknown");
    }

    #[test]
    fn test_display_matches_wire_name() {
        for status in HealthStatus::BY_SEVERITY {
            assert_eq!(status.to_string().parse::<HealthStatus>(), Ok(status));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&HealthStatus::Critical).unwrap();
        assert_eq!(json, "\"Critical\"");
    }
}
