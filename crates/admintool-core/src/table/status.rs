//! Status tokens shared by table rows and table-level badges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Check outcome, used both as data and as a CSS class.
///
/// Ordering is by severity: `Skip < Pass < Warn < Error < Fail`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Skip,
    Pass,
    Warn,
    Error,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "SKIP",
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fail => "FAIL",
        }
    }

    /// The more severe of two statuses.
    pub fn worst(self, other: Status) -> Status {
        self.max(other)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a token that is not one of the five status names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status token: {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for Status {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SKIP" => Ok(Self::Skip),
            "PASS" => Ok(Self::Pass),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FAIL" => Ok(Self::Fail),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Status::Fail > Status::Error);
        assert!(Status::Error > Status::Warn);
        assert!(Status::Warn > Status::Pass);
        assert!(Status::Pass > Status::Skip);
        assert_eq!(Status::Pass.worst(Status::Fail), Status::Fail);
        assert_eq!(Status::Warn.worst(Status::Skip), Status::Warn);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("pass".parse::<Status>(), Ok(Status::Pass));
        assert_eq!(" FAIL ".parse::<Status>(), Ok(Status::Fail));
        assert!("INFO".parse::<Status>().is_err());
    }
}
