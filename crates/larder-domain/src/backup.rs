//! Backup references

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque reference to a tenant snapshot
///
/// Identified by its creation time in milliseconds since the Unix epoch. The
/// lifecycle core never looks inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupRef {
    /// Creation time (ms since epoch)
    pub timestamp: u64,
}

impl BackupRef {
    /// Create a reference from a timestamp
    pub fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }
}

impl fmt::Display for BackupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timestamp)
    }
}

impl FromStr for BackupRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self::new)
            .map_err(|e| format!("Invalid backup timestamp \"{}\": {}", s, e))
    }
}
