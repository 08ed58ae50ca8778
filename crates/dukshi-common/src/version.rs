//! Version types for schema compatibility.

use serde::{Deserialize, Serialize};

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Current layout of `dukshi.toml`.
    pub const CONFIG: Self = Self::new(1, 0);

    /// Current layout of the JSON event stream.
    pub const EVENTS: Self = Self::new(1, 0);

    /// Checks if data written at `data_version` can be read by this version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::CONFIG
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_bumps_stay_readable() {
        let current = SchemaVersion::CONFIG;
        assert!(current.can_read(&SchemaVersion::new(1, 7)));
        assert!(!current.can_read(&SchemaVersion::new(2, 0)));
        assert_eq!(SchemaVersion::new(1, 2).to_string(), "1.2");
    }
}
