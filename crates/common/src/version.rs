use serde::{Deserialize, Serialize};

/// Optimistic-concurrency token carried by every aggregate.
///
/// A freshly constructed aggregate sits at version 0. Each unit of work
/// that mutates it moves the version forward by exactly one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Creates a version from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the version of an aggregate that was never mutated.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version after the first unit of work.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_advance_from_initial() {
        assert_eq!(Version::initial().next(), Version::first());
        assert_eq!(Version::first().next().as_u64(), 2);
        assert!(Version::initial() < Version::first());
    }
}
