use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of a level inside a category (1-based).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelNumber(u32);

impl LevelNumber {
    /// The entry level of every category.
    pub const FIRST: LevelNumber = LevelNumber(1);

    /// Creates a new `LevelNumber`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::ZeroLevel` for `0`; levels start at 1.
    pub fn new(value: u32) -> Result<Self, IdError> {
        if value == 0 {
            return Err(IdError::ZeroLevel);
        }
        Ok(Self(value))
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The level directly after this one, if it can be represented.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<u32> for LevelNumber {
    type Error = IdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LevelNumber> for u32 {
    fn from(level: LevelNumber) -> Self {
        level.0
    }
}

/// Trimmed, non-empty user identifier. Not a credential.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    /// Create a validated username.
    ///
    /// # Errors
    ///
    /// Returns `IdError::EmptyUsername` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdError::EmptyUsername);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("level numbers start at 1")]
    ZeroLevel,

    #[error("failed to parse level number from {raw:?}")]
    InvalidLevel { raw: String },

    #[error("username cannot be empty")]
    EmptyUsername,
}

// ─── Debug / Display Implementations ───────────────────────────────────────────

impl fmt::Debug for LevelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelNumber({})", self.0)
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({:?})", self.0)
    }
}

impl fmt::Display for LevelNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

impl FromStr for LevelNumber {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u32>()
            .map_err(|_| IdError::InvalidLevel {
                raw: trimmed.to_string(),
            })
            .and_then(Self::new)
    }
}

impl FromStr for Username {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_number_rejects_zero() {
        assert_eq!(LevelNumber::new(0).unwrap_err(), IdError::ZeroLevel);
        assert!("0".parse::<LevelNumber>().is_err());
    }

    #[test]
    fn level_number_from_str() {
        let level: LevelNumber = " 3 ".parse().unwrap();
        assert_eq!(level, LevelNumber::new(3).unwrap());
        assert_eq!(level.to_string(), "3");
    }

    #[test]
    fn level_number_from_str_invalid() {
        let err = "three".parse::<LevelNumber>().unwrap_err();
        assert!(matches!(err, IdError::InvalidLevel { .. }));
    }

    #[test]
    fn level_number_converts_through_u32() {
        assert_eq!(LevelNumber::try_from(0_u32), Err(IdError::ZeroLevel));
        let level = LevelNumber::try_from(4_u32).unwrap();
        assert_eq!(u32::from(level), 4);
    }

    #[test]
    fn level_number_next() {
        assert_eq!(LevelNumber::FIRST.next(), LevelNumber::new(2).ok());
        assert_eq!(LevelNumber::new(u32::MAX).unwrap().next(), None);
    }

    #[test]
    fn username_is_trimmed() {
        let name = Username::new("  Алиса ").unwrap();
        assert_eq!(name.as_str(), "Алиса");
    }

    #[test]
    fn blank_username_is_rejected() {
        assert_eq!(Username::new("   ").unwrap_err(), IdError::EmptyUsername);
    }
}
