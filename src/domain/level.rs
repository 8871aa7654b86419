use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A skill level (belt) of the curriculum.
///
/// Levels are totally ordered by declaration, which is also the order of
/// progression through the curriculum. The level is the outermost key of the
/// catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkillLevel {
    /// First level.
    Yellow,
    /// Second level.
    Orange,
    /// Third level.
    Green,
    /// Fourth level.
    Blue,
    /// Fifth level.
    Brown,
    /// Final level.
    Black,
}

impl SkillLevel {
    /// Every level, in progression order.
    pub const ALL: [Self; 6] = [
        Self::Yellow,
        Self::Orange,
        Self::Green,
        Self::Blue,
        Self::Brown,
        Self::Black,
    ];

    /// The stable identifier used in keys and configuration files.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Brown => "brown",
            Self::Black => "black",
        }
    }

    /// The display label shown to users.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yellow => "חגורה צהובה",
            Self::Orange => "חגורה כתומה",
            Self::Green => "חגורה ירוקה",
            Self::Blue => "חגורה כחולה",
            Self::Brown => "חגורה חומה",
            Self::Black => "חגורה שחורה",
        }
    }

    /// The level that follows this one, or `None` for the final level.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        let position = Self::ALL.iter().position(|level| *level == self)?;
        Self::ALL.get(position + 1).copied()
    }

    /// Looks up a level by its identifier, ignoring ASCII case.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.id().eq_ignore_ascii_case(id))
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a string is not a known skill level identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown skill level '{0}'")]
pub struct UnknownLevelError(String);

impl FromStr for SkillLevel {
    type Err = UnknownLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| UnknownLevelError(s.to_string()))
    }
}

impl Serialize for SkillLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for SkillLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
