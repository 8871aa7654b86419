//! Display-preserving deep-link keys.
//!
//! A [`NavigationKey`] points back at an exact catalog entry from outside the
//! engine (search results, shared links, stored favorites). Unlike a
//! [`CanonicalId`](crate::CanonicalId) it keeps the original text of every
//! field, escaping instead of normalizing.

use std::{fmt, str::FromStr};

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::SkillLevel;

/// Characters escaped inside a key field: every accepted separator, the
/// escape character itself, and whitespace. Non-ASCII is always escaped.
const FIELD: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'%')
    .add(b'|')
    .add(b':')
    .add(b'/')
    .add(b'"')
    .add(b'#')
    .add(b'?');

/// Separator placed between the three fields of an encoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySeparator {
    /// `level|topic|item`
    #[default]
    Pipe,
    /// `level::topic::item`
    DoubleColon,
    /// `level/topic/item`
    Slash,
}

impl KeySeparator {
    /// Accepted separators, in the order they are tried when decoding.
    pub const ALL: [Self; 3] = [Self::Pipe, Self::DoubleColon, Self::Slash];

    /// The separator text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pipe => "|",
            Self::DoubleColon => "::",
            Self::Slash => "/",
        }
    }
}

/// Errors produced when decoding a navigation key.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationKeyError {
    /// The key does not split into exactly three fields.
    #[error("Invalid navigation key '{key}': expected 3 fields, found {found}")]
    FieldCount {
        /// The offending key.
        key: String,
        /// Number of fields found with the best matching separator.
        found: usize,
    },

    /// A field contains an escape sequence that does not decode to UTF-8.
    #[error("Invalid navigation key '{0}': field is not valid percent-encoded UTF-8")]
    Encoding(String),

    /// A field is blank.
    #[error("Invalid navigation key '{0}': empty field")]
    EmptyField(String),
}

/// A deep-link key `(level id, topic title, item text)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigationKey {
    level_id: String,
    topic: String,
    item: String,
}

impl NavigationKey {
    /// Creates a key from its raw fields.
    #[must_use]
    pub fn new(
        level_id: impl Into<String>,
        topic: impl Into<String>,
        item: impl Into<String>,
    ) -> Self {
        Self {
            level_id: level_id.into(),
            topic: topic.into(),
            item: item.into(),
        }
    }

    /// Creates a key for an item of a catalog level.
    #[must_use]
    pub fn for_item(level: SkillLevel, topic: &str, item: &str) -> Self {
        Self::new(level.id(), topic, item)
    }

    /// The level id exactly as encoded.
    #[must_use]
    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    /// The level, when the id names a known level.
    #[must_use]
    pub fn level(&self) -> Option<SkillLevel> {
        SkillLevel::from_id(&self.level_id)
    }

    /// The original topic title.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// The original item text.
    #[must_use]
    pub fn item(&self) -> &str {
        &self.item
    }

    /// Encodes the key with the given separator.
    ///
    /// ```
    /// use curriculum::{KeySeparator, NavigationKey};
    ///
    /// let key = NavigationKey::new("L1", "Topic A", "Item α");
    /// let encoded = key.encode_with(KeySeparator::DoubleColon);
    ///
    /// assert_eq!(encoded, "L1::Topic%20A::Item%20%CE%B1");
    /// assert_eq!(encoded.parse::<NavigationKey>().unwrap(), key);
    /// ```
    #[must_use]
    pub fn encode_with(&self, separator: KeySeparator) -> String {
        [&self.level_id, &self.topic, &self.item]
            .map(|field| utf8_percent_encode(field, FIELD).to_string())
            .join(separator.as_str())
    }
}

impl fmt::Display for NavigationKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode_with(KeySeparator::default()))
    }
}

impl FromStr for NavigationKey {
    type Err = NavigationKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();

        // The first separator that yields exactly three fields wins.
        let mut found = 1;
        let fields = KeySeparator::ALL.iter().find_map(|separator| {
            let parts: Vec<&str> = key.split(separator.as_str()).collect();
            if parts.len() == 3 {
                Some(parts)
            } else {
                found = found.max(parts.len());
                None
            }
        });

        let Some(fields) = fields else {
            return Err(NavigationKeyError::FieldCount {
                key: s.to_string(),
                found,
            });
        };

        let decoded = fields
            .into_iter()
            .map(|field| {
                percent_decode_str(field)
                    .decode_utf8()
                    .map(|text| text.into_owned())
                    .map_err(|_| NavigationKeyError::Encoding(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if decoded.iter().any(|field| field.trim().is_empty()) {
            return Err(NavigationKeyError::EmptyField(s.to_string()));
        }

        let [level_id, topic, item]: [String; 3] = decoded
            .try_into()
            .map_err(|_| NavigationKeyError::FieldCount {
                key: s.to_string(),
                found: 3,
            })?;

        Ok(Self {
            level_id,
            topic,
            item,
        })
    }
}

impl TryFrom<&str> for NavigationKey {
    type Error = NavigationKeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl Serialize for NavigationKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NavigationKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
