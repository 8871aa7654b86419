use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{SkillLevel, normalize::normalize, tag::ParsedItem};

/// Separator between the fields of a [`CanonicalId`].
///
/// Distinct from the raw item delimiter (`::`). Occurrences inside a field
/// are escaped as `%7C` (and `%` as `%25`), so a canonical id never splits
/// differently from the tuple that produced it.
pub const CANONICAL_ID_SEPARATOR: &str = "|";

/// Stable identifier of an exercise, used as a persistence and navigation
/// key (favorites, "unknown" sets, explanations).
///
/// Format: `level-id|norm(topic)|norm(sub-topic or empty)|norm(display name)`.
///
/// The tag is not part of the identity: the same display name with and
/// without a classification tag is the same exercise. A sub-topic whose
/// normalized title equals its topic's (the implicit wrapper of a flat topic)
/// contributes an empty field, so a flat item has one id however it was
/// reached.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Builds the id of an already parsed item.
    #[must_use]
    pub fn new(level: SkillLevel, topic: &str, sub_topic: Option<&str>, item: &ParsedItem) -> Self {
        Self::from_parts(level.id(), topic, sub_topic.unwrap_or_default(), item.display_name())
    }

    /// Builds the id of a raw, unparsed item.
    ///
    /// ```
    /// use curriculum::{CanonicalId, SkillLevel};
    ///
    /// let tagged = CanonicalId::from_raw(SkillLevel::Yellow, "הגנות", "", "def:external:kick::בעיטה רגילה");
    /// let bare = CanonicalId::from_raw(SkillLevel::Yellow, "הגנות", "", "בעיטה  רגילה");
    ///
    /// assert_eq!(tagged, bare);
    /// assert_eq!(tagged.as_str(), "yellow|הגנות||בעיטה רגילה");
    /// ```
    #[must_use]
    pub fn from_raw(level: SkillLevel, topic: &str, sub_topic: &str, raw_item: &str) -> Self {
        let item = ParsedItem::parse(raw_item);
        Self::from_parts(level.id(), topic, sub_topic, item.display_name())
    }

    fn from_parts(level_id: &str, topic: &str, sub_topic: &str, display_name: &str) -> Self {
        let topic = escape_field(&normalize(topic));
        let mut sub_topic = escape_field(&normalize(sub_topic));
        if sub_topic == topic {
            sub_topic.clear();
        }
        let name = escape_field(&normalize(display_name));

        Self(
            [level_id, topic.as_str(), sub_topic.as_str(), name.as_str()]
                .join(CANONICAL_ID_SEPARATOR),
        )
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The level id field.
    #[must_use]
    pub fn level_id(&self) -> &str {
        self.0
            .split(CANONICAL_ID_SEPARATOR)
            .next()
            .unwrap_or_default()
    }
}

/// Escapes the separator inside a normalized field. Non-ASCII text is kept
/// as is so ids stay readable.
fn escape_field(field: &str) -> String {
    field.replace('%', "%25").replace('|', "%7C")
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
