//! Classification tags embedded in raw catalog items.
//!
//! A raw item is either a bare display name or a display name joined to a tag
//! with [`ITEM_DELIMITER`], in either order:
//!
//! - `הגנה נגד בעיטה`
//! - `def:external:kick::הגנה נגד בעיטה`
//! - `הגנה נגד בעיטה::def_external_kicks`
//!
//! [`ParsedItem::parse`] splits the two apart once, when the catalog is built.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::normalize::normalize;

/// Delimiter between a tag and a display name inside a raw item.
pub const ITEM_DELIMITER: &str = "::";

/// The only tag scope in use: defense exercises.
pub const DEFENSE_SCOPE: &str = "def";

static CANONICAL_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^def:(internal|external):(punch|kick)$").expect("static pattern is valid")
});

static LEGACY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^def_(internal|external)_(punch|punches|kick|kicks)$")
        .expect("static pattern is valid")
});

const INTERNAL_WORDS: &[&str] = &["פנימי", "internal"];
const EXTERNAL_WORDS: &[&str] = &["חיצוני", "external"];
const KICK_WORDS: &[&str] = &["בעיט", "kick"];
const PUNCH_WORDS: &[&str] = &["אגרוף", "אגרופ", "מכה", "מכות", "מכת", "punch", "strike"];

/// Which side of the body a defense deflects towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefenseFamily {
    /// Deflection towards the inside line.
    Internal,
    /// Deflection towards the outside line.
    External,
}

impl DefenseFamily {
    /// Tag vocabulary spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
        }
    }

    /// Detects a family from free text (a display name, a hint, a topic
    /// title). Returns `None` when neither or both families are mentioned.
    #[must_use]
    pub fn detect(text: &str) -> Option<Self> {
        Self::detect_normalized(&normalize(text))
    }

    fn detect_normalized(normalized: &str) -> Option<Self> {
        let internal = mentions_any(normalized, INTERNAL_WORDS);
        let external = mentions_any(normalized, EXTERNAL_WORDS);
        match (internal, external) {
            (true, false) => Some(Self::Internal),
            (false, true) => Some(Self::External),
            _ => None,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "internal" => Some(Self::Internal),
            "external" => Some(Self::External),
            _ => None,
        }
    }
}

/// The attack a defense answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefenseAction {
    /// Punches and other hand strikes.
    Punch,
    /// Kicks.
    Kick,
}

impl DefenseAction {
    /// Tag vocabulary spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Punch => "punch",
            Self::Kick => "kick",
        }
    }

    fn detect(normalized: &str) -> Option<Self> {
        let kick = mentions_any(normalized, KICK_WORDS);
        let punch = mentions_any(normalized, PUNCH_WORDS);
        match (kick, punch) {
            (true, false) => Some(Self::Kick),
            (false, true) => Some(Self::Punch),
            _ => None,
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "punch" | "punches" => Some(Self::Punch),
            "kick" | "kicks" => Some(Self::Kick),
            _ => None,
        }
    }
}

fn mentions_any(normalized: &str, words: &[&str]) -> bool {
    words.iter().any(|word| normalized.contains(word))
}

/// A classification overlay on a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassificationTag {
    /// A recognised defense tag, `def:<family>:<action>`.
    Defense {
        /// Deflection family.
        family: DefenseFamily,
        /// Attack being defended.
        action: DefenseAction,
    },
    /// Tag-shaped text outside the known vocabulary, kept verbatim.
    Other(String),
}

impl ClassificationTag {
    /// Parses tag-shaped text, canonicalizing legacy spellings.
    ///
    /// Returns `None` when the text does not look like a tag at all.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !looks_like_tag(text) {
            return None;
        }

        let captures = CANONICAL_TAG
            .captures(text)
            .or_else(|| LEGACY_TAG.captures(text));

        let tag = captures
            .and_then(|caps| {
                let family = DefenseFamily::from_word(&caps[1])?;
                let action = DefenseAction::from_word(&caps[2])?;
                Some(Self::Defense { family, action })
            })
            .unwrap_or_else(|| Self::Other(text.to_string()));

        Some(tag)
    }

    /// Infers a defense tag from display-name keywords.
    ///
    /// Both the family and the action must be determined, otherwise no tag is
    /// produced.
    #[must_use]
    pub fn infer(display_name: &str) -> Option<Self> {
        let normalized = normalize(display_name);
        let family = DefenseFamily::detect_normalized(&normalized)?;
        let action = DefenseAction::detect(&normalized)?;
        Some(Self::Defense { family, action })
    }

    /// The defense family, if this is a recognised defense tag.
    #[must_use]
    pub const fn family(&self) -> Option<DefenseFamily> {
        match self {
            Self::Defense { family, .. } => Some(*family),
            Self::Other(_) => None,
        }
    }

    /// The defended action, if this is a recognised defense tag.
    #[must_use]
    pub const fn action(&self) -> Option<DefenseAction> {
        match self {
            Self::Defense { action, .. } => Some(*action),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ClassificationTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Defense { family, action } => {
                write!(f, "{DEFENSE_SCOPE}:{}:{}", family.as_str(), action.as_str())
            }
            Self::Other(text) => f.write_str(text),
        }
    }
}

impl Serialize for ClassificationTag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClassificationTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value).unwrap_or(Self::Other(value)))
    }
}

/// Whether text starts with a recognised tag prefix (`def:` or `def_`).
fn looks_like_tag(text: &str) -> bool {
    let bytes = text.as_bytes();
    let scope_len = DEFENSE_SCOPE.len();
    bytes.len() > scope_len
        && bytes[..scope_len].eq_ignore_ascii_case(DEFENSE_SCOPE.as_bytes())
        && matches!(bytes[scope_len], b':' | b'_')
}

/// A raw catalog item split into its display name and optional tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ParsedItem {
    raw: String,
    display_name: String,
    tag: Option<ClassificationTag>,
    inferred: bool,
}

impl ParsedItem {
    /// Parses a raw item.
    ///
    /// - Without a delimiter the whole (trimmed) text is the display name and
    ///   the tag is inferred from its keywords.
    /// - With a delimiter the text is split at its last occurrence; the side
    ///   that looks like a tag becomes the tag. When neither side does, the
    ///   text after the delimiter is the display name and there is no tag.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let Some((left, right)) = raw.rsplit_once(ITEM_DELIMITER) else {
            let display_name = raw.trim().to_string();
            let tag = ClassificationTag::infer(&display_name);
            return Self {
                raw: raw.to_string(),
                inferred: tag.is_some(),
                display_name,
                tag,
            };
        };

        let (display_name, tag) = if let Some(tag) = ClassificationTag::parse(left) {
            (right, Some(tag))
        } else if let Some(tag) = ClassificationTag::parse(right) {
            (left, Some(tag))
        } else {
            (right, None)
        };

        Self {
            raw: raw.to_string(),
            display_name: display_name.trim().to_string(),
            tag,
            inferred: false,
        }
    }

    /// The authored text, exactly as written.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The text shown to users.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The explicit or inferred tag, if any.
    #[must_use]
    pub const fn tag(&self) -> Option<&ClassificationTag> {
        self.tag.as_ref()
    }

    /// Whether the tag came from the keyword heuristic rather than the text.
    #[must_use]
    pub const fn is_tag_inferred(&self) -> bool {
        self.inferred
    }

    /// The canonical tag text, or an empty string when untagged.
    #[must_use]
    pub fn tag_text(&self) -> String {
        self.tag.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// The defense family of the tag, if known.
    #[must_use]
    pub fn family(&self) -> Option<DefenseFamily> {
        self.tag.as_ref().and_then(ClassificationTag::family)
    }

    /// The normalized text keyword filters are matched against: the tag
    /// followed by the display name.
    #[must_use]
    pub fn keyword_haystack(&self) -> String {
        let tag = normalize(&self.tag_text());
        let name = normalize(&self.display_name);
        if tag.is_empty() {
            name
        } else {
            format!("{tag} {name}")
        }
    }
}

impl From<&str> for ParsedItem {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for ParsedItem {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}
