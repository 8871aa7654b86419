use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{SkillLevel, normalize::normalize, tag::ParsedItem};

/// A cross-cutting "practice by subject" query over the catalog.
///
/// Subjects are not catalog nodes. Each one names, per level, the topics it
/// draws from, an optional sub-topic hint, and keyword lists that select the
/// items to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Stable identifier.
    pub id: String,

    /// Title shown to users.
    pub title: String,

    /// Topic titles to draw from, per level.
    #[serde(default)]
    pub topics_by_level: BTreeMap<SkillLevel, Vec<String>>,

    /// Either the title of a real sub-topic to lock onto, or a defense-family
    /// label such as `הגנות פנימיות`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_topic_hint: Option<String>,

    /// Keyword filter applied to every candidate item.
    #[serde(flatten)]
    pub keywords: KeywordFilter,
}

impl Subject {
    /// Creates a subject with no topics, hint or keywords.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            topics_by_level: BTreeMap::new(),
            sub_topic_hint: None,
            keywords: KeywordFilter::default(),
        }
    }

    /// Adds topics for a level.
    #[must_use]
    pub fn with_topics<I, S>(mut self, level: SkillLevel, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics_by_level
            .entry(level)
            .or_default()
            .extend(topics.into_iter().map(Into::into));
        self
    }

    /// Sets the sub-topic hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.sub_topic_hint = Some(hint.into());
        self
    }

    /// Sets the keyword filter.
    #[must_use]
    pub fn with_keywords(mut self, keywords: KeywordFilter) -> Self {
        self.keywords = keywords;
        self
    }

    /// The topic titles listed for a level; empty when the level is absent.
    #[must_use]
    pub fn topics_for(&self, level: SkillLevel) -> &[String] {
        self.topics_by_level
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Levels this subject draws from, in order.
    pub fn levels(&self) -> impl Iterator<Item = SkillLevel> + '_ {
        self.topics_by_level.keys().copied()
    }
}

/// Include / require-all / exclude keyword lists.
///
/// Keywords are matched as substrings of an item's normalized tag and display
/// name. Checks run in order: any excluded keyword rejects the item; every
/// required keyword must be present; at least one included keyword must be
/// present. Empty lists do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFilter {
    /// At least one of these must match.
    #[serde(default, rename = "include", skip_serializing_if = "Vec::is_empty")]
    pub include_any: Vec<String>,

    /// All of these must match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require_all: Vec<String>,

    /// None of these may match.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl KeywordFilter {
    /// Creates a filter from the three keyword lists.
    #[must_use]
    pub fn new<I, R, E>(include_any: I, require_all: R, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            include_any: include_any.into_iter().map(Into::into).collect(),
            require_all: require_all.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether no list constrains anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include_any.is_empty() && self.require_all.is_empty() && self.exclude.is_empty()
    }

    /// Normalizes every keyword once, dropping blanks, for repeated matching.
    #[must_use]
    pub fn compile(&self) -> CompiledKeywords {
        fn prepare(words: &[String]) -> Vec<String> {
            words
                .iter()
                .map(|word| normalize(word))
                .filter(|word| !word.is_empty())
                .collect()
        }

        CompiledKeywords {
            include_any: prepare(&self.include_any),
            require_all: prepare(&self.require_all),
            exclude: prepare(&self.exclude),
        }
    }
}

/// A [`KeywordFilter`] with normalized keywords.
#[derive(Debug, Clone, Default)]
pub struct CompiledKeywords {
    include_any: Vec<String>,
    require_all: Vec<String>,
    exclude: Vec<String>,
}

impl CompiledKeywords {
    /// Matches already-normalized text.
    #[must_use]
    pub fn matches_text(&self, haystack: &str) -> bool {
        if self.exclude.iter().any(|word| haystack.contains(word.as_str())) {
            return false;
        }
        if !self
            .require_all
            .iter()
            .all(|word| haystack.contains(word.as_str()))
        {
            return false;
        }
        self.include_any.is_empty()
            || self
                .include_any
                .iter()
                .any(|word| haystack.contains(word.as_str()))
    }

    /// Matches an item's tag and display name.
    #[must_use]
    pub fn matches(&self, item: &ParsedItem) -> bool {
        self.matches_text(&item.keyword_haystack())
    }
}
