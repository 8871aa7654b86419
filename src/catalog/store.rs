//! The immutable, hierarchical curriculum catalog.
//!
//! The [`Catalog`] owns every topic, sub-topic and item. It is built once
//! (from the built-in curriculum, a YAML file, or explicit values) and only
//! read afterwards, so it can be shared across threads by reference.

use std::{
    collections::BTreeMap,
    fmt, io,
    path::{Path, PathBuf},
};

use non_empty_string::NonEmptyString;
use serde::Deserialize;

use crate::domain::{
    CanonicalId, NavigationKey, ParsedItem, SkillLevel, normalize::normalize,
};

/// Errors raised while constructing a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A topic title is blank.
    #[error("Topic title must not be blank")]
    BlankTopicTitle,

    /// A sub-topic title is blank.
    #[error("Sub-topic title must not be blank")]
    BlankSubTopicTitle,

    /// The catalog file could not be read.
    #[error("Failed to read catalog file {}: {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// The catalog file is not valid YAML for the catalog format.
    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A titled node holding a title and its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Title {
    text: NonEmptyString,
    normalized: String,
}

impl Title {
    fn new(text: String) -> Option<Self> {
        let normalized = normalize(&text);
        if normalized.is_empty() {
            return None;
        }
        let text = NonEmptyString::new(text).ok()?;
        Some(Self { text, normalized })
    }
}

/// Third catalog level: a titled list of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTopic {
    title: Title,
    items: Vec<ParsedItem>,
}

impl SubTopic {
    /// Creates a sub-topic, parsing every raw item.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BlankSubTopicTitle`] if the title is blank.
    pub fn new<I>(title: impl Into<String>, items: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator,
        I::Item: Into<ParsedItem>,
    {
        let title = Title::new(title.into()).ok_or(CatalogError::BlankSubTopicTitle)?;
        Ok(Self {
            title,
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    /// The authored title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.text.as_str()
    }

    /// The normalized title.
    #[must_use]
    pub fn normalized_title(&self) -> &str {
        &self.title.normalized
    }

    /// The parsed items, in authored order.
    #[must_use]
    pub fn items(&self) -> &[ParsedItem] {
        &self.items
    }
}

/// Second catalog level.
///
/// A topic holds either a flat list of items or a list of sub-topics. When
/// both are authored, the sub-topics win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    title: Title,
    items: Vec<ParsedItem>,
    sub_topics: Vec<SubTopic>,
}

impl Topic {
    /// Creates an empty topic.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BlankTopicTitle`] if the title is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, CatalogError> {
        let title = Title::new(title.into()).ok_or(CatalogError::BlankTopicTitle)?;
        Ok(Self {
            title,
            items: Vec::new(),
            sub_topics: Vec::new(),
        })
    }

    /// Appends flat items.
    #[must_use]
    pub fn with_items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ParsedItem>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Appends a sub-topic.
    #[must_use]
    pub fn with_sub_topic(mut self, sub_topic: SubTopic) -> Self {
        self.sub_topics.push(sub_topic);
        self
    }

    /// The authored title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.text.as_str()
    }

    /// The normalized title.
    #[must_use]
    pub fn normalized_title(&self) -> &str {
        &self.title.normalized
    }

    /// The flat items (ignored for enumeration when sub-topics exist).
    #[must_use]
    pub fn items(&self) -> &[ParsedItem] {
        &self.items
    }

    /// The authored sub-topics.
    #[must_use]
    pub fn sub_topics(&self) -> &[SubTopic] {
        &self.sub_topics
    }

    /// Finds an authored sub-topic by normalized title.
    #[must_use]
    pub fn sub_topic(&self, title: &str) -> Option<&SubTopic> {
        let wanted = normalize(title);
        if wanted.is_empty() {
            return None;
        }
        self.sub_topics
            .iter()
            .find(|sub| sub.normalized_title() == wanted)
    }

    /// Every item of the topic with the sub-topic it sits in, in authored
    /// order.
    pub fn entries(&self) -> impl Iterator<Item = (Option<&SubTopic>, &ParsedItem)> + '_ {
        let nested = self
            .sub_topics
            .iter()
            .flat_map(|sub| sub.items.iter().map(move |item| (Some(sub), item)));
        let flat = self
            .items
            .iter()
            .filter(|_| self.sub_topics.is_empty())
            .map(|item| (None, item));
        nested.chain(flat)
    }
}

/// A borrowed item together with its real catalog location.
///
/// Resolvers hand out items as `ItemRef`s so that ids are always computed
/// from where the item actually lives, however it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef<'a> {
    /// Level the item belongs to.
    pub level: SkillLevel,
    /// Title of the topic holding the item.
    pub topic: &'a str,
    /// Title of the authored sub-topic holding the item, if any.
    pub sub_topic: Option<&'a str>,
    /// The parsed item.
    pub item: &'a ParsedItem,
}

impl<'a> ItemRef<'a> {
    pub(super) fn new(
        level: SkillLevel,
        topic: &'a Topic,
        sub_topic: Option<&'a SubTopic>,
        item: &'a ParsedItem,
    ) -> Self {
        Self {
            level,
            topic: topic.title(),
            sub_topic: sub_topic.map(SubTopic::title),
            item,
        }
    }

    /// The item's canonical id.
    #[must_use]
    pub fn canonical_id(&self) -> CanonicalId {
        CanonicalId::new(self.level, self.topic, self.sub_topic, self.item)
    }

    /// A deep-link key back to this item.
    #[must_use]
    pub fn navigation_key(&self) -> NavigationKey {
        NavigationKey::for_item(self.level, self.topic, self.item.display_name())
    }
}

impl fmt::Display for ItemRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} › {}", self.level, self.topic)?;
        if let Some(sub_topic) = self.sub_topic {
            write!(f, " › {sub_topic}")?;
        }
        write!(f, " › {}", self.item.raw())
    }
}

/// A canonical id shared by more than one catalog location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateId<'a> {
    /// The shared id.
    pub id: CanonicalId,
    /// Every location producing it.
    pub locations: Vec<ItemRef<'a>>,
}

/// The curriculum catalog: skill level → topic → (items | sub-topics → items).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    levels: BTreeMap<SkillLevel, Vec<Topic>>,
}

impl Catalog {
    /// Builds a catalog from explicit values.
    ///
    /// Runs the canonical id consistency check once and logs any duplicates.
    #[must_use]
    pub fn new(levels: BTreeMap<SkillLevel, Vec<Topic>>) -> Self {
        let catalog = Self { levels };
        for duplicate in catalog.duplicate_canonical_ids() {
            tracing::warn!(
                id = %duplicate.id,
                count = duplicate.locations.len(),
                "Canonical id is shared by several catalog items"
            );
        }
        catalog
    }

    /// Loads a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML for the
    /// catalog format, or contains a blank topic or sub-topic title.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        tracing::debug!("Loaded catalog from {}", path.display());
        Ok(catalog)
    }

    /// Parses a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML for the catalog format,
    /// or contains a blank topic or sub-topic title.
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let file: Versions = serde_yaml::from_str(content)?;
        let Versions::V1 { levels } = file;

        let levels = levels
            .into_iter()
            .map(|(level, topics)| {
                let topics = topics
                    .into_iter()
                    .map(TopicFile::into_topic)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((level, topics))
            })
            .collect::<Result<BTreeMap<_, _>, CatalogError>>()?;

        Ok(Self::new(levels))
    }

    /// Levels present in the catalog, in order.
    pub fn levels(&self) -> impl Iterator<Item = SkillLevel> + '_ {
        self.levels.keys().copied()
    }

    /// Topics of a level, in authored order. Empty for an absent level.
    #[must_use]
    pub fn topics(&self, level: SkillLevel) -> &[Topic] {
        self.levels
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Finds a topic by exact normalized title.
    #[must_use]
    pub fn topic(&self, level: SkillLevel, title: &str) -> Option<&Topic> {
        let wanted = normalize(title);
        if wanted.is_empty() {
            return None;
        }
        self.topics(level)
            .iter()
            .find(|topic| topic.normalized_title() == wanted)
    }

    /// Every item of a topic, with its location.
    pub fn topic_items<'a>(
        &'a self,
        level: SkillLevel,
        topic: &'a Topic,
    ) -> impl Iterator<Item = ItemRef<'a>> + 'a {
        topic
            .entries()
            .map(move |(sub_topic, item)| ItemRef::new(level, topic, sub_topic, item))
    }

    /// Every item of a level, with its location.
    pub fn level_items(&self, level: SkillLevel) -> impl Iterator<Item = ItemRef<'_>> + '_ {
        self.topics(level)
            .iter()
            .flat_map(move |topic| self.topic_items(level, topic))
    }

    /// Every item of the catalog, level by level.
    pub fn items(&self) -> impl Iterator<Item = ItemRef<'_>> + '_ {
        self.levels().flat_map(move |level| self.level_items(level))
    }

    /// Canonical ids produced by more than one item location.
    ///
    /// The catalog does not reject duplicates; this is the consistency check
    /// callers run to find them.
    #[must_use]
    pub fn duplicate_canonical_ids(&self) -> Vec<DuplicateId<'_>> {
        let mut by_id: BTreeMap<CanonicalId, Vec<ItemRef<'_>>> = BTreeMap::new();
        for item in self.items() {
            by_id.entry(item.canonical_id()).or_default().push(item);
        }

        by_id
            .into_iter()
            .filter(|(_, locations)| locations.len() > 1)
            .map(|(id, locations)| DuplicateId { id, locations })
            .collect()
    }
}

/// The serialized versions of the catalog file.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        levels: BTreeMap<SkillLevel, Vec<TopicFile>>,
    },
}

#[derive(Debug, Deserialize)]
struct TopicFile {
    title: String,
    #[serde(default)]
    items: Vec<String>,
    #[serde(default)]
    sub_topics: Vec<SubTopicFile>,
}

#[derive(Debug, Deserialize)]
struct SubTopicFile {
    title: String,
    #[serde(default)]
    items: Vec<String>,
}

impl TopicFile {
    fn into_topic(self) -> Result<Topic, CatalogError> {
        let mut topic = Topic::new(self.title)?.with_items(self.items);
        for sub in self.sub_topics {
            topic = topic.with_sub_topic(SubTopic::new(sub.title, sub.items)?);
        }
        Ok(topic)
    }
}
