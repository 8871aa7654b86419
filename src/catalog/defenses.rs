//! Tag-filtered extraction from a level's defenses topic.

use tracing::instrument;

use crate::{
    catalog::{Catalog, ItemRef, Topic},
    domain::{Config, DefenseFamily, KeywordFilter, SkillLevel, normalize::normalize},
};

/// Normalized titles of the real defenses topic.
const DEFENSE_TOPIC_TITLES: &[&str] = &["הגנות", "defenses"];

/// Resolution policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// When a defense-family view finds nothing and none of the level's
    /// defenses carries family information, show every defense instead.
    pub family_fallback: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            family_fallback: true,
        }
    }
}

impl From<&Config> for ResolveOptions {
    fn from(config: &Config) -> Self {
        Self {
            family_fallback: config.family_fallback,
        }
    }
}

/// Whether a topic title names the real defenses topic.
#[must_use]
pub fn is_defense_topic(title: &str) -> bool {
    DEFENSE_TOPIC_TITLES.contains(&normalize(title).as_str())
}

/// The family of a virtual defense view label such as `הגנות פנימיות`.
///
/// The label must mention defenses and exactly one family.
#[must_use]
pub fn virtual_defense_family(title: &str) -> Option<DefenseFamily> {
    let normalized = normalize(title);
    let mentions_defenses = DEFENSE_TOPIC_TITLES
        .iter()
        .any(|word| normalized.contains(word));
    if mentions_defenses {
        DefenseFamily::detect(&normalized)
    } else {
        None
    }
}

impl Catalog {
    /// The level's real defenses topic.
    #[must_use]
    pub fn defense_topic(&self, level: SkillLevel) -> Option<&Topic> {
        self.topics(level)
            .iter()
            .find(|topic| DEFENSE_TOPIC_TITLES.contains(&topic.normalized_title()))
    }

    /// Display names of the level's defenses selected by a hint and keywords.
    ///
    /// See [`Catalog::defense_entries`].
    #[must_use]
    pub fn defense_items(
        &self,
        level: SkillLevel,
        sub_topic_hint: Option<&str>,
        keywords: &KeywordFilter,
    ) -> Vec<&str> {
        self.defense_entries(level, sub_topic_hint, keywords, ResolveOptions::default())
            .into_iter()
            .map(|entry| entry.item.display_name())
            .collect()
    }

    /// The level's defenses selected by a hint and keywords, in catalog order.
    ///
    /// 1. A hint naming a real sub-topic of the defenses topic restricts the
    ///    pool to that sub-topic; otherwise the pool is every defense.
    /// 2. Any other hint naming a family (`internal`, `הגנות חיצוניות`, ...)
    ///    keeps the items tagged with that family. If that leaves nothing and
    ///    no item in the pool has a family at all, the whole pool is kept
    ///    (when [`ResolveOptions::family_fallback`] allows it).
    /// 3. The keyword filter is applied to each item's tag and display name.
    #[instrument(level = "debug", skip(self, keywords, options))]
    pub fn defense_entries(
        &self,
        level: SkillLevel,
        sub_topic_hint: Option<&str>,
        keywords: &KeywordFilter,
        options: ResolveOptions,
    ) -> Vec<ItemRef<'_>> {
        let Some(topic) = self.defense_topic(level) else {
            tracing::debug!("No defenses topic for level {level}");
            return Vec::new();
        };

        let hint = sub_topic_hint
            .map(str::trim)
            .filter(|hint| !hint.is_empty());
        let locked = hint.and_then(|hint| topic.sub_topic(hint));

        let pool: Vec<ItemRef<'_>> = match locked {
            Some(sub_topic) => self
                .topic_items(level, topic)
                .filter(|entry| entry.sub_topic == Some(sub_topic.title()))
                .collect(),
            None => self.topic_items(level, topic).collect(),
        };

        let family = if locked.is_none() {
            hint.and_then(DefenseFamily::detect)
        } else {
            None
        };

        let candidates = match family {
            None => pool,
            Some(family) => {
                let filtered: Vec<_> = pool
                    .iter()
                    .copied()
                    .filter(|entry| entry.item.family() == Some(family))
                    .collect();

                let untagged_level = pool.iter().all(|entry| entry.item.family().is_none());
                if filtered.is_empty() && untagged_level && options.family_fallback {
                    tracing::warn!(
                        level = %level,
                        family = family.as_str(),
                        "No defense carries family information, showing all defenses"
                    );
                    pool
                } else {
                    filtered
                }
            }
        };

        let keywords = keywords.compile();
        candidates
            .into_iter()
            .filter(|entry| keywords.matches(entry.item))
            .collect()
    }
}
