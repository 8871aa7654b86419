//! Free-text search over every topic, sub-topic and item.

use std::collections::HashSet;

use serde::Serialize;
use tracing::instrument;

use crate::{
    catalog::Catalog,
    domain::{CanonicalId, NavigationKey, SkillLevel, normalize::normalize},
};

/// Separator between the parts of a hit's subtitle.
const SUBTITLE_SEPARATOR: &str = " • ";

/// What a search hit points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    /// A topic.
    Topic,
    /// An authored sub-topic.
    SubTopic,
    /// An item.
    Item,
}

/// A search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    /// What the hit points at.
    pub kind: HitKind,
    /// Level of the hit.
    pub level: SkillLevel,
    /// Topic, sub-topic or item title.
    pub title: String,
    /// Where the hit lives: `level • topic • sub-topic`.
    pub subtitle: String,
    /// Deep-link key, for items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_key: Option<NavigationKey>,
    /// Exercise id, for items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_id: Option<CanonicalId>,
}

#[derive(Debug, Clone)]
struct Entry {
    hit: Hit,
    title: String,
    subtitle: String,
}

impl Entry {
    fn new(hit: Hit) -> Self {
        Self {
            title: normalize(&hit.title),
            subtitle: normalize(&hit.subtitle),
            hit,
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.title.contains(query) || self.subtitle.contains(query)
    }

    fn dedupe_key(&self) -> String {
        self.hit
            .navigation_key
            .as_ref()
            .map_or_else(|| self.title.clone(), ToString::to_string)
    }
}

/// A precomputed, normalized index of the catalog for repeated searches.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<Entry>,
}

impl SearchIndex {
    /// Indexes every topic, authored sub-topic and item of a catalog.
    ///
    /// Sub-topics that only repeat their topic's title are not indexed.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let mut entries = Vec::new();

        for level in catalog.levels() {
            let label = level.label();
            for topic in catalog.topics(level) {
                entries.push(Entry::new(Hit {
                    kind: HitKind::Topic,
                    level,
                    title: topic.title().to_string(),
                    subtitle: label.to_string(),
                    navigation_key: None,
                    canonical_id: None,
                }));

                let topic_subtitle = [label, topic.title()].join(SUBTITLE_SEPARATOR);
                for sub_topic in topic.sub_topics() {
                    if sub_topic.normalized_title() == topic.normalized_title() {
                        continue;
                    }
                    entries.push(Entry::new(Hit {
                        kind: HitKind::SubTopic,
                        level,
                        title: sub_topic.title().to_string(),
                        subtitle: topic_subtitle.clone(),
                        navigation_key: None,
                        canonical_id: None,
                    }));
                }

                for entry in catalog.topic_items(level, topic) {
                    let subtitle = match entry.sub_topic {
                        Some(sub_topic) => [label, entry.topic, sub_topic].join(SUBTITLE_SEPARATOR),
                        None => topic_subtitle.clone(),
                    };
                    entries.push(Entry::new(Hit {
                        kind: HitKind::Item,
                        level,
                        title: entry.item.display_name().to_string(),
                        subtitle,
                        navigation_key: Some(entry.navigation_key()),
                        canonical_id: Some(entry.canonical_id()),
                    }));
                }
            }
        }

        tracing::debug!("Indexed {} search entries", entries.len());
        Self { entries }
    }

    /// Number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds every entry whose normalized title or subtitle contains the
    /// normalized query.
    ///
    /// Hits are deduplicated by navigation key (or normalized title when
    /// there is none) and sorted by title. A blank query finds nothing.
    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, query: &str) -> Vec<Hit> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut hits: Vec<Hit> = self
            .entries
            .iter()
            .filter(|entry| entry.matches(&query))
            .filter(|entry| seen.insert(entry.dedupe_key()))
            .map(|entry| entry.hit.clone())
            .collect();

        hits.sort_by(|a, b| a.title.cmp(&b.title));
        hits
    }
}

impl Catalog {
    /// Searches the catalog once. Build a [`SearchIndex`] for repeated
    /// queries.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Hit> {
        SearchIndex::build(self).search(query)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use test_case::test_case;

    use super::*;
    use crate::catalog::{SubTopic, Topic};

    fn catalog() -> Catalog {
        let yellow = vec![
            Topic::new("שחרורים")
                .unwrap()
                .with_sub_topic(SubTopic::new("מתפיסות", ["שחרור מתפיסת יד"]).unwrap())
                .with_sub_topic(SubTopic::new("מתפיסות ", ["שחרור מתפיסת יד"]).unwrap())
                .with_sub_topic(SubTopic::new("שחרורים", ["שחרור מחביקה"]).unwrap()),
            Topic::new("בעיטות")
                .unwrap()
                .with_items(["בעיטה רגילה", "def:external:kick::בעיטה לצד"]),
        ];
        Catalog::new(BTreeMap::from([(SkillLevel::Yellow, yellow)]))
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "spaces")]
    #[test_case("\u{200F}"; "only a bidi mark")]
    fn blank_query_finds_nothing(query: &str) {
        assert!(catalog().search(query).is_empty());
    }

    #[test]
    fn sub_topic_title_match_surfaces_the_sub_topic_once() {
        let hits = SearchIndex::build(&catalog()).search("תפיסות");

        let sub_topics: Vec<_> = hits
            .iter()
            .filter(|hit| hit.kind == HitKind::SubTopic)
            .collect();
        assert_eq!(sub_topics.len(), 1);
        assert_eq!(sub_topics[0].subtitle, "חגורה צהובה • שחרורים");

        let items: Vec<_> = hits.iter().filter(|hit| hit.kind == HitKind::Item).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "שחרור מתפיסת יד");
        assert_eq!(
            items[0].navigation_key.as_ref().map(NavigationKey::item),
            Some("שחרור מתפיסת יד")
        );
    }

    #[test]
    fn parent_echo_sub_topic_is_not_indexed() {
        let hits = catalog().search("שחרורים");
        let kinds: Vec<_> = hits
            .iter()
            .filter(|hit| hit.title == "שחרורים")
            .map(|hit| hit.kind)
            .collect();
        assert_eq!(kinds, vec![HitKind::Topic]);
    }

    #[test]
    fn hits_are_sorted_by_title_and_keep_display_text() {
        let hits = catalog().search("בעיט");
        let titles: Vec<_> = hits.iter().map(|hit| hit.title.as_str()).collect();
        assert_eq!(titles, vec!["בעיטה לצד", "בעיטה רגילה", "בעיטות"]);

        let tagged = &hits[0];
        assert_eq!(tagged.subtitle, "חגורה צהובה • בעיטות");
        assert_eq!(
            tagged.canonical_id.as_ref().map(CanonicalId::as_str),
            Some("yellow|בעיטות||בעיטה לצד")
        );
    }

    #[test]
    fn query_is_normalized() {
        let hits = catalog().search("  בְּעִיטָה   רגילה ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].kind, HitKind::Item);
    }

    #[test]
    fn index_counts_entries() {
        let index = SearchIndex::build(&catalog());
        // 2 topics, 2 indexed sub-topics, 5 items.
        assert_eq!(index.len(), 9);
        assert!(!index.is_empty());
        assert!(SearchIndex::default().is_empty());
    }
}
