//! Deep-link resolution and exercise explanations.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use tracing::instrument;

use crate::{
    catalog::{Catalog, ItemRef},
    domain::{CanonicalId, Config, NavigationKey, normalize::normalize},
};

/// Message shown when a key cannot be explained.
pub const NO_EXPLANATION: &str = "no explanation available";

/// A provider of exercise explanations keyed by canonical id.
pub trait ExplanationSource {
    /// The explanation text for an exercise, if any.
    fn explanation(&self, id: &CanonicalId) -> Option<String>;
}

impl ExplanationSource for BTreeMap<CanonicalId, String> {
    fn explanation(&self, id: &CanonicalId) -> Option<String> {
        self.get(id).cloned()
    }
}

impl ExplanationSource for Config {
    fn explanation(&self, id: &CanonicalId) -> Option<String> {
        self.explanations().explanation(id)
    }
}

/// The outcome of explaining a navigation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Explanation {
    /// The key resolved to an exercise with an explanation.
    Found {
        /// Exercise id.
        canonical_id: CanonicalId,
        /// Display name of the exercise.
        display_name: String,
        /// Explanation text.
        text: String,
    },
    /// The key is malformed, does not resolve, or has no explanation.
    Unavailable,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Found {
                display_name, text, ..
            } => write!(f, "{display_name}: {text}"),
            Self::Unavailable => f.write_str(NO_EXPLANATION),
        }
    }
}

impl Catalog {
    /// Finds the item a navigation key points at.
    ///
    /// The topic is matched by exact title, then by normalized title; the item
    /// by display name, then by authored text. Unknown levels, topics and items
    /// resolve to `None`.
    #[must_use]
    pub fn resolve_navigation_key(&self, key: &NavigationKey) -> Option<ItemRef<'_>> {
        let level = key.level()?;
        let topics = self.topics(level);
        let topic = topics
            .iter()
            .find(|topic| topic.title() == key.topic())
            .or_else(|| self.topic(level, key.topic()))?;

        let mut items = self.topic_items(level, topic);
        let wanted = normalize(key.item());
        items.find(|entry| {
            entry.item.display_name() == key.item()
                || entry.item.raw() == key.item()
                || normalize(entry.item.display_name()) == wanted
        })
    }

    /// Explains the exercise behind an encoded navigation key.
    ///
    /// Never fails: anything that cannot be explained is
    /// [`Explanation::Unavailable`].
    #[instrument(level = "debug", skip(self, source))]
    pub fn explain(&self, key: &str, source: &dyn ExplanationSource) -> Explanation {
        let key = match key.parse::<NavigationKey>() {
            Ok(key) => key,
            Err(error) => {
                tracing::debug!("{error}");
                return Explanation::Unavailable;
            }
        };

        let Some(entry) = self.resolve_navigation_key(&key) else {
            tracing::debug!("Navigation key '{key}' does not resolve");
            return Explanation::Unavailable;
        };

        let canonical_id = entry.canonical_id();
        match source.explanation(&canonical_id) {
            Some(text) => Explanation::Found {
                display_name: entry.item.display_name().to_string(),
                canonical_id,
                text,
            },
            None => Explanation::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{
        catalog::{SubTopic, Topic},
        domain::{KeySeparator, SkillLevel},
    };

    fn catalog() -> Catalog {
        let topic = Topic::new("הגנות")
            .unwrap()
            .with_sub_topic(
                SubTopic::new("נגד אגרופים", ["def:internal:punch::הגנה פנימית נגד אגרוף"])
                    .unwrap(),
            );
        Catalog::new(BTreeMap::from([(SkillLevel::Yellow, vec![topic])]))
    }

    fn explanations() -> BTreeMap<CanonicalId, String> {
        BTreeMap::from([(
            CanonicalId::from_raw(
                SkillLevel::Yellow,
                "הגנות",
                "נגד אגרופים",
                "הגנה פנימית נגד אגרוף",
            ),
            "מסיטים את האגרוף פנימה".to_string(),
        )])
    }

    #[test_case(KeySeparator::Pipe; "pipe")]
    #[test_case(KeySeparator::DoubleColon; "double colon")]
    #[test_case(KeySeparator::Slash; "slash")]
    fn key_from_any_separator_is_explained(separator: KeySeparator) {
        let key = NavigationKey::for_item(SkillLevel::Yellow, "הגנות", "הגנה פנימית נגד אגרוף");
        let explanation = catalog().explain(&key.encode_with(separator), &explanations());

        assert!(matches!(
            &explanation,
            Explanation::Found { text, .. } if text == "מסיטים את האגרוף פנימה"
        ));
        assert_eq!(
            explanation.to_string(),
            "הגנה פנימית נגד אגרוף: מסיטים את האגרוף פנימה"
        );
    }

    #[test_case("yellow|הגנות"; "malformed")]
    #[test_case("purple|הגנות|הגנה פנימית נגד אגרוף"; "unknown level")]
    #[test_case("yellow|בעיטות|הגנה פנימית נגד אגרוף"; "unknown topic")]
    #[test_case("yellow|הגנות|בעיטה"; "unknown item")]
    fn unresolved_keys_are_unavailable(key: &str) {
        let explanation = catalog().explain(key, &explanations());
        assert_eq!(explanation, Explanation::Unavailable);
        assert_eq!(explanation.to_string(), "no explanation available");
    }

    #[test]
    fn missing_text_is_unavailable() {
        let key = NavigationKey::for_item(SkillLevel::Yellow, "הגנות", "הגנה פנימית נגד אגרוף");
        let empty = BTreeMap::new();
        assert_eq!(
            catalog().explain(&key.to_string(), &empty),
            Explanation::Unavailable
        );
    }

    #[test]
    fn keys_resolve_by_raw_text_and_normalized_topic() {
        let catalog = catalog();

        let by_raw = NavigationKey::for_item(
            SkillLevel::Yellow,
            "הגנות",
            "def:internal:punch::הגנה פנימית נגד אגרוף",
        );
        let entry = catalog.resolve_navigation_key(&by_raw).unwrap();
        assert_eq!(entry.sub_topic, Some("נגד אגרופים"));

        let pointed = NavigationKey::for_item(SkillLevel::Yellow, "הֲגָנוֹת", "הגנה פנימית נגד אגרוף");
        assert!(catalog.resolve_navigation_key(&pointed).is_some());
    }

    #[test]
    fn config_is_an_explanation_source() {
        let mut config = Config::default();
        let id = CanonicalId::from_raw(SkillLevel::Yellow, "הגנות", "נגד אגרופים", "הגנה פנימית נגד אגרוף");
        config.set_explanation(id.clone(), "טקסט".to_string());

        assert_eq!(config.explanation(&id).as_deref(), Some("טקסט"));
    }
}
