//! Resolution of subjects into display sections.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::instrument;

use crate::{
    catalog::{Catalog, ItemRef, ResolveOptions, TopicMatch, is_defense_topic},
    domain::{
        CanonicalId, ClassificationTag, CompiledKeywords, DefenseFamily, NavigationKey, SkillLevel,
        Subject, normalize::normalize,
    },
};

/// Title words marking a "releases"-like topic, whose repeated exercises are
/// shown once.
const RELEASE_WORDS: &[&str] = &["שחרור", "release"];

/// A catalog item ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiItem {
    /// Text shown to users.
    pub display_name: String,
    /// Stable exercise id.
    pub canonical_id: CanonicalId,
    /// Deep-link key back to the item.
    pub navigation_key: NavigationKey,
    /// The authored item text.
    pub raw_text: String,
    /// Title of the real topic holding the item.
    pub topic_title: String,
    /// Title of the real sub-topic holding the item, if any.
    pub sub_topic_title: Option<String>,
    /// Explicit or inferred classification tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<ClassificationTag>,
}

impl From<ItemRef<'_>> for UiItem {
    fn from(entry: ItemRef<'_>) -> Self {
        Self {
            display_name: entry.item.display_name().to_string(),
            canonical_id: entry.canonical_id(),
            navigation_key: entry.navigation_key(),
            raw_text: entry.item.raw().to_string(),
            topic_title: entry.topic.to_string(),
            sub_topic_title: entry.sub_topic.map(str::to_string),
            tag: entry.item.tag().cloned(),
        }
    }
}

/// A titled group of items produced for one topic of a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Topic title, or `Topic • hint` for a defense-family view.
    pub title: String,
    /// Items in catalog order.
    pub items: Vec<UiItem>,
}

impl Catalog {
    /// Resolves a subject at one level, with the default [`ResolveOptions`].
    #[must_use]
    pub fn resolve_subject(&self, level: SkillLevel, subject: &Subject) -> Vec<Section> {
        self.resolve_subject_with(level, subject, ResolveOptions::default())
    }

    /// Resolves a subject at one level.
    ///
    /// Produces one section per listed topic, in the subject's order. A
    /// defenses topic is filtered by the subject's hint and keywords; any other
    /// topic is expanded through its sub-topics, optionally locked to the one
    /// named by the hint, then filtered by keywords. Topics left without items
    /// are dropped. A level the subject does not list yields nothing.
    #[instrument(level = "debug", skip(self, subject, options), fields(subject = %subject.id))]
    pub fn resolve_subject_with(
        &self,
        level: SkillLevel,
        subject: &Subject,
        options: ResolveOptions,
    ) -> Vec<Section> {
        let hint = subject
            .sub_topic_hint
            .as_deref()
            .map(str::trim)
            .filter(|hint| !hint.is_empty());
        let keywords = subject.keywords.compile();

        subject
            .topics_for(level)
            .iter()
            .filter_map(|title| {
                let section = if is_defense_topic(title) {
                    self.defense_section(level, hint, subject, options)
                } else {
                    self.topic_section(level, title, hint, &keywords, options)
                };
                if section.is_none() {
                    tracing::debug!("Subject topic '{title}' yields no items at level {level}");
                }
                section
            })
            .collect()
    }

    /// Resolves a subject at every level it lists, skipping levels that yield
    /// nothing.
    #[must_use]
    pub fn resolve_subject_all(
        &self,
        subject: &Subject,
        options: ResolveOptions,
    ) -> BTreeMap<SkillLevel, Vec<Section>> {
        subject
            .levels()
            .map(|level| (level, self.resolve_subject_with(level, subject, options)))
            .filter(|(_, sections)| !sections.is_empty())
            .collect()
    }

    fn defense_section(
        &self,
        level: SkillLevel,
        hint: Option<&str>,
        subject: &Subject,
        options: ResolveOptions,
    ) -> Option<Section> {
        let topic = self.defense_topic(level)?;
        let entries = self.defense_entries(level, hint, &subject.keywords, options);

        let family_view = hint.filter(|hint| {
            topic.sub_topic(hint).is_none() && DefenseFamily::detect(hint).is_some()
        });
        let title = match family_view {
            Some(hint) => format!("{} • {hint}", topic.title()),
            None => topic.title().to_string(),
        };

        build_section(title, entries)
    }

    fn topic_section(
        &self,
        level: SkillLevel,
        title: &str,
        hint: Option<&str>,
        keywords: &CompiledKeywords,
        options: ResolveOptions,
    ) -> Option<Section> {
        let located = self.locate_topic(level, title)?;
        let section_title = match located {
            TopicMatch::Virtual { .. } => title.trim().to_string(),
            TopicMatch::Exact(topic) | TopicMatch::Relaxed(topic) => topic.title().to_string(),
        };

        let sub_topics = self.resolve_located(level, title, located, options);
        let wanted = hint.map(normalize);
        let locked = wanted.as_deref().and_then(|wanted| {
            sub_topics
                .iter()
                .position(|sub_topic| normalize(sub_topic.title()) == wanted)
        });

        let entries = sub_topics
            .into_iter()
            .enumerate()
            .filter(|(index, _)| locked.is_none_or(|locked| locked == *index))
            .flat_map(|(_, sub_topic)| sub_topic.into_items())
            .filter(|entry| keywords.matches(entry.item));

        let entries: Vec<_> = if is_release_topic(&section_title) {
            let mut seen = HashSet::new();
            entries
                .filter(|entry| seen.insert(entry.canonical_id()))
                .collect()
        } else {
            entries.collect()
        };

        build_section(section_title, entries)
    }
}

fn is_release_topic(title: &str) -> bool {
    let normalized = normalize(title);
    RELEASE_WORDS.iter().any(|word| normalized.contains(word))
}

fn build_section(title: String, entries: Vec<ItemRef<'_>>) -> Option<Section> {
    if entries.is_empty() {
        return None;
    }
    Some(Section {
        title,
        items: entries.into_iter().map(UiItem::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{
        catalog::{SubTopic, Topic},
        domain::KeywordFilter,
    };

    fn catalog() -> Catalog {
        let yellow = vec![
            Topic::new("defenses").unwrap().with_items([
                "def:external:kick::External defense #1",
                "def:internal:punch::Internal defense #1",
            ]),
            Topic::new("שחרורים")
                .unwrap()
                .with_sub_topic(
                    SubTopic::new("מתפיסות", ["שחרור מתפיסת יד", "שחרור מתפיסת שיער"]).unwrap(),
                )
                .with_sub_topic(
                    SubTopic::new("מחניקות", ["שחרור מחניקה מלפנים", "שחרור מחניקה מאחור"])
                        .unwrap(),
                ),
            Topic::new("בעיטות")
                .unwrap()
                .with_items(["בעיטה רגילה", "בעיטה לצד", "בעיטת ברך"]),
        ];
        let orange = vec![
            Topic::new("הגנות")
                .unwrap()
                .with_items(["הגנה נגד אגרוף למטה", "הגנה נגד בעיטה למפשעה"]),
        ];
        Catalog::new(BTreeMap::from([
            (SkillLevel::Yellow, yellow),
            (SkillLevel::Orange, orange),
        ]))
    }

    fn defense_subject(hint: &str) -> Subject {
        Subject::new("defenses", "Defenses")
            .with_topics(SkillLevel::Yellow, ["defenses"])
            .with_hint(hint)
    }

    #[test_case("external defenses", true; "external view includes")]
    #[test_case("internal defenses", false; "internal view excludes")]
    fn family_view_of_tagged_defense(hint: &str, included: bool) {
        let sections = catalog().resolve_subject(SkillLevel::Yellow, &defense_subject(hint));
        let found = sections
            .iter()
            .flat_map(|section| &section.items)
            .any(|item| item.display_name == "External defense #1");
        assert_eq!(found, included);
    }

    #[test]
    fn family_view_section_title_carries_the_hint() {
        let sections =
            catalog().resolve_subject(SkillLevel::Yellow, &defense_subject("external defenses"));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "defenses • external defenses");

        let item = &sections[0].items[0];
        assert_eq!(item.topic_title, "defenses");
        assert_eq!(item.sub_topic_title, None);
        assert_eq!(item.raw_text, "def:external:kick::External defense #1");
        assert_eq!(item.canonical_id.as_str(), "yellow|defenses||external defense #1");
        assert_eq!(item.navigation_key.item(), "External defense #1");
        assert_eq!(item.tag.as_ref().map(ToString::to_string).as_deref(), Some("def:external:kick"));
    }

    #[test]
    fn untagged_level_falls_back_in_subjects() {
        let subject = Subject::new("internal", "הגנות פנימיות")
            .with_topics(SkillLevel::Orange, ["הגנות"])
            .with_hint("הגנות פנימיות");
        let catalog = catalog();

        let sections = catalog.resolve_subject(SkillLevel::Orange, &subject);
        assert_eq!(sections[0].items.len(), 2);

        let strict = catalog.resolve_subject_with(
            SkillLevel::Orange,
            &subject,
            ResolveOptions {
                family_fallback: false,
            },
        );
        assert!(strict.is_empty());
    }

    #[test]
    fn hint_locks_onto_a_real_sub_topic() {
        let subject = Subject::new("chokes", "שחרור מחניקות")
            .with_topics(SkillLevel::Yellow, ["שחרורים"])
            .with_hint("מחניקות");
        let sections = catalog().resolve_subject(SkillLevel::Yellow, &subject);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "שחרורים");
        let names: Vec<_> = sections[0]
            .items
            .iter()
            .map(|item| item.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["שחרור מחניקה מלפנים", "שחרור מחניקה מאחור"]);
        assert!(
            sections[0]
                .items
                .iter()
                .all(|item| item.sub_topic_title.as_deref() == Some("מחניקות"))
        );
    }

    #[test]
    fn keywords_filter_regular_topics_and_empty_topics_are_dropped() {
        let subject = Subject::new("kicks", "בעיטות")
            .with_topics(SkillLevel::Yellow, ["בעיטות", "שחרורים", "קרקע"])
            .with_keywords(KeywordFilter::new(["בעיטה", "בעיטת"], Vec::<String>::new(), ["לצד"]));
        let sections = catalog().resolve_subject(SkillLevel::Yellow, &subject);

        assert_eq!(sections.len(), 1);
        let names: Vec<_> = sections[0]
            .items
            .iter()
            .map(|item| item.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["בעיטה רגילה", "בעיטת ברך"]);
        assert_eq!(
            sections[0].items[0].canonical_id.as_str(),
            "yellow|בעיטות||בעיטה רגילה"
        );
    }

    #[test]
    fn release_topics_drop_repeated_exercises() {
        let topic = Topic::new("שחרורים")
            .unwrap()
            .with_sub_topic(SubTopic::new("מתפיסות", ["שחרור מתפיסת יד"]).unwrap())
            .with_sub_topic(SubTopic::new("מתפיסות ", ["שחרור  מתפיסת יד", "שחרור מחביקה"]).unwrap());
        let catalog = Catalog::new(BTreeMap::from([(SkillLevel::Green, vec![topic])]));
        let subject = Subject::new("releases", "שחרורים").with_topics(SkillLevel::Green, ["שחרורים"]);

        let sections = catalog.resolve_subject(SkillLevel::Green, &subject);
        let names: Vec<_> = sections[0]
            .items
            .iter()
            .map(|item| item.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["שחרור מתפיסת יד", "שחרור מחביקה"]);
    }

    #[test]
    fn unlisted_level_is_empty() {
        let subject = defense_subject("external defenses");
        assert!(catalog().resolve_subject(SkillLevel::Black, &subject).is_empty());
    }

    #[test]
    fn all_levels_skip_empty_results() {
        let subject = Subject::new("defenses", "הגנות")
            .with_topics(SkillLevel::Yellow, ["defenses"])
            .with_topics(SkillLevel::Orange, ["הגנות"])
            .with_topics(SkillLevel::Green, ["הגנות"]);
        let resolved = catalog().resolve_subject_all(&subject, ResolveOptions::default());

        assert_eq!(
            resolved.keys().copied().collect::<Vec<_>>(),
            vec![SkillLevel::Yellow, SkillLevel::Orange]
        );
        assert_eq!(resolved[&SkillLevel::Yellow][0].items.len(), 2);
    }
}
