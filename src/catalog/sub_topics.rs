//! Sub-topic resolution: authored sub-topics, implicit wrappers, and virtual
//! defense-family views.

use std::borrow::Cow;

use tracing::instrument;

use crate::{
    catalog::{Catalog, ItemRef, ResolveOptions, Topic, virtual_defense_family},
    domain::{DefenseFamily, KeywordFilter, SkillLevel, normalize::normalize},
};

/// How a requested topic title was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicMatch<'a> {
    /// The normalized title matched exactly.
    Exact(&'a Topic),
    /// The title is a defense-family label redirected to the real defenses
    /// topic.
    Virtual {
        /// The real defenses topic.
        topic: &'a Topic,
        /// Family named by the label.
        family: DefenseFamily,
    },
    /// The only topic whose title is a prefix of the request, or the other
    /// way round.
    Relaxed(&'a Topic),
}

impl<'a> TopicMatch<'a> {
    /// The real topic that was matched.
    #[must_use]
    pub const fn topic(&self) -> &'a Topic {
        match *self {
            Self::Exact(topic) | Self::Relaxed(topic) | Self::Virtual { topic, .. } => topic,
        }
    }
}

/// Where a resolved sub-topic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubTopicOrigin {
    /// Authored in the catalog.
    Authored,
    /// Wraps the flat items of a topic without sub-topics, titled like the
    /// topic.
    Implicit,
    /// A defense-family view over the real defenses topic.
    Virtual(DefenseFamily),
}

/// A sub-topic as seen by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSubTopic<'a> {
    title: Cow<'a, str>,
    origin: SubTopicOrigin,
    items: Vec<ItemRef<'a>>,
}

impl<'a> ResolvedSubTopic<'a> {
    /// The title shown for this sub-topic.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// How the sub-topic was produced.
    #[must_use]
    pub const fn origin(&self) -> SubTopicOrigin {
        self.origin
    }

    /// Items with their real catalog locations.
    #[must_use]
    pub fn items(&self) -> &[ItemRef<'a>] {
        &self.items
    }

    /// Consumes the sub-topic, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<ItemRef<'a>> {
        self.items
    }
}

impl Catalog {
    /// Locates a topic by title.
    ///
    /// Tries an exact normalized match, then a virtual defense-family label,
    /// then a relaxed prefix match. The relaxed match only succeeds when
    /// exactly one topic qualifies.
    #[must_use]
    pub fn locate_topic(&self, level: SkillLevel, title: &str) -> Option<TopicMatch<'_>> {
        if let Some(topic) = self.topic(level, title) {
            return Some(TopicMatch::Exact(topic));
        }

        if let Some(family) = virtual_defense_family(title) {
            if let Some(topic) = self.defense_topic(level) {
                return Some(TopicMatch::Virtual { topic, family });
            }
        }

        let wanted = normalize(title);
        if wanted.is_empty() {
            return None;
        }
        let mut candidates = self.topics(level).iter().filter(|topic| {
            let have = topic.normalized_title();
            have.starts_with(wanted.as_str()) || wanted.starts_with(have)
        });

        match (candidates.next(), candidates.next()) {
            (Some(topic), None) => Some(TopicMatch::Relaxed(topic)),
            (Some(_), Some(_)) => {
                tracing::debug!("Topic title '{title}' is ambiguous at level {level}");
                None
            }
            (None, _) => None,
        }
    }

    /// Sub-topics of a topic, with the default [`ResolveOptions`].
    #[must_use]
    pub fn sub_topics_of(&self, level: SkillLevel, title: &str) -> Vec<ResolvedSubTopic<'_>> {
        self.sub_topics_of_with(level, title, ResolveOptions::default())
    }

    /// Sub-topics of a topic.
    ///
    /// - A virtual defense-family label yields a single sub-topic titled with
    ///   the label, holding the matching defenses.
    /// - A topic with authored sub-topics yields them verbatim.
    /// - A topic with only flat items yields one implicit sub-topic carrying
    ///   the topic's own title.
    /// - Anything else, including an unknown topic, yields nothing.
    #[instrument(level = "debug", skip(self, options))]
    pub fn sub_topics_of_with(
        &self,
        level: SkillLevel,
        title: &str,
        options: ResolveOptions,
    ) -> Vec<ResolvedSubTopic<'_>> {
        let Some(located) = self.locate_topic(level, title) else {
            tracing::debug!("Topic '{title}' not found at level {level}");
            return Vec::new();
        };
        self.resolve_located(level, title, located, options)
    }

    /// Sub-topics for display, with parent-echo entries removed.
    ///
    /// An implicit wrapper repeats its topic's title; a list showing it under
    /// that topic would only echo the parent.
    #[must_use]
    pub fn ui_sub_topics(&self, level: SkillLevel, title: &str) -> Vec<ResolvedSubTopic<'_>> {
        self.ui_sub_topics_with(level, title, ResolveOptions::default())
    }

    /// [`Catalog::ui_sub_topics`] with explicit options.
    #[must_use]
    pub fn ui_sub_topics_with(
        &self,
        level: SkillLevel,
        title: &str,
        options: ResolveOptions,
    ) -> Vec<ResolvedSubTopic<'_>> {
        let Some(located) = self.locate_topic(level, title) else {
            return Vec::new();
        };
        let parent = located.topic().normalized_title();
        self.resolve_located(level, title, located, options)
            .into_iter()
            .filter(|sub_topic| normalize(sub_topic.title()) != parent)
            .collect()
    }

    pub(super) fn resolve_located<'a>(
        &'a self,
        level: SkillLevel,
        title: &str,
        located: TopicMatch<'a>,
        options: ResolveOptions,
    ) -> Vec<ResolvedSubTopic<'a>> {
        let topic = match located {
            TopicMatch::Virtual { family, .. } => {
                let items =
                    self.defense_entries(level, Some(title), &KeywordFilter::default(), options);
                return vec![ResolvedSubTopic {
                    title: Cow::Owned(title.trim().to_string()),
                    origin: SubTopicOrigin::Virtual(family),
                    items,
                }];
            }
            TopicMatch::Exact(topic) | TopicMatch::Relaxed(topic) => topic,
        };

        if !topic.sub_topics().is_empty() {
            return topic
                .sub_topics()
                .iter()
                .map(|sub_topic| ResolvedSubTopic {
                    title: Cow::Borrowed(sub_topic.title()),
                    origin: SubTopicOrigin::Authored,
                    items: sub_topic
                        .items()
                        .iter()
                        .map(|item| ItemRef::new(level, topic, Some(sub_topic), item))
                        .collect(),
                })
                .collect();
        }

        if topic.items().is_empty() {
            return Vec::new();
        }

        vec![ResolvedSubTopic {
            title: Cow::Borrowed(topic.title()),
            origin: SubTopicOrigin::Implicit,
            items: self.topic_items(level, topic).collect(),
        }]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use test_case::test_case;

    use super::*;
    use crate::catalog::SubTopic;

    fn catalog() -> Catalog {
        let yellow = vec![
            Topic::new("בלימות")
                .unwrap()
                .with_items(["בלימה לאחור", "בלימה לצד"]),
            Topic::new("הגנות").unwrap().with_items([
                "def:internal:punch::הגנה נגד אגרוף שמאל",
                "def:external:punch::הגנה 360",
                "def:external:kick::External defense #1",
            ]),
            Topic::new("עמידות").unwrap(),
        ];
        let green = vec![
            Topic::new("שחרורים")
                .unwrap()
                .with_sub_topic(SubTopic::new("מחניקות", ["שחרור מחניקה מלפנים"]).unwrap())
                .with_sub_topic(SubTopic::new("שחרורים", ["שחרור מתפיסת שיער"]).unwrap()),
            Topic::new("בעיטות").unwrap().with_items(["בעיטה רגילה"]),
            Topic::new("בעיטות בקפיצה").unwrap().with_items(["בעיטה בקפיצה"]),
        ];
        Catalog::new(BTreeMap::from([
            (SkillLevel::Yellow, yellow),
            (SkillLevel::Green, green),
        ]))
    }

    #[test]
    fn flat_topic_yields_one_implicit_wrapper() {
        let catalog = catalog();
        let sub_topics = catalog.sub_topics_of(SkillLevel::Yellow, "בלימות");

        assert_eq!(sub_topics.len(), 1);
        assert_eq!(sub_topics[0].title(), "בלימות");
        assert_eq!(sub_topics[0].origin(), SubTopicOrigin::Implicit);
        assert_eq!(sub_topics[0].items().len(), 2);
        assert_eq!(sub_topics[0].items()[0].sub_topic, None);
    }

    #[test]
    fn authored_sub_topics_are_returned_verbatim() {
        let catalog = catalog();
        let titles: Vec<_> = catalog
            .sub_topics_of(SkillLevel::Green, "שחרורים")
            .iter()
            .map(|sub_topic| sub_topic.title().to_string())
            .collect();
        assert_eq!(titles, vec!["מחניקות", "שחרורים"]);
    }

    #[test]
    fn ui_list_drops_parent_echo() {
        let catalog = catalog();

        let titles: Vec<_> = catalog
            .ui_sub_topics(SkillLevel::Green, "שחרורים")
            .iter()
            .map(|sub_topic| sub_topic.title().to_string())
            .collect();
        assert_eq!(titles, vec!["מחניקות"]);

        assert!(catalog.ui_sub_topics(SkillLevel::Yellow, "בלימות").is_empty());
    }

    #[test]
    fn empty_or_unknown_topic_yields_nothing() {
        let catalog = catalog();
        assert!(catalog.sub_topics_of(SkillLevel::Yellow, "עמידות").is_empty());
        assert!(catalog.sub_topics_of(SkillLevel::Yellow, "קרקע").is_empty());
        assert!(catalog.sub_topics_of(SkillLevel::Black, "בלימות").is_empty());
    }

    #[test_case("בלימו", Some("בלימות"); "request is a prefix")]
    #[test_case("בלימות מתקדמות", Some("בלימות"); "topic is a prefix")]
    #[test_case("בעיט", None; "ambiguous prefix")]
    fn relaxed_match_needs_a_single_candidate(title: &str, expected: Option<&str>) {
        let catalog = catalog();
        let level = if title.starts_with("בלימ") {
            SkillLevel::Yellow
        } else {
            SkillLevel::Green
        };
        let located = catalog.locate_topic(level, title);
        assert_eq!(located.map(|m| m.topic().title()), expected);
        if let Some(located) = located {
            assert!(matches!(located, TopicMatch::Relaxed(_)));
        }
    }

    #[test]
    fn exact_match_beats_relaxed() {
        let catalog = catalog();
        assert!(matches!(
            catalog.locate_topic(SkillLevel::Green, "בעיטות"),
            Some(TopicMatch::Exact(topic)) if topic.title() == "בעיטות"
        ));
    }

    #[test]
    fn virtual_views_are_disjoint_subsets_of_the_defenses() {
        let catalog = catalog();
        let all: Vec<_> = catalog
            .sub_topics_of(SkillLevel::Yellow, "הגנות")
            .into_iter()
            .flat_map(ResolvedSubTopic::into_items)
            .collect();

        let internal = catalog.sub_topics_of(SkillLevel::Yellow, "הגנות פנימיות");
        let external = catalog.sub_topics_of(SkillLevel::Yellow, "External Defenses");
        assert_eq!(internal.len(), 1);
        assert_eq!(external.len(), 1);
        assert_eq!(internal[0].title(), "הגנות פנימיות");
        assert_eq!(
            internal[0].origin(),
            SubTopicOrigin::Virtual(DefenseFamily::Internal)
        );

        let internal = internal[0].items();
        let external = external[0].items();
        assert!(!internal.is_empty() && internal.len() < all.len());
        assert!(internal.iter().all(|item| all.contains(item)));
        assert!(external.iter().all(|item| all.contains(item)));
        assert!(internal.iter().all(|item| !external.contains(item)));
    }

    #[test]
    fn virtual_view_keeps_real_canonical_ids() {
        let catalog = catalog();
        let view = catalog.sub_topics_of(SkillLevel::Yellow, "הגנות חיצוניות");
        let item = view[0]
            .items()
            .iter()
            .find(|item| item.item.display_name() == "External defense #1")
            .unwrap();
        assert_eq!(
            item.canonical_id().as_str(),
            "yellow|הגנות||external defense #1"
        );
    }

    #[test]
    fn virtual_label_without_defenses_topic_is_not_found() {
        let catalog = catalog();
        assert!(catalog.sub_topics_of(SkillLevel::Green, "הגנות פנימיות").is_empty());
    }
}
