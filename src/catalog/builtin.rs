//! The authored curriculum shipped with the crate.

use std::collections::BTreeMap;

use crate::{
    catalog::{Catalog, CatalogError, SubTopic, Topic},
    domain::{KeywordFilter, SkillLevel, Subject},
};

struct TopicData {
    title: &'static str,
    items: &'static [&'static str],
    sub_topics: &'static [(&'static str, &'static [&'static str])],
}

const fn flat(title: &'static str, items: &'static [&'static str]) -> TopicData {
    TopicData {
        title,
        items,
        sub_topics: &[],
    }
}

const fn nested(
    title: &'static str,
    sub_topics: &'static [(&'static str, &'static [&'static str])],
) -> TopicData {
    TopicData {
        title,
        items: &[],
        sub_topics,
    }
}

const YELLOW: &[TopicData] = &[
    flat(
        "עמידות ותנועה",
        &["עמידת מוצא", "עמידת קרב", "תנועה קדימה ואחורה", "תנועה לצדדים"],
    ),
    flat(
        "מכות יד",
        &[
            "מכת אגרוף ישר שמאל",
            "מכת אגרוף ישר ימין",
            "מכת מרפק לפנים",
            "מכת כף יד פתוחה",
        ],
    ),
    flat("בעיטות", &["בעיטה רגילה לפנים", "בעיטת ברך", "בעיטה לאחור"]),
    flat(
        "הגנות",
        &[
            "def:internal:punch::הגנה פנימית נגד אגרוף שמאל",
            "הגנה פנימית נגד אגרוף ימין::def:internal:punch",
            "def_internal_punches::הגנה פנימית נגד אגרוף ימין למטה",
            "def:internal:kick::הגנה פנימית נגד בעיטה רגילה",
            "def:external:punch::הגנה 360",
            "def:external:kick::הגנה נגד בעיטה רגילה",
            "הגנה נגד בעיטה לאיבר המין::def_external_kicks",
        ],
    ),
    nested(
        "שחרורים",
        &[
            (
                "שחרור מתפיסות",
                &["שחרור מתפיסת יד", "שחרור מתפיסת שתי ידיים"],
            ),
            (
                "שחרור מחניקות",
                &[
                    "שחרור מחניקה מלפנים",
                    "שחרור מחניקה מאחור",
                    "שחרור מחניקה מהצד",
                ],
            ),
        ],
    ),
    flat("בלימות וגלגולים", &["בלימה לאחור", "בלימה לצד", "גלגול לפנים"]),
];

// Defenses at this level carry no explicit tags; families are inferred from
// the display names.
const ORANGE: &[TopicData] = &[
    flat(
        "הגנות",
        &[
            "הגנה פנימית נגד אגרוף ימין לפנים",
            "הגנה חיצונית נגד מכת מגל",
            "הגנה חיצונית נגד בעיטה לצד",
            "הגנה נגד דחיפה",
        ],
    ),
    flat("מכות יד", &["מכת מגל", "מכת סנוקרת"]),
    flat("בעיטות", &["בעיטה לצד", "בעיטה מסובבת"]),
    flat(
        "שחרורים",
        &[
            "שחרור מחביקה מלפנים",
            "שחרור מחביקה מאחור",
            "שחרור מתפיסת שיער",
        ],
    ),
];

const GREEN: &[TopicData] = &[
    nested(
        "הגנות",
        &[
            (
                "נגד אגרופים",
                &[
                    "def:internal:punch::הגנה נגד אגרוף בהטיית גוף",
                    "def:external:punch::הגנה נגד מכת מגל גבוהה",
                ],
            ),
            (
                "נגד בעיטות",
                &[
                    "def:external:kick::הגנה נגד בעיטה מסובבת",
                    "def:internal:kick::הגנה נגד בעיטה רגילה בשיכול",
                ],
            ),
        ],
    ),
    flat(
        "הגנות נגד סכין",
        &[
            "הגנה נגד דקירה מלמעלה",
            "הגנה נגד דקירה מלמטה",
            "הגנה נגד דקירה ישרה",
        ],
    ),
    flat("בעיטות", &["בעיטה בקפיצה", "בעיטת מספריים"]),
    nested(
        "שחרורים",
        &[(
            "שחרור מנעילות",
            &["שחרור מנעילת צוואר מהצד", "שחרור מנעילת זרוע"],
        )],
    ),
];

// No family information at all: family views fall back to every defense.
const BLUE: &[TopicData] = &[
    flat(
        "הגנות",
        &[
            "הגנה נגד אגרוף מגל גבוה",
            "הגנה נגד בעיטה מסובבת לראש",
            "הגנה נגד אגרוף ישר תוך התקדמות",
        ],
    ),
    flat(
        "הגנות נגד מקל",
        &["הגנה נגד מכת מקל מלמעלה", "הגנה נגד מכת מקל מהצד"],
    ),
    flat("עבודת קרקע", &["יציאה מרכיבה", "מעבר לעמדת שליטה"]),
];

const BROWN: &[TopicData] = &[
    flat(
        "הגנות נגד סכין",
        &["הגנה נגד איום סכין מלפנים", "הגנה נגד איום סכין מאחור"],
    ),
    flat(
        "הגנות נגד אקדח",
        &[
            "הגנה נגד איום אקדח מלפנים",
            "הגנה נגד איום אקדח מאחור",
            "הגנה נגד איום אקדח מהצד",
        ],
    ),
    flat("שחרורים", &["שחרור מחביקת דוב"]),
];

const BLACK: &[TopicData] = &[
    flat("הגנות נגד נשק ארוך", &["הגנה נגד איום רובה מלפנים"]),
    flat(
        "הגנה על אחר",
        &["הגנה על אחר מפני איום סכין", "הגנה על אחר מפני מכת מקל"],
    ),
    flat("קרב מול מספר תוקפים", &["עבודה מול שני תוקפים"]),
];

fn build_level(data: &[TopicData]) -> Result<Vec<Topic>, CatalogError> {
    data.iter()
        .map(|topic| {
            let mut built = Topic::new(topic.title)?.with_items(topic.items.iter().copied());
            for (title, items) in topic.sub_topics {
                built = built.with_sub_topic(SubTopic::new(*title, items.iter().copied())?);
            }
            Ok(built)
        })
        .collect()
}

impl Catalog {
    /// The built-in curriculum.
    ///
    /// Built on every call; construct it once at start-up and share it by
    /// reference.
    #[must_use]
    pub fn builtin() -> Self {
        let levels = [
            (SkillLevel::Yellow, YELLOW),
            (SkillLevel::Orange, ORANGE),
            (SkillLevel::Green, GREEN),
            (SkillLevel::Blue, BLUE),
            (SkillLevel::Brown, BROWN),
            (SkillLevel::Black, BLACK),
        ]
        .into_iter()
        .map(|(level, data)| build_level(data).map(|topics| (level, topics)))
        .collect::<Result<BTreeMap<_, _>, _>>()
        .expect("built-in titles are never blank");

        Self::new(levels)
    }
}

/// The subjects offered when the configuration defines none.
#[must_use]
pub fn builtin_subjects() -> Vec<Subject> {
    let defense_levels = [
        SkillLevel::Yellow,
        SkillLevel::Orange,
        SkillLevel::Green,
        SkillLevel::Blue,
    ];
    let with_defenses = |subject: Subject| {
        defense_levels
            .into_iter()
            .fold(subject, |subject, level| subject.with_topics(level, ["הגנות"]))
    };

    vec![
        with_defenses(Subject::new("internal-defenses", "הגנות פנימיות"))
            .with_hint("הגנות פנימיות"),
        with_defenses(Subject::new("external-defenses", "הגנות חיצוניות"))
            .with_hint("הגנות חיצוניות"),
        with_defenses(Subject::new("kick-defenses", "הגנות נגד בעיטות")).with_keywords(
            KeywordFilter::new(["בעיטה", "kick"], Vec::<String>::new(), Vec::<String>::new()),
        ),
        Subject::new("releases", "שחרורים")
            .with_topics(SkillLevel::Yellow, ["שחרורים"])
            .with_topics(SkillLevel::Orange, ["שחרורים"])
            .with_topics(SkillLevel::Green, ["שחרורים"])
            .with_topics(SkillLevel::Brown, ["שחרורים"]),
        Subject::new("knife-defenses", "הגנות נגד סכין")
            .with_topics(SkillLevel::Green, ["הגנות נגד סכין"])
            .with_topics(SkillLevel::Brown, ["הגנות נגד סכין"])
            .with_topics(SkillLevel::Black, ["הגנה על אחר"])
            .with_keywords(KeywordFilter::new(
                ["סכין", "דקירה"],
                Vec::<String>::new(),
                Vec::<String>::new(),
            )),
        Subject::new("kicks", "בעיטות")
            .with_topics(SkillLevel::Yellow, ["בעיטות"])
            .with_topics(SkillLevel::Orange, ["בעיטות"])
            .with_topics(SkillLevel::Green, ["בעיטות"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{ResolveOptions, SubTopicOrigin},
        domain::{DefenseFamily, normalize::normalize},
    };

    #[test]
    fn builtin_catalog_has_unique_canonical_ids() {
        let catalog = Catalog::builtin();
        assert!(catalog.duplicate_canonical_ids().is_empty());
        assert_eq!(catalog.levels().count(), SkillLevel::ALL.len());
    }

    #[test]
    fn builtin_subject_ids_are_unique() {
        let subjects = builtin_subjects();
        let mut ids: Vec<_> = subjects.iter().map(|subject| subject.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), subjects.len());
    }

    #[test]
    fn every_builtin_subject_resolves_somewhere() {
        let catalog = Catalog::builtin();
        for subject in builtin_subjects() {
            let resolved = catalog.resolve_subject_all(&subject, ResolveOptions::default());
            assert!(!resolved.is_empty(), "subject {} is empty", subject.id);
        }
    }

    #[test]
    fn untagged_orange_defenses_are_inferred() {
        let catalog = Catalog::builtin();
        let internal = catalog.defense_items(
            SkillLevel::Orange,
            Some("הגנות פנימיות"),
            &KeywordFilter::default(),
        );
        assert_eq!(internal, vec!["הגנה פנימית נגד אגרוף ימין לפנים"]);
    }

    #[test]
    fn blue_family_view_falls_back_to_every_defense() {
        let catalog = Catalog::builtin();
        let view = catalog.sub_topics_of(SkillLevel::Blue, "הגנות חיצוניות");
        assert_eq!(view.len(), 1);
        assert_eq!(
            view[0].origin(),
            SubTopicOrigin::Virtual(DefenseFamily::External)
        );
        assert_eq!(view[0].items().len(), 3);
    }

    #[test]
    fn knife_subject_keeps_only_knife_items_for_others() {
        let catalog = Catalog::builtin();
        let subject = builtin_subjects()
            .into_iter()
            .find(|subject| subject.id == "knife-defenses")
            .unwrap();

        let sections = catalog.resolve_subject(SkillLevel::Black, &subject);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items.len(), 1);
        assert!(normalize(&sections[0].items[0].display_name).contains("סכין"));
    }
}
