use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::domain::{CanonicalId, Subject};

/// Engine configuration.
///
/// Holds the resolution policy, the subject definitions, and explanation
/// texts keyed by canonical id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether a defense-family view falls back to every defense when the
    /// level's defenses carry no family information at all.
    ///
    /// Each fallback is logged as a data-quality warning.
    pub family_fallback: bool,

    /// Subject definitions, in display order.
    ///
    /// When empty, the built-in subjects are used.
    subjects: Vec<Subject>,

    /// Explanation texts keyed by canonical id.
    explanations: BTreeMap<CanonicalId, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            family_fallback: default_family_fallback(),
            subjects: Vec::new(),
            explanations: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Configured subjects.
    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Finds a configured subject by id.
    #[must_use]
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == id)
    }

    /// Adds a subject, replacing any existing subject with the same id.
    ///
    /// Returns `true` if a subject was replaced.
    pub fn upsert_subject(&mut self, subject: Subject) -> bool {
        if let Some(existing) = self.subjects.iter_mut().find(|s| s.id == subject.id) {
            *existing = subject;
            true
        } else {
            self.subjects.push(subject);
            false
        }
    }

    /// Configured explanation texts.
    #[must_use]
    pub const fn explanations(&self) -> &BTreeMap<CanonicalId, String> {
        &self.explanations
    }

    /// Sets the explanation for an exercise.
    pub fn set_explanation(&mut self, id: CanonicalId, text: String) {
        self.explanations.insert(id, text);
    }
}

const fn default_family_fallback() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_family_fallback")]
        family_fallback: bool,

        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        subjects: Vec<Subject>,

        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        explanations: BTreeMap<CanonicalId, String>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                family_fallback,
                subjects,
                explanations,
            } => Self {
                family_fallback,
                subjects,
                explanations,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            family_fallback: config.family_fallback,
            subjects: config.subjects,
            explanations: config.explanations,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::SkillLevel;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            r#"_version = "1"
family_fallback = false

[[subjects]]
id = "internal-defenses"
title = "הגנות פנימיות"
sub_topic_hint = "הגנות פנימיות"

[subjects.topics_by_level]
yellow = ["הגנות"]
orange = ["הגנות"]

[explanations]
"yellow|הגנות||הגנה פנימית נגד אגרוף" = "מסיטים את האגרוף פנימה"
"#
            .as_bytes(),
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert!(!config.family_fallback);
        let subject = config.subject("internal-defenses").unwrap();
        assert_eq!(subject.topics_for(SkillLevel::Orange), ["הגנות".to_string()]);
        let id = CanonicalId::from_raw(SkillLevel::Yellow, "הגנות", "", "הגנה פנימית נגד אגרוף");
        assert_eq!(
            config.explanations().get(&id).map(String::as_str),
            Some("מסיטים את האגרוף פנימה")
        );
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nfamily_fallback = \"sometimes\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
        assert!(actual.family_fallback);
    }

    #[test]
    fn save_then_load_preserves_subjects() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.toml");

        let mut config = Config::default();
        let replaced = config.upsert_subject(
            Subject::new("kicks", "בעיטות").with_topics(SkillLevel::Green, ["בעיטות"]),
        );
        assert!(!replaced);
        assert!(config.upsert_subject(Subject::new("kicks", "בעיטות מתקדמות")));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.subjects().len(), 1);
        assert_eq!(loaded.subjects()[0].title, "בעיטות מתקדמות");
    }
}
