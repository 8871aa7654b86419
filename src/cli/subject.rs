use clap::Parser;
use curriculum::SkillLevel;
use serde_json::json;
use tracing::instrument;

use super::{OutputFormat, Session, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "List the subjects available for practice")]
pub struct Subjects {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Subjects {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let subjects = session.subjects();

        match self.output {
            OutputFormat::Json => {
                let subjects: Vec<_> = subjects
                    .iter()
                    .map(|subject| {
                        json!({
                            "id": subject.id,
                            "title": subject.title,
                            "levels": subject.levels().map(SkillLevel::id).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&subjects)?);
            }
            OutputFormat::Pretty => {
                for subject in &subjects {
                    let levels: Vec<_> = subject.levels().map(SkillLevel::id).collect();
                    println!(
                        "{:<20} {}  {}",
                        subject.id.accent(),
                        subject.title,
                        levels.join(", ").dim()
                    );
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Resolve a subject into sections of items")]
pub struct ShowSubject {
    /// The subject id
    id: String,

    /// Only resolve this level (default: every level the subject lists)
    #[arg(long)]
    level: Option<SkillLevel>,

    /// Show canonical ids and navigation keys
    #[arg(long)]
    keys: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl ShowSubject {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let subjects = session.subjects();
        let Some(subject) = subjects.iter().find(|subject| subject.id == self.id) else {
            anyhow::bail!("Subject '{}' not found", self.id);
        };

        let catalog = session.catalog();
        let options = session.options();
        let mut resolved = catalog.resolve_subject_all(subject, options);
        if let Some(level) = self.level {
            resolved.retain(|candidate, _| *candidate == level);
        }

        match self.output {
            OutputFormat::Json => {
                let output = json!({
                    "id": subject.id,
                    "title": subject.title,
                    "levels": resolved,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Pretty => {
                if resolved.is_empty() {
                    println!("Subject '{}' has no items", subject.title);
                    return Ok(());
                }
                println!("{}", subject.title.heading());
                for (level, sections) in &resolved {
                    println!();
                    println!("{}", level.label().heading());
                    for section in sections {
                        println!("  {}", section.title);
                        for item in &section.items {
                            println!("    • {}", item.display_name);
                            if self.keys {
                                println!("      {}", item.canonical_id.as_str().dim());
                                println!("      {}", item.navigation_key.to_string().accent());
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
