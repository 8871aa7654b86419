use clap::Parser;
use curriculum::{CanonicalId, KeySeparator, NavigationKey, ParsedItem, SkillLevel};
use serde_json::json;
use tracing::instrument;

use super::{OutputFormat, Session, terminal::Colorize};

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Separator {
    #[default]
    Pipe,
    DoubleColon,
    Slash,
}

impl From<Separator> for KeySeparator {
    fn from(separator: Separator) -> Self {
        match separator {
            Separator::Pipe => Self::Pipe,
            Separator::DoubleColon => Self::DoubleColon,
            Separator::Slash => Self::Slash,
        }
    }
}

#[derive(Debug, Parser)]
#[command(about = "Print the canonical id and navigation key of an item")]
pub struct Id {
    /// The skill level
    level: SkillLevel,

    /// The topic title
    topic: String,

    /// The raw item text, optionally carrying a tag ("def:external:kick::...")
    item: String,

    /// The sub-topic title, if the item sits in one
    #[arg(long)]
    sub_topic: Option<String>,

    /// Separator used for the navigation key
    #[arg(long, default_value = "pipe")]
    separator: Separator,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Id {
    #[instrument(level = "debug")]
    pub fn run(self) {
        let item = ParsedItem::parse(&self.item);
        let id = CanonicalId::new(self.level, &self.topic, self.sub_topic.as_deref(), &item);
        let key = NavigationKey::for_item(self.level, &self.topic, item.display_name())
            .encode_with(self.separator.into());

        match self.output {
            OutputFormat::Json => {
                let output = json!({
                    "canonical_id": id,
                    "navigation_key": key,
                    "display_name": item.display_name(),
                    "tag": item.tag(),
                    "tag_inferred": item.is_tag_inferred(),
                });
                println!("{output:#}");
            }
            OutputFormat::Pretty => {
                println!("{}", id.as_str());
                println!("{}", key.accent());
                if let Some(tag) = item.tag() {
                    let source = if item.is_tag_inferred() {
                        "inferred"
                    } else {
                        "explicit"
                    };
                    println!("{}", format!("{tag} ({source})").dim());
                }
            }
        }
    }
}

#[derive(Debug, Parser)]
#[command(about = "Resolve a navigation key and show the exercise's explanation")]
pub struct Open {
    /// The navigation key ("level|topic|item", "::" and "/" also accepted)
    key: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Open {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.catalog();
        let explanation = catalog.explain(&self.key, session.config());

        let location = self
            .key
            .parse::<NavigationKey>()
            .ok()
            .and_then(|key| catalog.resolve_navigation_key(&key).map(|entry| entry.to_string()));

        match self.output {
            OutputFormat::Json => {
                let output = json!({
                    "location": location,
                    "explanation": explanation,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Pretty => {
                match location {
                    Some(location) => println!("{}", location.heading()),
                    None => println!("{}", "Key does not resolve to a catalog item".warning()),
                }
                println!("{explanation}");
            }
        }
        Ok(())
    }
}
