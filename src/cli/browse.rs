use clap::Parser;
use curriculum::{
    SkillLevel,
    catalog::{ResolvedSubTopic, SubTopic, UiItem},
};
use serde_json::json;
use tracing::instrument;

use super::{
    OutputFormat, Session,
    terminal::{Colorize, rule},
};

#[derive(Debug, Parser, Default)]
#[command(about = "List skill levels with their topic and item counts")]
pub struct Levels {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Levels {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.catalog();
        let rows: Vec<_> = catalog
            .levels()
            .map(|level| {
                let topics = catalog.topics(level).len();
                let items = catalog.level_items(level).count();
                (level, topics, items)
            })
            .collect();

        match self.output {
            OutputFormat::Json => {
                let levels: Vec<_> = rows
                    .iter()
                    .map(|(level, topics, items)| {
                        json!({
                            "id": level.id(),
                            "label": level.label(),
                            "topics": topics,
                            "items": items,
                            "next": level.next().map(SkillLevel::id),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&levels)?);
            }
            OutputFormat::Pretty => {
                for (level, topics, items) in rows {
                    println!(
                        "{:<8} {}  {}",
                        level.id().accent(),
                        level.label(),
                        format!("{topics} topics, {items} items").dim()
                    );
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "List the topics of a level")]
pub struct Topics {
    /// The skill level
    level: SkillLevel,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Topics {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.catalog();
        let topics = catalog.topics(self.level);

        match self.output {
            OutputFormat::Json => {
                let topics: Vec<_> = topics
                    .iter()
                    .map(|topic| {
                        json!({
                            "title": topic.title(),
                            "sub_topics": topic
                                .sub_topics()
                                .iter()
                                .map(SubTopic::title)
                                .collect::<Vec<_>>(),
                            "items": catalog.topic_items(self.level, topic).count(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&topics)?);
            }
            OutputFormat::Pretty => {
                if topics.is_empty() {
                    println!("No topics at level {}", self.level.label());
                    return Ok(());
                }
                println!("{}", self.level.label().heading());
                for topic in topics {
                    let count = catalog.topic_items(self.level, topic).count();
                    println!("  • {}  {}", topic.title(), format!("({count})").dim());
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "List the sub-topics and items of a topic")]
pub struct SubTopics {
    /// The skill level
    level: SkillLevel,

    /// The topic title, or a defense-family label
    topic: String,

    /// Keep sub-topics that only repeat the topic title
    #[arg(long)]
    all: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl SubTopics {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.catalog();
        let options = session.options();
        let sub_topics = if self.all {
            catalog.sub_topics_of_with(self.level, &self.topic, options)
        } else {
            catalog.ui_sub_topics_with(self.level, &self.topic, options)
        };

        // Without sub-topics worth listing, show the topic's items directly.
        let sections: Vec<(Option<&str>, Vec<UiItem>)> = if sub_topics.is_empty() && !self.all {
            let items: Vec<UiItem> = catalog
                .sub_topics_of_with(self.level, &self.topic, options)
                .into_iter()
                .flat_map(ResolvedSubTopic::into_items)
                .map(UiItem::from)
                .collect();
            vec![(None, items)]
        } else {
            sub_topics
                .iter()
                .map(|sub_topic| {
                    let items = sub_topic.items().iter().copied().map(UiItem::from).collect();
                    (Some(sub_topic.title()), items)
                })
                .collect()
        };

        if sections.iter().all(|(_, items)| items.is_empty()) {
            anyhow::bail!(
                "Topic '{}' not found at level {}",
                self.topic,
                self.level.label()
            );
        }

        match self.output {
            OutputFormat::Json => {
                let sections: Vec<_> = sections
                    .iter()
                    .map(|(title, items)| json!({ "title": title, "items": items }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&sections)?);
            }
            OutputFormat::Pretty => {
                println!("{}", self.topic.trim().heading());
                println!("{}", rule(40).dim());
                for (title, items) in &sections {
                    let indent = if let Some(title) = title {
                        println!("{title}");
                        "    "
                    } else {
                        "  "
                    };
                    for item in items {
                        println!("{indent}• {}", item.display_name);
                    }
                }
            }
        }
        Ok(())
    }
}
