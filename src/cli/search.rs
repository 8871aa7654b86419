use clap::Parser;
use curriculum::{SearchIndex, catalog::HitKind};
use tracing::instrument;

use super::{OutputFormat, Session, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Search topics, sub-topics and items across every level")]
pub struct Search {
    /// The text to look for
    query: String,

    /// Show at most this many hits
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Search {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let index = SearchIndex::build(session.catalog());
        let mut hits = index.search(&self.query);
        let total = hits.len();
        if let Some(limit) = self.limit {
            hits.truncate(limit);
        }

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&hits)?),
            OutputFormat::Pretty => {
                if hits.is_empty() {
                    println!("No matches for '{}'", self.query.trim());
                    return Ok(());
                }
                for hit in &hits {
                    let marker = match hit.kind {
                        HitKind::Topic => "topic",
                        HitKind::SubTopic => "sub-topic",
                        HitKind::Item => "item",
                    };
                    println!("{} {}", hit.title, format!("[{marker}]").dim());
                    println!("  {}", hit.subtitle.dim());
                    if let Some(key) = &hit.navigation_key {
                        println!("  {}", key.to_string().accent());
                    }
                }
                if total > hits.len() {
                    println!("{}", format!("… {} more", total - hits.len()).dim());
                }
            }
        }
        Ok(())
    }
}
