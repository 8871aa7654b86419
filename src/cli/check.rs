use std::process;

use clap::Parser;
use serde_json::json;
use tracing::instrument;

use super::{OutputFormat, Session, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check the catalog for canonical ids shared by several items")]
pub struct Check {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

impl Check {
    #[instrument(level = "debug", skip(session))]
    pub fn run(self, session: &Session) -> anyhow::Result<()> {
        let catalog = session.catalog();
        let duplicates = catalog.duplicate_canonical_ids();
        let items = catalog.items().count();

        match self.output {
            OutputFormat::Json => {
                let duplicates: Vec<_> = duplicates
                    .iter()
                    .map(|duplicate| {
                        json!({
                            "canonical_id": duplicate.id,
                            "locations": duplicate
                                .locations
                                .iter()
                                .map(ToString::to_string)
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                let output = json!({ "items": items, "duplicates": duplicates });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Pretty => {
                if duplicates.is_empty() {
                    println!(
                        "{}",
                        format!("✓ {items} items, every canonical id is unique").success()
                    );
                } else {
                    for duplicate in &duplicates {
                        println!("{}", duplicate.id.as_str().warning());
                        for location in &duplicate.locations {
                            println!("  • {location}");
                        }
                    }
                    println!(
                        "{}",
                        format!("{} shared canonical ids in {items} items", duplicates.len())
                            .warning()
                    );
                }
            }
        }

        // Exit with a non-zero code when the catalog needs attention.
        if !duplicates.is_empty() {
            process::exit(2);
        }

        Ok(())
    }
}
