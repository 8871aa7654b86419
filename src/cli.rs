use std::path::{Path, PathBuf};

mod browse;
mod check;
mod key;
mod search;
mod subject;
mod terminal;

use browse::{Levels, SubTopics, Topics};
use check::Check;
use clap::ArgAction;
use curriculum::{Catalog, Config, ResolveOptions, Subject, catalog::builtin_subjects};
use key::{Id, Open};
use search::Search;
use subject::{ShowSubject, Subjects};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// A YAML catalog file to use instead of the built-in curriculum
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// The configuration file (subjects, explanations, resolution policy)
    #[arg(long, default_value = "catalog.toml", global = true, value_name = "FILE")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let session = Session::load(self.catalog.as_deref(), &self.config)?;

        self.command
            .unwrap_or_else(|| Command::Levels(Levels::default()))
            .run(&session)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List skill levels (default)
    Levels(Levels),

    /// List the topics of a level
    Topics(Topics),

    /// List the sub-topics and items of a topic
    ///
    /// Defense-family labels such as "הגנות פנימיות" are accepted as
    /// virtual topics.
    #[command(name = "subtopics")]
    SubTopics(SubTopics),

    /// Search topics, sub-topics and items
    Search(Search),

    /// List the available subjects
    Subjects(Subjects),

    /// Resolve a subject into sections
    Subject(ShowSubject),

    /// Print the canonical id of an item
    Id(Id),

    /// Resolve a navigation key and show its explanation
    Open(Open),

    /// Check the catalog for canonical ids shared by several items
    Check(Check),
}

impl Command {
    fn run(self, session: &Session) -> anyhow::Result<()> {
        match self {
            Self::Levels(command) => command.run(session)?,
            Self::Topics(command) => command.run(session)?,
            Self::SubTopics(command) => command.run(session)?,
            Self::Search(command) => command.run(session)?,
            Self::Subjects(command) => command.run(session)?,
            Self::Subject(command) => command.run(session)?,
            Self::Id(command) => command.run(),
            Self::Open(command) => command.run(session)?,
            Self::Check(command) => command.run(session)?,
        }
        Ok(())
    }
}

/// Output format shared by the listing commands.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// The catalog and configuration every command works against.
#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    config: Config,
}

impl Session {
    fn load(catalog: Option<&Path>, config: &Path) -> anyhow::Result<Self> {
        let catalog = match catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin(),
        };

        let config = if config.exists() {
            Config::load(config).map_err(|e| anyhow::anyhow!("{e}"))?
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                config.display()
            );
            Config::default()
        };

        Ok(Self { catalog, config })
    }

    const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    const fn config(&self) -> &Config {
        &self.config
    }

    fn options(&self) -> ResolveOptions {
        ResolveOptions::from(&self.config)
    }

    /// Configured subjects, or the built-in ones when none are configured.
    fn subjects(&self) -> Vec<Subject> {
        if self.config.subjects().is_empty() {
            builtin_subjects()
        } else {
            self.config.subjects().to_vec()
        }
    }
}
