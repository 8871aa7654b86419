//! Domain types for the curriculum catalog.
//!
//! This module contains the value types the resolvers work with: skill
//! levels, text normalization, classification tags, canonical ids,
//! navigation keys, subjects, and configuration.

mod level;
pub use level::{SkillLevel, UnknownLevelError};

/// Hebrew-aware text normalization.
pub mod normalize;
pub use normalize::normalize;

/// Classification tags and raw item parsing.
pub mod tag;
pub use tag::{ClassificationTag, DefenseAction, DefenseFamily, ParsedItem};

mod canonical_id;
pub use canonical_id::{CANONICAL_ID_SEPARATOR, CanonicalId};

/// Deep-link keys.
pub mod navigation;
pub use navigation::{KeySeparator, NavigationKey, NavigationKeyError};

mod subject;
pub use subject::{CompiledKeywords, KeywordFilter, Subject};

mod config;
pub use config::Config;
