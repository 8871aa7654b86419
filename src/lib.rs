//! Content catalog resolution for a graded training curriculum.
//!
//! The catalog is a fixed hierarchy of skill levels, topics, optional
//! sub-topics and items. This crate resolves it into the views consumers
//! need: sub-topic lists (including virtual defense-family views), subject
//! sections, search hits, and stable identifiers for every exercise.

pub mod domain;
pub use domain::{
    CanonicalId, ClassificationTag, Config, KeySeparator, KeywordFilter, NavigationKey,
    ParsedItem, SkillLevel, Subject, normalize,
};

pub mod catalog;
pub use catalog::{Catalog, CatalogError, ItemRef, ResolveOptions, SearchIndex};
