//! The catalog store and the resolvers that read it.
//!
//! Every resolver is a read-only method on [`Catalog`] and hands out items as
//! [`ItemRef`]s, so canonical ids are always computed from an item's real
//! location however it was reached.

mod store;
pub use store::{Catalog, CatalogError, DuplicateId, ItemRef, SubTopic, Topic};

mod defenses;
pub use defenses::{ResolveOptions, is_defense_topic, virtual_defense_family};

mod sub_topics;
pub use sub_topics::{ResolvedSubTopic, SubTopicOrigin, TopicMatch};

mod subject;
pub use subject::{Section, UiItem};

mod search;
pub use search::{Hit, HitKind, SearchIndex};

mod explain;
pub use explain::{Explanation, ExplanationSource, NO_EXPLANATION};

mod builtin;
pub use builtin::builtin_subjects;
