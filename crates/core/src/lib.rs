//! Compass core types: the destination knowledge base, traveller preference
//! profiles, rule identifiers and the rule catalog.
//!
//! Everything here is input to an inference run and is immutable once
//! loaded. Loading is the only place errors can occur.

pub mod catalog;
pub mod error;
pub mod knowledge;
pub mod preferences;
pub mod rule_id;

pub use catalog::{LabelTexts, RuleCatalog, RuleInfo};
pub use error::{CatalogError, KnowledgeBaseError, ProfileError};
pub use knowledge::{predicates, Destination, KnowledgeBase};
pub use preferences::{
    Budget, Climate, Companions, CrowdTolerance, Experience, FoodPreference, SafetyPriority,
    Season, TrafficPreference, Transport, TripDuration, UserPreferences,
};
pub use rule_id::{RuleId, Tier};
