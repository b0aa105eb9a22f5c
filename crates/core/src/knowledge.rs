//! Destination knowledge base.
//!
//! A knowledge base declares a finite, ordered list of destinations and,
//! for each named predicate, the destinations satisfying it. It also maps
//! each destination to its best travel seasons and to travel tips.
//!
//! Knowledge bases are loaded from JSON and validated once; the result is
//! immutable for the lifetime of every inference run that uses it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::KnowledgeBaseError;
use crate::preferences::Season;

static REFERENCE_KB: &str = include_str!("../../../data/reference-kb.json");

/// Predicate names read by the standard rule table.
pub mod predicates {
    pub const EXPENSIVE: &str = "expensive";
    pub const GOOD_LOCAL_CUISINE: &str = "good_local_cuisine";
    pub const GOOD_FOR_CULTURE_HISTORY: &str = "good_for_culture_history";
    pub const GOOD_FOR_ADVENTURE: &str = "good_for_adventure";
    pub const GOOD_FOR_SHOPPING: &str = "good_for_shopping";
    pub const GOOD_FOR_NATURE_SCENERY: &str = "good_for_nature_scenery";
    pub const GOOD_FOR_CITY_LIFE: &str = "good_for_city_life";
    pub const HIGH_TRAFFIC_PEAK: &str = "high_traffic_peak";
    pub const EXCELLENT_PUBLIC_TRANSPORT: &str = "excellent_public_transport";
    pub const MID_SAFETY: &str = "mid_safety";
    pub const VERY_SAFE_DESTINATION: &str = "very_safe_destination";

    pub const RULE_PREDICATES: &[&str] = &[
        EXPENSIVE,
        GOOD_LOCAL_CUISINE,
        GOOD_FOR_CULTURE_HISTORY,
        GOOD_FOR_ADVENTURE,
        GOOD_FOR_SHOPPING,
        GOOD_FOR_NATURE_SCENERY,
        GOOD_FOR_CITY_LIFE,
        HIGH_TRAFFIC_PEAK,
        EXCELLENT_PUBLIC_TRANSPORT,
        MID_SAFETY,
        VERY_SAFE_DESTINATION,
    ];
}

/// Opaque destination identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Destination(String);

impl Destination {
    pub fn new(name: impl Into<String>) -> Self {
        Destination(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Destination {
    fn from(name: &str) -> Self {
        Destination::new(name)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk shape of a knowledge base, before validation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KnowledgeBaseDoc {
    destinations: Vec<Destination>,
    #[serde(default)]
    predicates: BTreeMap<String, Vec<Destination>>,
    #[serde(default)]
    best_season: BTreeMap<Destination, Vec<Season>>,
    #[serde(default)]
    tips: BTreeMap<Destination, Vec<String>>,
}

/// A validated, immutable destination knowledge base.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBase {
    destinations: Vec<Destination>,
    predicates: BTreeMap<String, BTreeSet<Destination>>,
    best_season: BTreeMap<Destination, Vec<Season>>,
    tips: BTreeMap<Destination, Vec<String>>,
    #[serde(skip)]
    etag: String,
}

impl KnowledgeBase {
    /// The built-in five-destination knowledge base.
    pub fn reference() -> Result<Self, KnowledgeBaseError> {
        Self::from_json_str(REFERENCE_KB)
    }

    pub fn from_json_str(text: &str) -> Result<Self, KnowledgeBaseError> {
        let doc: KnowledgeBaseDoc = serde_json::from_str(text)?;
        Self::from_doc(doc)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, KnowledgeBaseError> {
        let doc: KnowledgeBaseDoc = serde_json::from_value(value)?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: KnowledgeBaseDoc) -> Result<Self, KnowledgeBaseError> {
        let mut declared = BTreeSet::new();
        for destination in &doc.destinations {
            if destination.as_str().is_empty() {
                return Err(KnowledgeBaseError::EmptyDestination);
            }
            if !declared.insert(destination.clone()) {
                return Err(KnowledgeBaseError::DuplicateDestination {
                    destination: destination.to_string(),
                });
            }
        }

        let check = |section: String, destination: &Destination| {
            if declared.contains(destination) {
                Ok(())
            } else {
                Err(KnowledgeBaseError::UndeclaredDestination {
                    section,
                    destination: destination.to_string(),
                })
            }
        };

        let mut predicate_sets = BTreeMap::new();
        for (name, members) in doc.predicates {
            for member in &members {
                check(format!("predicate '{}'", name), member)?;
            }
            predicate_sets.insert(name, members.into_iter().collect::<BTreeSet<_>>());
        }

        let mut best_season = BTreeMap::new();
        for (destination, seasons) in doc.best_season {
            check("best_season".to_string(), &destination)?;
            let mut ordered: Vec<Season> = Vec::with_capacity(seasons.len());
            for season in seasons {
                if !ordered.contains(&season) {
                    ordered.push(season);
                }
            }
            best_season.insert(destination, ordered);
        }

        for destination in doc.tips.keys() {
            check("tips".to_string(), destination)?;
        }

        for name in predicates::RULE_PREDICATES {
            if !predicate_sets.contains_key(*name) {
                tracing::warn!(predicate = *name, "knowledge base has no entry for rule predicate");
            }
        }

        let mut kb = KnowledgeBase {
            destinations: doc.destinations,
            predicates: predicate_sets,
            best_season,
            tips: doc.tips,
            etag: String::new(),
        };
        kb.etag = compute_etag(&kb)?;
        Ok(kb)
    }

    /// Declared destinations, in declaration order.
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Whether `destination` satisfies `predicate`. Unknown predicates hold
    /// for no destination.
    pub fn holds(&self, predicate: &str, destination: &Destination) -> bool {
        self.predicates
            .get(predicate)
            .is_some_and(|members| members.contains(destination))
    }

    /// Best seasons for `destination`, in declared order. Empty when the
    /// knowledge base lists none.
    pub fn best_seasons(&self, destination: &Destination) -> &[Season] {
        self.best_season
            .get(destination)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn tips(&self, destination: &Destination) -> &[String] {
        self.tips.get(destination).map(Vec::as_slice).unwrap_or(&[])
    }

    /// SHA-256 of the canonical JSON form, identifying the knowledge base a
    /// run was made against.
    pub fn etag(&self) -> &str {
        &self.etag
    }
}

fn compute_etag(kb: &KnowledgeBase) -> Result<String, KnowledgeBaseError> {
    let canonical = serde_json::to_string(kb)?;
    let hash = Sha256::digest(canonical.as_bytes());
    Ok(format!("{:x}", hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_knowledge_base_loads() {
        let kb = KnowledgeBase::reference().unwrap();
        let names: Vec<&str> = kb.destinations().iter().map(|d| d.as_str()).collect();
        assert_eq!(
            names,
            vec!["Switzerland", "Italy", "Japan", "United_Kingdom", "Turkey"]
        );
        assert!(kb.holds(predicates::EXPENSIVE, &Destination::from("Japan")));
        assert!(!kb.holds(predicates::EXPENSIVE, &Destination::from("Turkey")));
        assert_eq!(
            kb.best_seasons(&Destination::from("Italy")),
            &[Season::Spring, Season::Autumn]
        );
        assert_eq!(kb.tips(&Destination::from("Japan")).len(), 5);
    }

    #[test]
    fn unknown_predicate_holds_for_nobody() {
        let kb = KnowledgeBase::reference().unwrap();
        assert!(!kb.holds("has_volcanoes", &Destination::from("Italy")));
    }

    #[test]
    fn undeclared_predicate_member_rejected() {
        let err = KnowledgeBase::from_json_value(json!({
            "destinations": ["Italy"],
            "predicates": { "expensive": ["Italy", "Atlantis"] }
        }))
        .unwrap_err();
        match err {
            KnowledgeBaseError::UndeclaredDestination {
                section,
                destination,
            } => {
                assert_eq!(section, "predicate 'expensive'");
                assert_eq!(destination, "Atlantis");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn undeclared_best_season_rejected() {
        let err = KnowledgeBase::from_json_value(json!({
            "destinations": ["Italy"],
            "best_season": { "Peru": ["winter"] }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            KnowledgeBaseError::UndeclaredDestination { ref section, .. } if section == "best_season"
        ));
    }

    #[test]
    fn undeclared_tip_destination_rejected() {
        let err = KnowledgeBase::from_json_value(json!({
            "destinations": ["Italy"],
            "tips": { "Peru": ["Bring a hat."] }
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            KnowledgeBaseError::UndeclaredDestination { ref section, .. } if section == "tips"
        ));
    }

    #[test]
    fn duplicate_destination_rejected() {
        let err = KnowledgeBase::from_json_value(json!({
            "destinations": ["Italy", "Italy"]
        }))
        .unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::DuplicateDestination { .. }));
    }

    #[test]
    fn empty_destination_rejected() {
        let err = KnowledgeBase::from_json_value(json!({ "destinations": [""] })).unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::EmptyDestination));
    }

    #[test]
    fn unknown_season_rejected() {
        let err = KnowledgeBase::from_json_value(json!({
            "destinations": ["Italy"],
            "best_season": { "Italy": ["monsoon"] }
        }))
        .unwrap_err();
        assert!(matches!(err, KnowledgeBaseError::Json(_)));
    }

    #[test]
    fn duplicate_seasons_collapse_in_order() {
        let kb = KnowledgeBase::from_json_value(json!({
            "destinations": ["Italy"],
            "best_season": { "Italy": ["autumn", "spring", "autumn"] }
        }))
        .unwrap();
        assert_eq!(
            kb.best_seasons(&Destination::from("Italy")),
            &[Season::Autumn, Season::Spring]
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let kb = KnowledgeBase::from_json_value(json!({ "destinations": ["Oslo"] })).unwrap();
        let oslo = Destination::from("Oslo");
        assert!(kb.best_seasons(&oslo).is_empty());
        assert!(kb.tips(&oslo).is_empty());
        assert!(!kb.holds(predicates::EXPENSIVE, &oslo));
    }

    #[test]
    fn misspelled_section_rejected() {
        let err = KnowledgeBase::from_json_value(json!({
            "destinations": ["Oslo"],
            "predicates": { "expensive": ["Oslo"] },
            "best_seasons": { "Oslo": ["summer"] }
        }))
        .unwrap_err();
        match err {
            KnowledgeBaseError::Json(e) => assert!(e.to_string().contains("best_seasons")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn etag_is_stable_and_content_sensitive() {
        let a = KnowledgeBase::reference().unwrap();
        let b = KnowledgeBase::reference().unwrap();
        assert_eq!(a.etag(), b.etag());
        assert_eq!(a.etag().len(), 64);

        let c = KnowledgeBase::from_json_value(json!({ "destinations": ["Oslo"] })).unwrap();
        assert_ne!(a.etag(), c.etag());
    }
}
