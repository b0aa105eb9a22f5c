//! Human-readable reasons per destination.
//!
//! Each destination gets a list of positive and negative sentences. Rule
//! evidence is mapped through the catalog's explanation text, then the
//! fixed label texts are appended. Identical sentences appear once.

use serde::Serialize;

use compass_core::{Destination, RuleCatalog, RuleId};

use crate::evidence::EvidenceStore;
use crate::trace::Label;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub destination: Destination,
    pub positives: Vec<String>,
    pub negatives: Vec<String>,
}

fn push_unique(out: &mut Vec<String>, text: &str) {
    if !out.iter().any(|t| t == text) {
        out.push(text.to_string());
    }
}

fn rule_texts(out: &mut Vec<String>, rules: &[RuleId], catalog: &RuleCatalog) {
    for text in rules.iter().filter_map(|r| catalog.explanation(*r)) {
        push_unique(out, text);
    }
}

/// Explanation for one destination.
pub fn explain(
    store: &EvidenceStore,
    catalog: &RuleCatalog,
    destination: &Destination,
) -> Explanation {
    let labels = catalog.labels();
    let mut positives = Vec::new();
    let mut negatives = Vec::new();

    rule_texts(&mut positives, store.recommended(destination), catalog);
    rule_texts(&mut negatives, store.not_recommended(destination), catalog);

    if store.has_label(Label::SeasonMatched, destination) {
        push_unique(&mut positives, &labels.season_match);
    }
    if store.has_label(Label::WeakRecommendation, destination) {
        push_unique(&mut negatives, &labels.weak_season);
    }
    if store.has_label(Label::StronglyRecommended, destination) {
        push_unique(&mut positives, &labels.strongly_recommended);
    }
    if store.has_label(Label::StronglyNotRecommended, destination) {
        push_unique(&mut negatives, &labels.strongly_not_recommended);
    }

    Explanation {
        destination: destination.clone(),
        positives,
        negatives,
    }
}

/// Explanations for every destination, in declaration order.
pub fn build_explanations(store: &EvidenceStore, catalog: &RuleCatalog) -> Vec<Explanation> {
    store
        .destinations()
        .iter()
        .map(|d| explain(store, catalog, d))
        .collect()
}
