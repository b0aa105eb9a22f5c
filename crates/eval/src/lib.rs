//! Compass evaluator -- accepts a knowledge base and a preference profile,
//! produces ranked destinations with explanations and a reasoning trace.
//!
//! Evaluation is a single deterministic pass of the tiered rule table into
//! a fresh evidence store. Scoring, explanations, status labels and
//! statistics only read the finished store.

pub mod evidence;
pub mod explain;
pub mod rules;
pub mod scoring;
pub mod stats;
pub mod status;
pub mod trace;

use serde::Serialize;

use compass_core::{KnowledgeBase, RuleCatalog, UserPreferences};

pub use evidence::{EvidenceStore, OrderedSet};
pub use explain::{build_explanations, Explanation};
pub use rules::{Rule, RuleContext, RuleSet, RuleSetError, Scope};
pub use scoring::{rank, score, scores, DestinationScore};
pub use stats::{CategoryCount, CategoryMatrix, RuleStatistics};
pub use status::{status_labels, StatusLabel};
pub use trace::{Conclusion, Flag, Label, TraceEntry};

/// Run the rule table against a profile.
///
/// This is the top-level entry point for inference. Every call builds a
/// new evidence store; nothing carries over between runs.
pub fn infer(kb: &KnowledgeBase, prefs: &UserPreferences, rules: &RuleSet) -> EvidenceStore {
    tracing::info!(
        destinations = kb.destinations().len(),
        rules = rules.len(),
        kb_etag = kb.etag(),
        "inference started"
    );
    let store = rules::eval_tiers(rules, kb, prefs);
    tracing::info!(
        trace_entries = store.trace().len(),
        final_recommendations = store.final_recommendation().len(),
        "inference finished"
    );
    store
}

/// Result of a full recommendation run.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub store: EvidenceStore,
    pub ranking: Vec<DestinationScore>,
    pub explanations: Vec<Explanation>,
}

impl Recommendation {
    pub fn explanation(&self, destination: &compass_core::Destination) -> Option<&Explanation> {
        self.explanations
            .iter()
            .find(|e| &e.destination == destination)
    }
}

/// Infer, rank and explain in one call.
pub fn recommend(
    kb: &KnowledgeBase,
    prefs: &UserPreferences,
    rules: &RuleSet,
    catalog: &RuleCatalog,
) -> Recommendation {
    let store = infer(kb, prefs, rules);
    let ranking = rank(&store);
    let explanations = build_explanations(&store, catalog);
    Recommendation {
        store,
        ranking,
        explanations,
    }
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
