//! Rule statistics over a finished run.
//!
//! These are the numbers report charts are drawn from: how often each rule
//! fired, how those firings spread over rule categories, and per
//! destination how much positive and negative evidence each category
//! contributed.

use std::collections::BTreeMap;

use serde::Serialize;

use compass_core::{catalog::OTHER_CATEGORY, Destination, RuleCatalog, RuleId};

use crate::evidence::EvidenceStore;

/// Trace entries per rule. Rules that never fired are absent.
pub fn rule_frequency(store: &EvidenceStore) -> BTreeMap<RuleId, usize> {
    let mut counts = BTreeMap::new();
    for entry in store.trace() {
        *counts.entry(entry.rule).or_insert(0) += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Catalog categories in catalog order, with "Other" last when a rule the
/// catalog does not classify is in play.
fn columns<'a>(catalog: &'a RuleCatalog, rules: impl Iterator<Item = RuleId>) -> Vec<&'a str> {
    let mut cols = catalog.categories();
    let mut needs_other = false;
    for rule in rules {
        let category = catalog.category(rule);
        if !cols.contains(&category) {
            needs_other = true;
        }
    }
    if needs_other && !cols.contains(&OTHER_CATEGORY) {
        cols.push(OTHER_CATEGORY);
    }
    cols
}

/// Rule frequency summed by catalog category. Categories with no firings
/// are omitted.
pub fn category_contributions(store: &EvidenceStore, catalog: &RuleCatalog) -> Vec<CategoryCount> {
    let freq = rule_frequency(store);
    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for (rule, count) in &freq {
        *by_category.entry(catalog.category(*rule)).or_insert(0) += count;
    }

    columns(catalog, freq.keys().copied())
        .into_iter()
        .filter_map(|category| {
            by_category.get(category).map(|count| CategoryCount {
                category: category.to_string(),
                count: *count,
            })
        })
        .collect()
}

/// Destination × category evidence counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatrix {
    pub destinations: Vec<Destination>,
    pub categories: Vec<String>,
    /// `positive[row][col]`: recommended evidence for `destinations[row]`
    /// from rules in `categories[col]`.
    pub positive: Vec<Vec<usize>>,
    pub negative: Vec<Vec<usize>>,
}

impl CategoryMatrix {
    pub fn build(store: &EvidenceStore, catalog: &RuleCatalog) -> Self {
        let destinations = store.destinations().to_vec();
        let evidence_rules = destinations.iter().flat_map(|d| {
            store
                .recommended(d)
                .iter()
                .chain(store.not_recommended(d))
                .copied()
        });
        let categories = columns(catalog, evidence_rules);

        let count = |rules: &[RuleId]| -> Vec<usize> {
            categories
                .iter()
                .map(|col| {
                    rules
                        .iter()
                        .filter(|r| column_of(catalog, &categories, **r) == *col)
                        .count()
                })
                .collect()
        };

        let positive = destinations
            .iter()
            .map(|d| count(store.recommended(d)))
            .collect();
        let negative = destinations
            .iter()
            .map(|d| count(store.not_recommended(d)))
            .collect();

        CategoryMatrix {
            categories: categories.iter().map(|c| c.to_string()).collect(),
            destinations,
            positive,
            negative,
        }
    }

    pub fn row(&self, destination: &Destination) -> Option<(&[usize], &[usize])> {
        let idx = self.destinations.iter().position(|d| d == destination)?;
        Some((
            self.positive[idx].as_slice(),
            self.negative[idx].as_slice(),
        ))
    }
}

fn column_of<'a>(catalog: &'a RuleCatalog, columns: &[&str], rule: RuleId) -> &'a str {
    let category = catalog.category(rule);
    if columns.contains(&category) {
        category
    } else {
        OTHER_CATEGORY
    }
}

/// All statistics for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStatistics {
    pub frequency: BTreeMap<RuleId, usize>,
    pub categories: Vec<CategoryCount>,
    pub matrix: CategoryMatrix,
}

impl RuleStatistics {
    pub fn collect(store: &EvidenceStore, catalog: &RuleCatalog) -> Self {
        RuleStatistics {
            frequency: rule_frequency(store),
            categories: category_contributions(store, catalog),
            matrix: CategoryMatrix::build(store, catalog),
        }
    }
}
