//! The per-run evidence store.
//!
//! One store is created empty for each inference run, filled monotonically
//! by the rule engine (nothing is ever retracted) and then read by scoring,
//! explanation and statistics. Only the engine writes to it.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use compass_core::{Destination, RuleId};

use crate::trace::{Conclusion, Flag, Label, TraceEntry};

/// Insertion-ordered set with a set-backed membership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedSet<T: Ord + Clone> {
    items: Vec<T>,
    seen: BTreeSet<T>,
}

impl<T: Ord + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> OrderedSet<T> {
    pub fn new() -> Self {
        OrderedSet {
            items: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Append `item` unless already present. Returns whether it was added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.seen.insert(item.clone()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.seen.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T: Ord + Clone> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Ord + Clone + Serialize> Serialize for OrderedSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

/// Evidence accumulated for every destination during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceStore {
    destinations: Vec<Destination>,
    recommended: BTreeMap<Destination, OrderedSet<RuleId>>,
    not_recommended: BTreeMap<Destination, OrderedSet<RuleId>>,
    season_matched: OrderedSet<Destination>,
    weak_recommendation: OrderedSet<Destination>,
    strongly_recommended: OrderedSet<Destination>,
    strongly_not_recommended: OrderedSet<Destination>,
    neutral: OrderedSet<Destination>,
    contradictions: OrderedSet<Destination>,
    final_recommendation: OrderedSet<Destination>,
    flags: OrderedSet<Flag>,
    trace: Vec<TraceEntry>,
}

impl EvidenceStore {
    /// An empty store with empty evidence lists for each destination.
    pub fn new(destinations: &[Destination]) -> Self {
        let empty = || {
            destinations
                .iter()
                .map(|d| (d.clone(), OrderedSet::new()))
                .collect::<BTreeMap<_, _>>()
        };
        EvidenceStore {
            destinations: destinations.to_vec(),
            recommended: empty(),
            not_recommended: empty(),
            season_matched: OrderedSet::new(),
            weak_recommendation: OrderedSet::new(),
            strongly_recommended: OrderedSet::new(),
            strongly_not_recommended: OrderedSet::new(),
            neutral: OrderedSet::new(),
            contradictions: OrderedSet::new(),
            final_recommendation: OrderedSet::new(),
            flags: OrderedSet::new(),
            trace: Vec::new(),
        }
    }

    /// Record a rule firing.
    ///
    /// Evidence and labels are inserted at most once per (rule, destination);
    /// a repeated firing leaves the store untouched. Flags and final
    /// recommendations are traced on every firing but inserted once.
    /// Returns whether the target set changed.
    pub(crate) fn apply(
        &mut self,
        rule: RuleId,
        conclusion: Conclusion,
        destination: Option<&Destination>,
    ) -> bool {
        let inserted = match (conclusion, destination) {
            (Conclusion::Flag(flag), _) => self.flags.insert(flag),
            (Conclusion::Recommended, Some(d)) => self
                .recommended
                .entry(d.clone())
                .or_default()
                .insert(rule),
            (Conclusion::NotRecommended, Some(d)) => self
                .not_recommended
                .entry(d.clone())
                .or_default()
                .insert(rule),
            (Conclusion::Label(label), Some(d)) => self.label_set_mut(label).insert(d.clone()),
            (_, None) => return false,
        };

        let always_traced = matches!(
            conclusion,
            Conclusion::Flag(_) | Conclusion::Label(Label::FinalRecommendation)
        );
        if inserted || always_traced {
            self.trace.push(TraceEntry {
                rule,
                destination: if conclusion.is_global() {
                    None
                } else {
                    destination.cloned()
                },
                conclusion,
            });
        } else {
            tracing::debug!(
                rule = rule.as_str(),
                destination = destination.map(Destination::as_str),
                "duplicate firing suppressed"
            );
        }
        inserted
    }

    /// Destinations in knowledge-base declaration order.
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Rules that fired in favour of `destination`, in firing order.
    pub fn recommended(&self, destination: &Destination) -> &[RuleId] {
        self.recommended
            .get(destination)
            .map(OrderedSet::as_slice)
            .unwrap_or(&[])
    }

    /// Rules that fired against `destination`, in firing order.
    pub fn not_recommended(&self, destination: &Destination) -> &[RuleId] {
        self.not_recommended
            .get(destination)
            .map(OrderedSet::as_slice)
            .unwrap_or(&[])
    }

    pub fn label_set(&self, label: Label) -> &OrderedSet<Destination> {
        match label {
            Label::SeasonMatched => &self.season_matched,
            Label::WeakRecommendation => &self.weak_recommendation,
            Label::StronglyRecommended => &self.strongly_recommended,
            Label::StronglyNotRecommended => &self.strongly_not_recommended,
            Label::Contradiction => &self.contradictions,
            Label::Neutral => &self.neutral,
            Label::FinalRecommendation => &self.final_recommendation,
        }
    }

    fn label_set_mut(&mut self, label: Label) -> &mut OrderedSet<Destination> {
        match label {
            Label::SeasonMatched => &mut self.season_matched,
            Label::WeakRecommendation => &mut self.weak_recommendation,
            Label::StronglyRecommended => &mut self.strongly_recommended,
            Label::StronglyNotRecommended => &mut self.strongly_not_recommended,
            Label::Contradiction => &mut self.contradictions,
            Label::Neutral => &mut self.neutral,
            Label::FinalRecommendation => &mut self.final_recommendation,
        }
    }

    pub fn has_label(&self, label: Label, destination: &Destination) -> bool {
        self.label_set(label).contains(destination)
    }

    pub fn final_recommendation(&self) -> &[Destination] {
        self.final_recommendation.as_slice()
    }

    pub fn flags(&self) -> &OrderedSet<Flag> {
        &self.flags
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn by_declaration<'a>(
        &'a self,
        evidence: &'a BTreeMap<Destination, OrderedSet<RuleId>>,
    ) -> ByDeclaration<'a> {
        ByDeclaration {
            order: &self.destinations,
            evidence,
        }
    }
}

/// Per-destination evidence as `{destination, rules}` entries, in
/// knowledge-base declaration order.
struct ByDeclaration<'a> {
    order: &'a [Destination],
    evidence: &'a BTreeMap<Destination, OrderedSet<RuleId>>,
}

#[derive(Serialize)]
struct EvidenceEntry<'a> {
    destination: &'a Destination,
    rules: &'a OrderedSet<RuleId>,
}

impl Serialize for ByDeclaration<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.order.len()))?;
        for destination in self.order {
            if let Some(rules) = self.evidence.get(destination) {
                seq.serialize_element(&EvidenceEntry { destination, rules })?;
            }
        }
        seq.end()
    }
}

impl Serialize for EvidenceStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("EvidenceStore", 12)?;
        s.serialize_field("destinations", &self.destinations)?;
        s.serialize_field("recommended", &self.by_declaration(&self.recommended))?;
        s.serialize_field("not_recommended", &self.by_declaration(&self.not_recommended))?;
        s.serialize_field("season_matched", &self.season_matched)?;
        s.serialize_field("weak_recommendation", &self.weak_recommendation)?;
        s.serialize_field("strongly_recommended", &self.strongly_recommended)?;
        s.serialize_field("strongly_not_recommended", &self.strongly_not_recommended)?;
        s.serialize_field("neutral", &self.neutral)?;
        s.serialize_field("contradictions", &self.contradictions)?;
        s.serialize_field("final_recommendation", &self.final_recommendation)?;
        s.serialize_field("flags", &self.flags)?;
        s.serialize_field("trace", &self.trace)?;
        s.end()
    }
}
