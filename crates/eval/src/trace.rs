//! Reasoning trace entries.
//!
//! Every rule firing appends one entry naming the rule, the destination it
//! fired for (none for global flags) and what it concluded.

use std::fmt;

use serde::{Serialize, Serializer};

use compass_core::{Destination, RuleCatalog, RuleId};

/// Destination label sets maintained by the evidence store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    SeasonMatched,
    WeakRecommendation,
    StronglyRecommended,
    StronglyNotRecommended,
    Contradiction,
    Neutral,
    FinalRecommendation,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::SeasonMatched => "season_matched",
            Label::WeakRecommendation => "weak_recommendation",
            Label::StronglyRecommended => "strongly_recommended",
            Label::StronglyNotRecommended => "strongly_not_recommended",
            Label::Contradiction => "contradiction",
            Label::Neutral => "neutral",
            Label::FinalRecommendation => "final_recommendation",
        }
    }
}

/// Global advisory flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    SafetyNotAConstraint,
    Inconsistency,
}

impl Flag {
    pub fn as_str(self) -> &'static str {
        match self {
            Flag::SafetyNotAConstraint => "safety_not_a_constraint",
            Flag::Inconsistency => "flag_inconsistency",
        }
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// What a rule concludes when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conclusion {
    Recommended,
    NotRecommended,
    Label(Label),
    Flag(Flag),
}

impl Conclusion {
    pub fn as_str(self) -> &'static str {
        match self {
            Conclusion::Recommended => "recommended",
            Conclusion::NotRecommended => "not_recommended",
            Conclusion::Label(label) => label.as_str(),
            Conclusion::Flag(flag) => flag.as_str(),
        }
    }

    pub fn is_global(self) -> bool {
        matches!(self, Conclusion::Flag(_))
    }
}

impl Serialize for Conclusion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub rule: RuleId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,
    pub conclusion: Conclusion,
}

impl TraceEntry {
    /// Render with the catalog's logic text:
    /// `R4_culture_history: IF ... THEN recommended(X); applied with X = Italy`.
    /// Falls back to the plain form when the catalog has no logic for the rule.
    pub fn render(&self, catalog: &RuleCatalog) -> String {
        match (catalog.logic(self.rule), &self.destination) {
            (Some(logic), Some(d)) => format!("{}: {}; applied with X = {}", self.rule, logic, d),
            (Some(logic), None) => format!("{}: {}", self.rule, logic),
            (None, _) => self.to_string(),
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.destination {
            Some(d) => write!(f, "{}: {}({})", self.rule, self.conclusion.as_str(), d),
            None => write!(f, "{}: {}", self.rule, self.conclusion.as_str()),
        }
    }
}
