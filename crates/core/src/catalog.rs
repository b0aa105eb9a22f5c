//! Rule catalog: the per-rule logic text, category and explanation text,
//! plus the fixed explanation texts for season and strength labels.
//!
//! The catalog is configuration. It is loaded once at startup and passed by
//! reference to everything that renders rules for people.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::rule_id::RuleId;

static REFERENCE_CATALOG: &str = include_str!("../../../data/catalog.json");

/// Category reported for rules the catalog does not classify.
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Formal rendering, e.g. `IF likes(shopping) AND ... THEN recommended(X)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
    /// Sentence shown to the traveller when the rule contributes evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Fixed explanation texts for label membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTexts {
    pub season_match: String,
    pub weak_season: String,
    pub strongly_recommended: String,
    pub strongly_not_recommended: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    rules: BTreeMap<RuleId, RuleInfo>,
    labels: LabelTexts,
}

impl RuleCatalog {
    /// The built-in catalog covering all 25 rules.
    pub fn reference() -> Result<Self, CatalogError> {
        Self::from_json_str(REFERENCE_CATALOG)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn info(&self, rule: RuleId) -> Option<&RuleInfo> {
        self.rules.get(&rule)
    }

    pub fn logic(&self, rule: RuleId) -> Option<&str> {
        self.info(rule).and_then(|i| i.logic.as_deref())
    }

    pub fn explanation(&self, rule: RuleId) -> Option<&str> {
        self.info(rule).and_then(|i| i.explanation.as_deref())
    }

    pub fn category(&self, rule: RuleId) -> &str {
        self.info(rule)
            .and_then(|i| i.category.as_deref())
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Distinct categories in rule-number order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for info in self.rules.values() {
            if let Some(category) = info.category.as_deref() {
                if !out.contains(&category) {
                    out.push(category);
                }
            }
        }
        out
    }

    pub fn labels(&self) -> &LabelTexts {
        &self.labels
    }
}
