//! Rule identifiers.
//!
//! Rule ids are stable strings (`R4_culture_history`) used as evidence in
//! the evidence store, as keys in the rule catalog and in trace output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Evaluation tier. Every primitive rule runs before any derived rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Reads preferences and the knowledge base.
    Primitive,
    /// Reads the evidence produced by primitive rules.
    Derived,
}

impl Tier {
    pub fn number(self) -> u32 {
        match self {
            Tier::Primitive => 1,
            Tier::Derived => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "R1_budget_low_avoid_expensive")]
    BudgetLowAvoidExpensive,
    #[serde(rename = "R2_budget_allows_expensive")]
    BudgetAllowsExpensive,
    #[serde(rename = "R3_food_local_cuisine")]
    FoodLocalCuisine,
    #[serde(rename = "R4_culture_history")]
    CultureHistory,
    #[serde(rename = "R5_adventure")]
    Adventure,
    #[serde(rename = "R6_shopping")]
    Shopping,
    #[serde(rename = "R7_nature")]
    Nature,
    #[serde(rename = "R8_city_life")]
    CityLife,
    #[serde(rename = "R9_season_match")]
    SeasonMatch,
    #[serde(rename = "R10_season_weak")]
    SeasonWeak,
    #[serde(rename = "R11_low_traffic_avoid_high")]
    LowTrafficAvoidHigh,
    #[serde(rename = "R12_high_traffic_ok")]
    HighTrafficOk,
    #[serde(rename = "R13_public_transport")]
    PublicTransport,
    #[serde(rename = "R14_walking_avoid_high_traffic")]
    WalkingAvoidHighTraffic,
    #[serde(rename = "R15_high_safety_avoid_mid")]
    HighSafetyAvoidMid,
    #[serde(rename = "R16_high_safety_prefers_very_safe")]
    HighSafetyPrefersVerySafe,
    #[serde(rename = "R17_low_safety_concern")]
    LowSafetyConcern,
    #[serde(rename = "R18_family_avoid_risky_adventure_city")]
    FamilyAvoidRiskyAdventureCity,
    #[serde(rename = "R19_solo_city_life")]
    SoloCityLife,
    #[serde(rename = "R20_strong_recommendation")]
    StrongRecommendation,
    #[serde(rename = "R21_strong_not_recommendation")]
    StrongNotRecommendation,
    #[serde(rename = "R22_contradiction_detection")]
    ContradictionDetection,
    #[serde(rename = "R23_flag_inconsistency")]
    FlagInconsistency,
    #[serde(rename = "R24_neutral_default")]
    NeutralDefault,
    #[serde(rename = "R25_final_recommendation")]
    FinalRecommendation,
}

impl RuleId {
    pub const ALL: [RuleId; 25] = [
        RuleId::BudgetLowAvoidExpensive,
        RuleId::BudgetAllowsExpensive,
        RuleId::FoodLocalCuisine,
        RuleId::CultureHistory,
        RuleId::Adventure,
        RuleId::Shopping,
        RuleId::Nature,
        RuleId::CityLife,
        RuleId::SeasonMatch,
        RuleId::SeasonWeak,
        RuleId::LowTrafficAvoidHigh,
        RuleId::HighTrafficOk,
        RuleId::PublicTransport,
        RuleId::WalkingAvoidHighTraffic,
        RuleId::HighSafetyAvoidMid,
        RuleId::HighSafetyPrefersVerySafe,
        RuleId::LowSafetyConcern,
        RuleId::FamilyAvoidRiskyAdventureCity,
        RuleId::SoloCityLife,
        RuleId::StrongRecommendation,
        RuleId::StrongNotRecommendation,
        RuleId::ContradictionDetection,
        RuleId::FlagInconsistency,
        RuleId::NeutralDefault,
        RuleId::FinalRecommendation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::BudgetLowAvoidExpensive => "R1_budget_low_avoid_expensive",
            RuleId::BudgetAllowsExpensive => "R2_budget_allows_expensive",
            RuleId::FoodLocalCuisine => "R3_food_local_cuisine",
            RuleId::CultureHistory => "R4_culture_history",
            RuleId::Adventure => "R5_adventure",
            RuleId::Shopping => "R6_shopping",
            RuleId::Nature => "R7_nature",
            RuleId::CityLife => "R8_city_life",
            RuleId::SeasonMatch => "R9_season_match",
            RuleId::SeasonWeak => "R10_season_weak",
            RuleId::LowTrafficAvoidHigh => "R11_low_traffic_avoid_high",
            RuleId::HighTrafficOk => "R12_high_traffic_ok",
            RuleId::PublicTransport => "R13_public_transport",
            RuleId::WalkingAvoidHighTraffic => "R14_walking_avoid_high_traffic",
            RuleId::HighSafetyAvoidMid => "R15_high_safety_avoid_mid",
            RuleId::HighSafetyPrefersVerySafe => "R16_high_safety_prefers_very_safe",
            RuleId::LowSafetyConcern => "R17_low_safety_concern",
            RuleId::FamilyAvoidRiskyAdventureCity => "R18_family_avoid_risky_adventure_city",
            RuleId::SoloCityLife => "R19_solo_city_life",
            RuleId::StrongRecommendation => "R20_strong_recommendation",
            RuleId::StrongNotRecommendation => "R21_strong_not_recommendation",
            RuleId::ContradictionDetection => "R22_contradiction_detection",
            RuleId::FlagInconsistency => "R23_flag_inconsistency",
            RuleId::NeutralDefault => "R24_neutral_default",
            RuleId::FinalRecommendation => "R25_final_recommendation",
        }
    }

    /// Look up a rule by its string id.
    pub fn parse(id: &str) -> Option<RuleId> {
        RuleId::ALL.into_iter().find(|rule| rule.as_str() == id)
    }

    /// Position in the rule numbering, 1 through 25.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn tier(self) -> Tier {
        if self.number() <= 19 {
            Tier::Primitive
        } else {
            Tier::Derived
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
