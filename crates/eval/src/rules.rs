//! Tiered rule evaluation.
//!
//! Rules are data: an id, a scope, a condition and a conclusion. They are
//! evaluated tier by tier: every primitive rule runs before any derived
//! rule, because derived rules read the evidence primitive rules produce.
//!
//! Each rule runs exactly once, in table order, in a single pass. There is
//! no fixpoint iteration. For a single rule the condition is checked for
//! every destination in scope before any of that rule's conclusions are
//! recorded.

use std::collections::BTreeSet;
use std::fmt;

use compass_core::{
    predicates, Budget, Companions, Destination, Experience, FoodPreference, KnowledgeBase,
    RuleId, SafetyPriority, Tier, TrafficPreference, Transport, UserPreferences,
};

use crate::evidence::EvidenceStore;
use crate::trace::{Conclusion, Flag, Label};

/// Read-only view handed to rule conditions.
pub struct RuleContext<'a> {
    pub prefs: &'a UserPreferences,
    pub kb: &'a KnowledgeBase,
    pub store: &'a EvidenceStore,
}

type DestinationTest = Box<dyn Fn(&RuleContext<'_>, &Destination) -> bool + Send + Sync>;
type GlobalTest = Box<dyn Fn(&RuleContext<'_>) -> bool + Send + Sync>;

/// Which destinations a rule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every declared destination, in declaration order.
    EachDestination,
    /// Members of a label set, in insertion order.
    EachMember(Label),
    /// Once per run, for no particular destination.
    Global,
}

enum Condition {
    Destination(DestinationTest),
    Global(GlobalTest),
}

pub struct Rule {
    id: RuleId,
    scope: Scope,
    conclusion: Conclusion,
    condition: Condition,
}

impl Rule {
    pub fn for_each_destination(
        id: RuleId,
        conclusion: Conclusion,
        test: impl Fn(&RuleContext<'_>, &Destination) -> bool + Send + Sync + 'static,
    ) -> Self {
        Rule {
            id,
            scope: Scope::EachDestination,
            conclusion,
            condition: Condition::Destination(Box::new(test)),
        }
    }

    pub fn for_each_member(
        id: RuleId,
        label: Label,
        conclusion: Conclusion,
        test: impl Fn(&RuleContext<'_>, &Destination) -> bool + Send + Sync + 'static,
    ) -> Self {
        Rule {
            id,
            scope: Scope::EachMember(label),
            conclusion,
            condition: Condition::Destination(Box::new(test)),
        }
    }

    pub fn global(
        id: RuleId,
        flag: Flag,
        test: impl Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Rule {
            id,
            scope: Scope::Global,
            conclusion: Conclusion::Flag(flag),
            condition: Condition::Global(Box::new(test)),
        }
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn tier(&self) -> Tier {
        self.id.tier()
    }

    pub fn conclusion(&self) -> Conclusion {
        self.conclusion
    }

    /// Evaluate the condition over the rule's scope. Each returned target is
    /// one firing; `None` is a global firing.
    fn targets(&self, ctx: &RuleContext<'_>) -> Vec<Option<Destination>> {
        match (&self.condition, self.scope) {
            (Condition::Global(test), _) => {
                if test(ctx) {
                    vec![None]
                } else {
                    Vec::new()
                }
            }
            (Condition::Destination(test), Scope::EachMember(label)) => ctx
                .store
                .label_set(label)
                .iter()
                .filter(|d| test(ctx, *d))
                .map(|d| Some(d.clone()))
                .collect(),
            (Condition::Destination(test), _) => ctx
                .kb
                .destinations()
                .iter()
                .filter(|d| test(ctx, *d))
                .map(|d| Some(d.clone()))
                .collect(),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("conclusion", &self.conclusion)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleSetError {
    #[error("rule {rule} appears more than once")]
    DuplicateRule { rule: RuleId },
    #[error("primitive rule {rule} is listed after a derived rule")]
    TierOrder { rule: RuleId },
    #[error("rule {rule} mixes a global scope with a per-destination conclusion")]
    ScopeMismatch { rule: RuleId },
}

/// An ordered, validated rule table.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule table, checking that ids are unique, that primitive
    /// rules precede derived ones, and that only global rules raise flags.
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleSetError> {
        let mut seen = BTreeSet::new();
        let mut derived_seen = false;
        for rule in &rules {
            if !seen.insert(rule.id) {
                return Err(RuleSetError::DuplicateRule { rule: rule.id });
            }
            match rule.tier() {
                Tier::Derived => derived_seen = true,
                Tier::Primitive if derived_seen => {
                    return Err(RuleSetError::TierOrder { rule: rule.id })
                }
                Tier::Primitive => {}
            }
            if (rule.scope == Scope::Global) != rule.conclusion.is_global() {
                return Err(RuleSetError::ScopeMismatch { rule: rule.id });
            }
        }
        Ok(RuleSet { rules })
    }

    /// The 25-rule travel recommendation table, validated like any other.
    pub fn standard() -> Result<Self, RuleSetError> {
        Self::new(standard_rules())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Run every rule once, tier by tier, into a fresh evidence store.
pub fn eval_tiers(rules: &RuleSet, kb: &KnowledgeBase, prefs: &UserPreferences) -> EvidenceStore {
    let mut store = EvidenceStore::new(kb.destinations());

    for tier in [Tier::Primitive, Tier::Derived] {
        for rule in rules.rules.iter().filter(|r| r.tier() == tier) {
            let targets = {
                let ctx = RuleContext {
                    prefs,
                    kb,
                    store: &store,
                };
                rule.targets(&ctx)
            };
            for target in targets {
                if store.apply(rule.id, rule.conclusion, target.as_ref()) {
                    tracing::debug!(
                        rule = rule.id.as_str(),
                        tier = tier.number(),
                        destination = target.as_ref().map(Destination::as_str),
                        conclusion = rule.conclusion.as_str(),
                        "rule fired"
                    );
                }
            }
        }
    }

    store
}

// ──────────────────────────────────────────────
// Standard rule table
// ──────────────────────────────────────────────

fn likes(id: RuleId, experience: Experience, predicate: &'static str) -> Rule {
    Rule::for_each_destination(id, Conclusion::Recommended, move |ctx, d| {
        ctx.prefs.likes(experience) && ctx.kb.holds(predicate, d)
    })
}

fn standard_rules() -> Vec<Rule> {
    use predicates::*;

    vec![
        // Budget
        Rule::for_each_destination(
            RuleId::BudgetLowAvoidExpensive,
            Conclusion::NotRecommended,
            |ctx, d| ctx.prefs.budget == Some(Budget::Low) && ctx.kb.holds(EXPENSIVE, d),
        ),
        Rule::for_each_destination(
            RuleId::BudgetAllowsExpensive,
            Conclusion::Recommended,
            |ctx, d| {
                matches!(ctx.prefs.budget, Some(Budget::Medium | Budget::High))
                    && ctx.kb.holds(EXPENSIVE, d)
            },
        ),
        // Food
        Rule::for_each_destination(
            RuleId::FoodLocalCuisine,
            Conclusion::Recommended,
            |ctx, d| {
                ctx.prefs.food_preference == Some(FoodPreference::LovesLocalCuisine)
                    && ctx.kb.holds(GOOD_LOCAL_CUISINE, d)
            },
        ),
        // Activities
        likes(
            RuleId::CultureHistory,
            Experience::CultureHistory,
            GOOD_FOR_CULTURE_HISTORY,
        ),
        likes(RuleId::Adventure, Experience::Adventure, GOOD_FOR_ADVENTURE),
        likes(RuleId::Shopping, Experience::Shopping, GOOD_FOR_SHOPPING),
        likes(
            RuleId::Nature,
            Experience::NatureScenery,
            GOOD_FOR_NATURE_SCENERY,
        ),
        likes(RuleId::CityLife, Experience::CityLife, GOOD_FOR_CITY_LIFE),
        // Season
        Rule::for_each_destination(
            RuleId::SeasonMatch,
            Conclusion::Label(Label::SeasonMatched),
            |ctx, d| {
                ctx.prefs
                    .preferred_season
                    .is_some_and(|s| ctx.kb.best_seasons(d).contains(&s))
            },
        ),
        Rule::for_each_destination(
            RuleId::SeasonWeak,
            Conclusion::Label(Label::WeakRecommendation),
            |ctx, d| {
                let best = ctx.kb.best_seasons(d);
                ctx.prefs
                    .preferred_season
                    .is_some_and(|s| !best.is_empty() && !best.contains(&s))
            },
        ),
        // Traffic and transport
        Rule::for_each_destination(
            RuleId::LowTrafficAvoidHigh,
            Conclusion::NotRecommended,
            |ctx, d| {
                ctx.prefs.traffic_preference == Some(TrafficPreference::LowTraffic)
                    && ctx.kb.holds(HIGH_TRAFFIC_PEAK, d)
            },
        ),
        Rule::for_each_destination(
            RuleId::HighTrafficOk,
            Conclusion::Recommended,
            |ctx, d| {
                ctx.prefs.traffic_preference == Some(TrafficPreference::HighTraffic)
                    && ctx.kb.holds(HIGH_TRAFFIC_PEAK, d)
            },
        ),
        Rule::for_each_destination(
            RuleId::PublicTransport,
            Conclusion::Recommended,
            |ctx, d| {
                ctx.prefs.transport == Some(Transport::PublicTransport)
                    && ctx.kb.holds(EXCELLENT_PUBLIC_TRANSPORT, d)
            },
        ),
        Rule::for_each_destination(
            RuleId::WalkingAvoidHighTraffic,
            Conclusion::NotRecommended,
            |ctx, d| {
                ctx.prefs.transport == Some(Transport::Walking)
                    && ctx.kb.holds(HIGH_TRAFFIC_PEAK, d)
            },
        ),
        // Safety
        Rule::for_each_destination(
            RuleId::HighSafetyAvoidMid,
            Conclusion::NotRecommended,
            |ctx, d| {
                ctx.prefs.safety_priority == Some(SafetyPriority::HighSafety)
                    && ctx.kb.holds(MID_SAFETY, d)
            },
        ),
        Rule::for_each_destination(
            RuleId::HighSafetyPrefersVerySafe,
            Conclusion::Recommended,
            |ctx, d| {
                ctx.prefs.safety_priority == Some(SafetyPriority::HighSafety)
                    && ctx.kb.holds(VERY_SAFE_DESTINATION, d)
            },
        ),
        Rule::global(RuleId::LowSafetyConcern, Flag::SafetyNotAConstraint, |ctx| {
            ctx.prefs.safety_priority == Some(SafetyPriority::LowSafetyConcern)
        }),
        // Companions
        Rule::for_each_destination(
            RuleId::FamilyAvoidRiskyAdventureCity,
            Conclusion::NotRecommended,
            |ctx, d| {
                ctx.prefs.companions == Some(Companions::Family)
                    && ctx.kb.holds(GOOD_FOR_ADVENTURE, d)
                    && ctx.kb.holds(HIGH_TRAFFIC_PEAK, d)
            },
        ),
        Rule::for_each_destination(
            RuleId::SoloCityLife,
            Conclusion::Recommended,
            |ctx, d| {
                ctx.prefs.companions == Some(Companions::Solo)
                    && ctx.kb.holds(GOOD_FOR_CITY_LIFE, d)
            },
        ),
        // Derived
        Rule::for_each_destination(
            RuleId::StrongRecommendation,
            Conclusion::Label(Label::StronglyRecommended),
            |ctx, d| {
                !ctx.store.recommended(d).is_empty()
                    && ctx.store.has_label(Label::SeasonMatched, d)
            },
        ),
        Rule::for_each_destination(
            RuleId::StrongNotRecommendation,
            Conclusion::Label(Label::StronglyNotRecommended),
            |ctx, d| {
                !ctx.store.not_recommended(d).is_empty()
                    && ctx.store.has_label(Label::WeakRecommendation, d)
            },
        ),
        Rule::for_each_destination(
            RuleId::ContradictionDetection,
            Conclusion::Label(Label::Contradiction),
            |ctx, d| {
                !ctx.store.recommended(d).is_empty() && !ctx.store.not_recommended(d).is_empty()
            },
        ),
        Rule::global(RuleId::FlagInconsistency, Flag::Inconsistency, |ctx| {
            !ctx.store.label_set(Label::Contradiction).is_empty()
        }),
        Rule::for_each_destination(
            RuleId::NeutralDefault,
            Conclusion::Label(Label::Neutral),
            |ctx, d| {
                ctx.store.recommended(d).is_empty() && ctx.store.not_recommended(d).is_empty()
            },
        ),
        Rule::for_each_member(
            RuleId::FinalRecommendation,
            Label::StronglyRecommended,
            Conclusion::Label(Label::FinalRecommendation),
            |_, _| true,
        ),
    ]
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::Season;

    fn reference_kb() -> KnowledgeBase {
        KnowledgeBase::reference().unwrap()
    }

    fn run(prefs: &UserPreferences) -> EvidenceStore {
        eval_tiers(&RuleSet::standard().unwrap(), &reference_kb(), prefs)
    }

    fn d(name: &str) -> Destination {
        Destination::from(name)
    }

    fn fired_for(store: &EvidenceStore, rule: RuleId) -> Vec<String> {
        store
            .trace()
            .iter()
            .filter(|e| e.rule == rule)
            .filter_map(|e| e.destination.as_ref().map(|d| d.to_string()))
            .collect()
    }

    #[test]
    fn standard_table_is_valid_and_complete() {
        let ids: Vec<RuleId> = standard_rules().iter().map(Rule::id).collect();
        assert_eq!(ids, RuleId::ALL.to_vec());
        assert_eq!(RuleSet::standard().unwrap().len(), 25);
    }

    #[test]
    fn duplicate_rule_rejected() {
        let rules = vec![
            likes(RuleId::Shopping, Experience::Shopping, "good_for_shopping"),
            likes(RuleId::Shopping, Experience::Shopping, "good_for_shopping"),
        ];
        assert_eq!(
            RuleSet::new(rules).unwrap_err(),
            RuleSetError::DuplicateRule {
                rule: RuleId::Shopping
            }
        );
    }

    #[test]
    fn primitive_after_derived_rejected() {
        let rules = vec![
            Rule::for_each_destination(
                RuleId::NeutralDefault,
                Conclusion::Label(Label::Neutral),
                |_, _| true,
            ),
            likes(RuleId::Shopping, Experience::Shopping, "good_for_shopping"),
        ];
        assert_eq!(
            RuleSet::new(rules).unwrap_err(),
            RuleSetError::TierOrder {
                rule: RuleId::Shopping
            }
        );
    }

    #[test]
    fn flag_on_destination_scope_rejected() {
        let rules = vec![Rule::for_each_destination(
            RuleId::LowSafetyConcern,
            Conclusion::Flag(Flag::SafetyNotAConstraint),
            |_, _| true,
        )];
        assert_eq!(
            RuleSet::new(rules).unwrap_err(),
            RuleSetError::ScopeMismatch {
                rule: RuleId::LowSafetyConcern
            }
        );
    }

    #[test]
    fn empty_profile_fires_only_neutral() {
        let store = run(&UserPreferences::default());
        assert!(store
            .trace()
            .iter()
            .all(|e| e.rule == RuleId::NeutralDefault));
        assert_eq!(store.label_set(Label::Neutral).len(), 5);
        assert!(store.flags().is_empty());
    }

    #[test]
    fn r1_low_budget_avoids_expensive() {
        let store = run(&UserPreferences {
            budget: Some(Budget::Low),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::BudgetLowAvoidExpensive),
            vec!["Switzerland", "Japan"]
        );
        assert_eq!(
            store.not_recommended(&d("Switzerland")),
            &[RuleId::BudgetLowAvoidExpensive]
        );
        assert!(fired_for(&store, RuleId::BudgetAllowsExpensive).is_empty());
    }

    #[test]
    fn r2_medium_and_high_budget_allow_expensive() {
        for budget in [Budget::Medium, Budget::High] {
            let store = run(&UserPreferences {
                budget: Some(budget),
                ..Default::default()
            });
            assert_eq!(
                fired_for(&store, RuleId::BudgetAllowsExpensive),
                vec!["Switzerland", "Japan"]
            );
        }
    }

    #[test]
    fn r3_local_cuisine() {
        let store = run(&UserPreferences {
            food_preference: Some(FoodPreference::LovesLocalCuisine),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::FoodLocalCuisine),
            vec!["Italy", "Turkey"]
        );

        let familiar = run(&UserPreferences {
            food_preference: Some(FoodPreference::PrefersFamiliarFood),
            ..Default::default()
        });
        assert!(fired_for(&familiar, RuleId::FoodLocalCuisine).is_empty());
    }

    #[test]
    fn r4_to_r8_follow_liked_experiences() {
        let store = run(&UserPreferences {
            likes: Experience::ALL.to_vec(),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::CultureHistory),
            vec!["Switzerland", "Italy", "United_Kingdom"]
        );
        assert_eq!(
            fired_for(&store, RuleId::Adventure),
            vec!["Switzerland", "Japan", "Turkey"]
        );
        assert_eq!(
            fired_for(&store, RuleId::Shopping),
            vec!["Italy", "Japan", "Turkey"]
        );
        assert_eq!(fired_for(&store, RuleId::Nature), vec!["Switzerland"]);
        assert_eq!(
            fired_for(&store, RuleId::CityLife),
            vec!["Italy", "Japan", "United_Kingdom"]
        );
    }

    #[test]
    fn r9_r10_are_exclusive_per_destination() {
        let store = run(&UserPreferences {
            preferred_season: Some(Season::Summer),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::SeasonMatch),
            vec!["Switzerland", "United_Kingdom"]
        );
        assert_eq!(
            fired_for(&store, RuleId::SeasonWeak),
            vec!["Italy", "Japan", "Turkey"]
        );
    }

    #[test]
    fn r10_skips_destinations_without_best_season() {
        let kb = KnowledgeBase::from_json_value(serde_json::json!({
            "destinations": ["Oslo", "Lima"],
            "best_season": { "Lima": ["summer"] }
        }))
        .unwrap();
        let store = eval_tiers(
            &RuleSet::standard().unwrap(),
            &kb,
            &UserPreferences {
                preferred_season: Some(Season::Winter),
                ..Default::default()
            },
        );
        assert!(fired_for(&store, RuleId::SeasonMatch).is_empty());
        assert_eq!(fired_for(&store, RuleId::SeasonWeak), vec!["Lima"]);
    }

    #[test]
    fn r11_to_r14_traffic_and_transport() {
        let store = run(&UserPreferences {
            traffic_preference: Some(TrafficPreference::LowTraffic),
            transport: Some(Transport::Walking),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::LowTrafficAvoidHigh),
            vec!["Italy", "Japan"]
        );
        assert_eq!(
            fired_for(&store, RuleId::WalkingAvoidHighTraffic),
            vec!["Italy", "Japan"]
        );

        let store = run(&UserPreferences {
            traffic_preference: Some(TrafficPreference::HighTraffic),
            transport: Some(Transport::PublicTransport),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::HighTrafficOk),
            vec!["Italy", "Japan"]
        );
        assert_eq!(
            fired_for(&store, RuleId::PublicTransport),
            vec!["Switzerland", "Japan"]
        );

        let store = run(&UserPreferences {
            traffic_preference: Some(TrafficPreference::MidTraffic),
            transport: Some(Transport::CarTaxi),
            ..Default::default()
        });
        assert!(store.trace().iter().all(|e| e.rule == RuleId::NeutralDefault));
    }

    #[test]
    fn r15_r16_high_safety() {
        let store = run(&UserPreferences {
            safety_priority: Some(SafetyPriority::HighSafety),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::HighSafetyAvoidMid),
            vec!["Italy", "United_Kingdom", "Turkey"]
        );
        assert_eq!(
            fired_for(&store, RuleId::HighSafetyPrefersVerySafe),
            vec!["Switzerland", "Japan"]
        );
        assert!(store.flags().is_empty());
    }

    #[test]
    fn r17_is_a_global_flag() {
        let store = run(&UserPreferences {
            safety_priority: Some(SafetyPriority::LowSafetyConcern),
            ..Default::default()
        });
        assert!(store.has_flag(Flag::SafetyNotAConstraint));
        let entries: Vec<_> = store
            .trace()
            .iter()
            .filter(|e| e.rule == RuleId::LowSafetyConcern)
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].destination.is_none());
        assert_eq!(store.label_set(Label::Neutral).len(), 5);
    }

    #[test]
    fn r18_r19_companions() {
        let store = run(&UserPreferences {
            companions: Some(Companions::Family),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::FamilyAvoidRiskyAdventureCity),
            vec!["Japan"]
        );

        let store = run(&UserPreferences {
            companions: Some(Companions::Solo),
            ..Default::default()
        });
        assert_eq!(
            fired_for(&store, RuleId::SoloCityLife),
            vec!["Italy", "Japan", "United_Kingdom"]
        );

        let store = run(&UserPreferences {
            companions: Some(Companions::Dual),
            ..Default::default()
        });
        assert!(store.trace().iter().all(|e| e.rule == RuleId::NeutralDefault));
    }

    #[test]
    fn derived_rules_follow_primitive_evidence() {
        let store = run(&UserPreferences {
            budget: Some(Budget::Low),
            preferred_season: Some(Season::Summer),
            likes: vec![Experience::CityLife],
            ..Default::default()
        });

        // Japan: R1 against, R8 for, out of season in summer.
        let japan = d("Japan");
        assert!(store.has_label(Label::Contradiction, &japan));
        assert!(store.has_label(Label::StronglyNotRecommended, &japan));
        assert!(!store.has_label(Label::StronglyRecommended, &japan));

        // United_Kingdom: R8 for and in season.
        let uk = d("United_Kingdom");
        assert!(store.has_label(Label::StronglyRecommended, &uk));
        assert_eq!(store.final_recommendation(), &[uk]);

        // Turkey: nothing fired.
        assert!(store.has_label(Label::Neutral, &d("Turkey")));
        assert!(store.has_flag(Flag::Inconsistency));
    }

    #[test]
    fn derived_trace_order() {
        let store = run(&UserPreferences {
            budget: Some(Budget::Low),
            preferred_season: Some(Season::Spring),
            likes: vec![Experience::CityLife],
            ..Default::default()
        });
        let derived: Vec<RuleId> = store
            .trace()
            .iter()
            .map(|e| e.rule)
            .filter(|r| r.tier() == Tier::Derived)
            .collect();
        let mut sorted = derived.clone();
        sorted.sort();
        assert_eq!(derived, sorted);
        assert_eq!(derived.last(), Some(&RuleId::FinalRecommendation));
    }

    #[test]
    fn primitive_rules_all_trace_before_derived() {
        let store = run(&UserPreferences {
            budget: Some(Budget::Medium),
            preferred_season: Some(Season::Autumn),
            likes: vec![Experience::Shopping, Experience::Adventure],
            safety_priority: Some(SafetyPriority::LowSafetyConcern),
            ..Default::default()
        });
        let first_derived = store
            .trace()
            .iter()
            .position(|e| e.rule.tier() == Tier::Derived)
            .unwrap();
        assert!(store.trace()[first_derived..]
            .iter()
            .all(|e| e.rule.tier() == Tier::Derived));
    }

    #[test]
    fn final_recommendation_follows_strongly_recommended_order() {
        let store = run(&UserPreferences {
            preferred_season: Some(Season::Spring),
            likes: Experience::ALL.to_vec(),
            ..Default::default()
        });
        assert_eq!(
            store.final_recommendation(),
            store.label_set(Label::StronglyRecommended).as_slice()
        );
        assert!(!store.final_recommendation().is_empty());
    }
}
