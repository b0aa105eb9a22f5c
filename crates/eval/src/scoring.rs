//! Destination scoring and ranking.

use serde::Serialize;

use compass_core::Destination;

use crate::evidence::EvidenceStore;
use crate::trace::Label;

pub const EVIDENCE_WEIGHT: i64 = 2;
pub const SEASON_WEIGHT: i64 = 1;
pub const STRONG_WEIGHT: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationScore {
    pub destination: Destination,
    pub score: i64,
}

fn indicator(store: &EvidenceStore, label: Label, destination: &Destination) -> i64 {
    i64::from(store.has_label(label, destination))
}

/// Net score of one destination.
///
/// Each piece of evidence counts two points, season fit one point and the
/// strong labels three points, positive or negative.
pub fn score(store: &EvidenceStore, destination: &Destination) -> i64 {
    let recommended = store.recommended(destination).len() as i64;
    let not_recommended = store.not_recommended(destination).len() as i64;

    EVIDENCE_WEIGHT * (recommended - not_recommended)
        + SEASON_WEIGHT
            * (indicator(store, Label::SeasonMatched, destination)
                - indicator(store, Label::WeakRecommendation, destination))
        + STRONG_WEIGHT
            * (indicator(store, Label::StronglyRecommended, destination)
                - indicator(store, Label::StronglyNotRecommended, destination))
}

/// Scores for every destination, in declaration order.
pub fn scores(store: &EvidenceStore) -> Vec<DestinationScore> {
    store
        .destinations()
        .iter()
        .map(|d| DestinationScore {
            destination: d.clone(),
            score: score(store, d),
        })
        .collect()
}

/// Scores sorted best first. Equal scores keep declaration order.
pub fn rank(store: &EvidenceStore) -> Vec<DestinationScore> {
    let mut ranked = scores(store);
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Conclusion;
    use compass_core::RuleId;

    fn d(name: &str) -> Destination {
        Destination::from(name)
    }

    fn store() -> EvidenceStore {
        EvidenceStore::new(&[d("Switzerland"), d("Italy"), d("Japan")])
    }

    #[test]
    fn empty_store_scores_zero() {
        let s = store();
        assert!(scores(&s).iter().all(|ds| ds.score == 0));
    }

    #[test]
    fn each_evidence_moves_score_by_two() {
        let mut s = store();
        let italy = d("Italy");
        s.apply(RuleId::CultureHistory, Conclusion::Recommended, Some(&italy));
        assert_eq!(score(&s, &italy), 2);
        s.apply(RuleId::Shopping, Conclusion::Recommended, Some(&italy));
        assert_eq!(score(&s, &italy), 4);
        s.apply(
            RuleId::LowTrafficAvoidHigh,
            Conclusion::NotRecommended,
            Some(&italy),
        );
        assert_eq!(score(&s, &italy), 2);
        // A duplicate does not count twice.
        s.apply(RuleId::Shopping, Conclusion::Recommended, Some(&italy));
        assert_eq!(score(&s, &italy), 2);
    }

    #[test]
    fn labels_are_weighted() {
        let mut s = store();
        let japan = d("Japan");
        s.apply(RuleId::Adventure, Conclusion::Recommended, Some(&japan));
        s.apply(
            RuleId::SeasonMatch,
            Conclusion::Label(Label::SeasonMatched),
            Some(&japan),
        );
        s.apply(
            RuleId::StrongRecommendation,
            Conclusion::Label(Label::StronglyRecommended),
            Some(&japan),
        );
        assert_eq!(score(&s, &japan), 2 + 1 + 3);

        let swiss = d("Switzerland");
        s.apply(
            RuleId::BudgetLowAvoidExpensive,
            Conclusion::NotRecommended,
            Some(&swiss),
        );
        s.apply(
            RuleId::SeasonWeak,
            Conclusion::Label(Label::WeakRecommendation),
            Some(&swiss),
        );
        s.apply(
            RuleId::StrongNotRecommendation,
            Conclusion::Label(Label::StronglyNotRecommended),
            Some(&swiss),
        );
        assert_eq!(score(&s, &swiss), -2 - 1 - 3);
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let mut s = store();
        let japan = d("Japan");
        s.apply(RuleId::Adventure, Conclusion::Recommended, Some(&japan));

        let order: Vec<String> = rank(&s)
            .into_iter()
            .map(|ds| ds.destination.to_string())
            .collect();
        assert_eq!(order, vec!["Japan", "Switzerland", "Italy"]);
    }

    #[test]
    fn scores_follow_declaration_order() {
        let s = store();
        let scored = scores(&s);
        let names: Vec<&str> = scored.iter().map(|ds| ds.destination.as_str()).collect();
        assert_eq!(names, vec!["Switzerland", "Italy", "Japan"]);
    }
}
