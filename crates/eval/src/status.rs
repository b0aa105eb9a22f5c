//! Status badges shown next to each destination in reports.

use std::fmt;

use serde::{Serialize, Serializer};

use compass_core::Destination;

use crate::evidence::EvidenceStore;
use crate::trace::Label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusLabel {
    StronglyRecommended,
    Recommended,
    StronglyNotRecommended,
    HasWarnings,
    Neutral,
    ContradictingRules,
    NoStrongEvidence,
}

impl StatusLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusLabel::StronglyRecommended => "STRONGLY RECOMMENDED",
            StatusLabel::Recommended => "RECOMMENDED",
            StatusLabel::StronglyNotRecommended => "STRONGLY NOT RECOMMENDED",
            StatusLabel::HasWarnings => "HAS WARNINGS",
            StatusLabel::Neutral => "NEUTRAL",
            StatusLabel::ContradictingRules => "CONTRADICTING RULES",
            StatusLabel::NoStrongEvidence => "NO STRONG EVIDENCE",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Badges for one destination, positive first.
pub fn status_labels(store: &EvidenceStore, destination: &Destination) -> Vec<StatusLabel> {
    let mut labels = Vec::new();

    if store.has_label(Label::StronglyRecommended, destination) {
        labels.push(StatusLabel::StronglyRecommended);
    } else if !store.recommended(destination).is_empty() {
        labels.push(StatusLabel::Recommended);
    }

    if store.has_label(Label::StronglyNotRecommended, destination) {
        labels.push(StatusLabel::StronglyNotRecommended);
    } else if !store.not_recommended(destination).is_empty() {
        labels.push(StatusLabel::HasWarnings);
    }

    if store.has_label(Label::Neutral, destination) {
        labels.push(StatusLabel::Neutral);
    }
    if store.has_label(Label::Contradiction, destination) {
        labels.push(StatusLabel::ContradictingRules);
    }

    if labels.is_empty() {
        labels.push(StatusLabel::NoStrongEvidence);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Conclusion;
    use compass_core::RuleId;

    #[test]
    fn empty_evidence_has_no_strong_evidence() {
        let d = Destination::from("Turkey");
        let s = EvidenceStore::new(&[d.clone()]);
        assert_eq!(status_labels(&s, &d), vec![StatusLabel::NoStrongEvidence]);
    }

    #[test]
    fn neutral_only() {
        let d = Destination::from("Turkey");
        let mut s = EvidenceStore::new(&[d.clone()]);
        s.apply(
            RuleId::NeutralDefault,
            Conclusion::Label(Label::Neutral),
            Some(&d),
        );
        assert_eq!(status_labels(&s, &d), vec![StatusLabel::Neutral]);
    }

    #[test]
    fn mixed_evidence_is_recommended_with_warnings() {
        let d = Destination::from("Japan");
        let mut s = EvidenceStore::new(&[d.clone()]);
        s.apply(RuleId::CityLife, Conclusion::Recommended, Some(&d));
        s.apply(
            RuleId::BudgetLowAvoidExpensive,
            Conclusion::NotRecommended,
            Some(&d),
        );
        s.apply(
            RuleId::ContradictionDetection,
            Conclusion::Label(Label::Contradiction),
            Some(&d),
        );
        assert_eq!(
            status_labels(&s, &d),
            vec![
                StatusLabel::Recommended,
                StatusLabel::HasWarnings,
                StatusLabel::ContradictingRules
            ]
        );
    }

    #[test]
    fn strong_labels_replace_plain_ones() {
        let d = Destination::from("Japan");
        let mut s = EvidenceStore::new(&[d.clone()]);
        s.apply(RuleId::CityLife, Conclusion::Recommended, Some(&d));
        s.apply(
            RuleId::StrongRecommendation,
            Conclusion::Label(Label::StronglyRecommended),
            Some(&d),
        );
        assert_eq!(
            status_labels(&s, &d),
            vec![StatusLabel::StronglyRecommended]
        );
        assert_eq!(StatusLabel::StronglyRecommended.to_string(), "STRONGLY RECOMMENDED");
    }
}
