// crates/phishfuzz-core/src/score.rs
//
// Score Normalizer: rescale crisp risk and classify it into a verdict band.
//
// Crisp risk comes out of the engine on the 0-100 risk universe. The
// reported score is on 0-1 (three decimals); the percentage is that score
// times 100 (one decimal). Verdict thresholds apply to the 0-1 score.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::FeatureKey;

/// Scores strictly above this are suspicious.
pub const SUSPICIOUS_THRESHOLD: f64 = 0.6;
/// Scores strictly above this (and not suspicious) need review.
pub const REVIEW_THRESHOLD: f64 = 0.3;

/// Upper bound of the risk universe the engine defuzzifies over.
pub const RISK_SCALE: f64 = 100.0;

/// Discrete verdict band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelySafe,
    NeedsReview,
    Suspicious,
}

impl Verdict {
    /// Short label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::LikelySafe => "likely safe",
            Verdict::NeedsReview => "needs review",
            Verdict::Suspicious => "suspicious",
        }
    }

    /// Sentence shown to end users.
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::LikelySafe => "This URL appears to be safe.",
            Verdict::NeedsReview => "This URL may need further inspection.",
            Verdict::Suspicious => "This URL looks suspicious.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored and classified result for one Feature Record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Centroid on the 0-100 risk universe.
    pub crisp_risk: f64,
    /// `crisp_risk / 100`, rounded to three decimals.
    pub score: f64,
    /// `score * 100`, rounded to one decimal.
    pub percentage: f64,
    pub verdict: Verdict,
    /// Every feature the rule base read, unchanged.
    pub breakdown: BTreeMap<FeatureKey, f64>,
    /// Name of the rule base that produced the score.
    pub rule_base: String,
    pub fingerprint: String,
}

/// Round to `places` decimal places, halves away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Rescale crisp risk (0-100) to a 0-1 score with three decimals.
pub fn score(crisp_risk: f64) -> f64 {
    round_to(crisp_risk / RISK_SCALE, 3).clamp(0.0, 1.0)
}

/// 0-1 score as a percentage with one decimal.
pub fn percentage(score: f64) -> f64 {
    round_to(score * 100.0, 1)
}

/// Verdict band of a 0-1 score.
pub fn classify(score: f64) -> Verdict {
    if score > SUSPICIOUS_THRESHOLD {
        Verdict::Suspicious
    } else if score > REVIEW_THRESHOLD {
        Verdict::NeedsReview
    } else {
        Verdict::LikelySafe
    }
}

/// Assemble an Assessment from a crisp risk value.
pub fn assessment(
    crisp_risk: f64,
    breakdown: BTreeMap<FeatureKey, f64>,
    rule_base: &str,
    fingerprint: &str,
) -> Assessment {
    let score = score(crisp_risk);
    Assessment {
        crisp_risk,
        score,
        percentage: percentage(score),
        verdict: classify(score),
        breakdown,
        rule_base: rule_base.to_string(),
        fingerprint: fingerprint.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(classify(0.6), Verdict::NeedsReview);
        assert_eq!(classify(0.601), Verdict::Suspicious);
        assert_eq!(classify(0.3), Verdict::LikelySafe);
        assert_eq!(classify(0.301), Verdict::NeedsReview);
        assert_eq!(classify(0.0), Verdict::LikelySafe);
        assert_eq!(classify(1.0), Verdict::Suspicious);
    }

    #[test]
    fn score_rounds_to_three_places() {
        assert!((score(72.79090661584536) - 0.728).abs() < 1e-12);
        assert!((score(9.8321) - 0.098).abs() < 1e-12);
    }

    #[test]
    fn percentage_rounds_to_one_place() {
        assert!((percentage(0.728) - 72.8).abs() < 1e-9);
        assert!((percentage(0.0984) - 9.8).abs() < 1e-9);
    }

    #[test]
    fn assessment_carries_verdict_and_breakdown() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(FeatureKey::Dots, 6.0);
        let a = assessment(72.79, breakdown, "phishing-risk/v2", "abc");
        assert_eq!(a.verdict, Verdict::Suspicious);
        assert_eq!(a.breakdown[&FeatureKey::Dots], 6.0);
        assert_eq!(a.rule_base, "phishing-risk/v2");
    }

    #[test]
    fn verdict_serializes_snake_case() {
        let json = serde_json::to_string(&Verdict::NeedsReview).unwrap();
        assert_eq!(json, "\"needs_review\"");
        assert_eq!(Verdict::NeedsReview.to_string(), "needs review");
    }
}
