use std::sync::OnceLock;

use regex::Regex;

use super::super::domain::{
    DamageClassification, ReturnReasonCategory, RiskCategory, RiskFactor, Severity,
};
use super::random::RandomSource;

const DAMAGE_PATTERN: &str = r"(?i)broken|cracked|torn|ripped|scratched|dented|chipped|stain|hole";
const USED_PATTERN: &str = r"(?i)worn|used|dirty|smell|washed|faded|stretched";
const EXPECTED_CONDITION_ODDS: f64 = 0.70;
const USED_CONDITION_ODDS: f64 = 0.85;

struct ConditionPatterns {
    damage: Regex,
    used: Regex,
}

fn condition_patterns() -> &'static ConditionPatterns {
    static PATTERNS: OnceLock<ConditionPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ConditionPatterns {
        damage: Regex::new(DAMAGE_PATTERN).expect("damage keyword pattern"),
        used: Regex::new(USED_PATTERN).expect("wear keyword pattern"),
    })
}

/// What the classifier gets to look at for one return.
#[derive(Debug, Clone, Copy)]
pub struct ImageEvidence<'a> {
    pub has_image: bool,
    pub reason: ReturnReasonCategory,
    pub reason_text: &'a str,
}

/// Product-condition classifier; swap in a vision service behind this trait.
pub trait ImageClassifier: Send + Sync {
    fn classify(
        &self,
        evidence: &ImageEvidence<'_>,
        rng: &mut dyn RandomSource,
    ) -> DamageClassification;
}

/// Keyword heuristics backed by a weighted draw when the text is inconclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedImageClassifier;

impl SimulatedImageClassifier {
    /// Condition a genuine return for `reason` would usually show.
    pub const fn expected_condition(reason: ReturnReasonCategory) -> DamageClassification {
        match reason {
            ReturnReasonCategory::Damaged | ReturnReasonCategory::Defective => {
                DamageClassification::Damaged
            }
            ReturnReasonCategory::NotAsDescribed | ReturnReasonCategory::Other => {
                DamageClassification::Used
            }
            ReturnReasonCategory::WrongItem
            | ReturnReasonCategory::TooSmall
            | ReturnReasonCategory::TooLarge
            | ReturnReasonCategory::ChangedMind => DamageClassification::CorrectCondition,
        }
    }
}

impl ImageClassifier for SimulatedImageClassifier {
    fn classify(
        &self,
        evidence: &ImageEvidence<'_>,
        rng: &mut dyn RandomSource,
    ) -> DamageClassification {
        if !evidence.has_image {
            return DamageClassification::NoImage;
        }

        let patterns = condition_patterns();
        if patterns.damage.is_match(evidence.reason_text) {
            return DamageClassification::Damaged;
        }
        if patterns.used.is_match(evidence.reason_text) {
            return DamageClassification::Used;
        }

        let roll = rng.next_f64();
        if roll < EXPECTED_CONDITION_ODDS {
            Self::expected_condition(evidence.reason)
        } else if roll < USED_CONDITION_ODDS {
            DamageClassification::Used
        } else {
            DamageClassification::CorrectCondition
        }
    }
}

/// True when the detected condition contradicts the stated reason.
pub fn detect_mismatch(reason: ReturnReasonCategory, classification: DamageClassification) -> bool {
    (reason.claims_damage() && classification == DamageClassification::CorrectCondition)
        || (reason.is_preference() && classification == DamageClassification::Damaged)
}

pub(crate) struct DamageAssessment {
    pub classification: DamageClassification,
    pub mismatch: bool,
    pub risk: i32,
    pub factors: Vec<RiskFactor>,
}

pub(crate) fn assess_damage(
    classifier: &dyn ImageClassifier,
    evidence: &ImageEvidence<'_>,
    rng: &mut dyn RandomSource,
) -> DamageAssessment {
    let classification = if evidence.has_image {
        classifier.classify(evidence, rng)
    } else {
        DamageClassification::NoImage
    };

    if classification == DamageClassification::NoImage {
        return DamageAssessment {
            classification,
            mismatch: false,
            risk: 12,
            factors: vec![RiskFactor::new(
                RiskCategory::Image,
                "No product image uploaded — cannot verify condition",
                12,
                Severity::Medium,
                "📷",
            )],
        };
    }

    let mismatch = detect_mismatch(evidence.reason, classification);
    let mut factors = Vec::with_capacity(2);

    // Flat credit on agreement, whatever the classifier's certainty.
    let risk = if mismatch {
        factors.push(RiskFactor::new(
            RiskCategory::Mismatch,
            format!(
                "Reason–image conflict: claims \"{}\" but image shows \"{}\"",
                evidence.reason.phrase(),
                classification.phrase()
            ),
            20,
            Severity::High,
            "🔍",
        ));
        20
    } else {
        factors.push(RiskFactor::new(
            RiskCategory::Image,
            format!(
                "Image condition \"{}\" matches stated reason",
                classification.phrase()
            ),
            -5,
            Severity::Low,
            "✅",
        ));
        -5
    };

    let (detail, severity, icon) = match classification {
        DamageClassification::Damaged => (
            "Visible damage detected in product image (scratches, tears, dents)",
            Severity::High,
            "💥",
        ),
        DamageClassification::Used => (
            "Product appears previously used — signs of wear detected",
            Severity::Medium,
            "👟",
        ),
        _ => (
            "Product appears to be in original, unused condition",
            Severity::Low,
            "✨",
        ),
    };
    factors.push(RiskFactor::new(
        RiskCategory::Image,
        format!("Image AI: {detail}"),
        0,
        severity,
        icon,
    ));

    DamageAssessment {
        classification,
        mismatch,
        risk,
        factors,
    }
}
