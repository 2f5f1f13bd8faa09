use super::super::domain::{
    ExchangeSuggestion, RecommendedAction, ReturnReasonCategory, RiskFactor, Severity,
};

const REJECT_THRESHOLD: u8 = 70;
const EXCHANGE_THRESHOLD: u8 = 35;
const MISMATCH_OVERRIDE_CEILING: u8 = 60;
const FALLBACK_EXCHANGE_RETENTION: f64 = 0.65;

/// Starting score per reason; preference returns start highest.
pub const fn base_score(reason: ReturnReasonCategory) -> i32 {
    match reason {
        ReturnReasonCategory::Damaged => 12,
        ReturnReasonCategory::WrongItem => 8,
        ReturnReasonCategory::Defective => 10,
        ReturnReasonCategory::NotAsDescribed => 22,
        ReturnReasonCategory::TooSmall => 18,
        ReturnReasonCategory::TooLarge => 18,
        ReturnReasonCategory::ChangedMind => 35,
        ReturnReasonCategory::Other => 28,
    }
}

pub(crate) fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}

pub(crate) fn recommend_action(
    fraud_score: u8,
    reason: ReturnReasonCategory,
    mismatch: bool,
) -> RecommendedAction {
    let action = if fraud_score >= REJECT_THRESHOLD {
        RecommendedAction::Reject
    } else if fraud_score >= EXCHANGE_THRESHOLD || reason.is_preference() {
        RecommendedAction::SuggestExchange
    } else {
        RecommendedAction::ApproveRefund
    };

    if mismatch && fraud_score < MISMATCH_OVERRIDE_CEILING {
        RecommendedAction::SuggestExchange
    } else {
        action
    }
}

/// Rewards both evidence volume and distance from the undecided midpoint.
pub(crate) fn confidence(factors: &[RiskFactor], fraud_score: u8, jitter: u8) -> u8 {
    let high = factors
        .iter()
        .filter(|factor| factor.severity == Severity::High)
        .count() as f64;
    let decisiveness = (f64::from(fraud_score) - 50.0).abs() * 0.3;
    let raw = 72.0 + factors.len() as f64 * 2.0 + high * 3.0 + decisiveness + f64::from(jitter);
    raw.clamp(68.0, 98.0).round() as u8
}

pub(crate) fn refund_loss_prevented(
    action: RecommendedAction,
    suggestion: Option<&ExchangeSuggestion>,
    price: f64,
) -> f64 {
    match action {
        RecommendedAction::SuggestExchange => suggestion
            .map(|suggestion| suggestion.savings)
            .filter(|savings| *savings > 0.0)
            .unwrap_or_else(|| (price * FALLBACK_EXCHANGE_RETENTION).round()),
        RecommendedAction::Reject => price.round(),
        RecommendedAction::ApproveRefund => 0.0,
    }
}
