use super::super::domain::{RiskCategory, RiskFactor, Severity};
use super::catalog::CustomerHistory;
use super::random::RandomSource;

pub(crate) struct FrequencyAssessment {
    pub count: u32,
    pub risk: i32,
    pub factor: RiskFactor,
}

/// Scores how often the customer has returned before.
///
/// Customers missing from the history table get a simulated count in `[0, 3)`.
pub(crate) fn analyze_frequency(
    history: &dyn CustomerHistory,
    customer_id: &str,
    rng: &mut dyn RandomSource,
) -> FrequencyAssessment {
    let count = history
        .past_returns(customer_id)
        .unwrap_or_else(|| ((rng.next_f64() * 3.0).floor() as u32).min(2));

    let (risk, severity, label) = if count >= 5 {
        (
            22,
            Severity::High,
            format!("Serial returner detected — {count} past returns on file"),
        )
    } else if count >= 3 {
        (
            14,
            Severity::Medium,
            format!("Above-average return frequency — {count} past returns"),
        )
    } else if count >= 1 {
        (
            3,
            Severity::Low,
            format!("Normal return history — {count} past return(s)"),
        )
    } else {
        (
            -5,
            Severity::Low,
            "First-time return — no prior history".to_string(),
        )
    };

    let icon = if risk >= 14 { "🔁" } else { "📋" };

    FrequencyAssessment {
        count,
        risk,
        factor: RiskFactor::new(RiskCategory::Frequency, label, risk, severity, icon),
    }
}
