use super::super::domain::{
    DamageClassification, ExchangeSuggestion, FraudLevel, RecommendedAction, RiskFactor,
};

pub(crate) struct ReportInput<'a> {
    pub factors: &'a [RiskFactor],
    pub sentiment_score: f64,
    pub sentiment_tags: &'a [String],
    pub classification: DamageClassification,
    pub mismatch: bool,
    pub past_returns: u32,
    pub suggestion: Option<&'a ExchangeSuggestion>,
    pub action: RecommendedAction,
    pub level: FraudLevel,
    pub fraud_score: u8,
    pub confidence: u8,
    pub refund_loss_prevented: f64,
}

fn sentiment_label(score: f64) -> &'static str {
    if score > 0.0 {
        "Positive"
    } else if score > -0.3 {
        "Neutral"
    } else {
        "Negative"
    }
}

/// Human-readable transcript ending in the verdict line.
pub(crate) fn render(input: &ReportInput<'_>) -> String {
    let mut lines = vec![
        "═══ AI FRAUD INTELLIGENCE REPORT ═══".to_string(),
        String::new(),
        "📊 RISK FACTOR BREAKDOWN:".to_string(),
    ];

    for factor in input.factors {
        lines.push(format!(
            "  {} {} {} [{:+}]",
            factor.severity.marker(),
            factor.icon,
            factor.label,
            factor.score
        ));
    }
    lines.push(String::new());

    lines.push(format!(
        "🧠 SENTIMENT ANALYSIS: {} (score: {:.2})",
        sentiment_label(input.sentiment_score),
        input.sentiment_score
    ));
    if !input.sentiment_tags.is_empty() {
        lines.push(format!("   Signals: {}", input.sentiment_tags.join(", ")));
    }

    lines.push(format!(
        "🖼️ IMAGE CLASSIFICATION: {}",
        input.classification.phrase().to_uppercase()
    ));
    if input.mismatch {
        lines.push(
            "   ⚠️ MISMATCH: Stated reason does not match detected image condition".to_string(),
        );
    }

    lines.push(format!(
        "📈 RETURN HISTORY: {} previous returns by this customer",
        input.past_returns
    ));
    lines.push(String::new());

    if let Some(suggestion) = input.suggestion {
        if input.action != RecommendedAction::ApproveRefund {
            lines.push("💡 EXCHANGE RECOMMENDATION:".to_string());
            lines.push(format!("   {}", suggestion.title));
            lines.push(format!("   {}", suggestion.description));
            lines.push(format!("   Estimated savings: ₹{:.0}", suggestion.savings));
            lines.push(String::new());
        }
    }

    lines.push("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".to_string());
    lines.push(format!(
        "VERDICT: {} | Risk: {} ({}/100) | Confidence: {}%",
        input.action.label().to_uppercase(),
        input.level.label(),
        input.fraud_score,
        input.confidence
    ));
    if input.refund_loss_prevented > 0.0 {
        lines.push(format!(
            "💰 Potential refund loss prevented: ₹{:.0}",
            input.refund_loss_prevented
        ));
    }

    lines.join("\n")
}
