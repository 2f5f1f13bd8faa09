//! Single-input value and timing checks.

use chrono::{DateTime, Utc};

use super::super::domain::{RiskCategory, RiskFactor, Severity};

pub(crate) fn assess_value(price: f64) -> RiskFactor {
    if price > 15_000.0 {
        RiskFactor::new(
            RiskCategory::Value,
            format!("Premium item (₹{price:.0}) — high refund exposure"),
            18,
            Severity::High,
            "💎",
        )
    } else if price > 5_000.0 {
        RiskFactor::new(
            RiskCategory::Value,
            format!("Mid-range item (₹{price:.0})"),
            8,
            Severity::Medium,
            "💰",
        )
    } else {
        RiskFactor::new(
            RiskCategory::Value,
            format!("Budget item (₹{price:.0}) — low refund risk"),
            -3,
            Severity::Low,
            "🏷️",
        )
    }
}

/// Whole days elapsed between the order and the evaluation instant.
pub(crate) fn days_since_order(order_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(order_date).num_days()
}

pub(crate) fn assess_timing(order_date: DateTime<Utc>, now: DateTime<Utc>) -> RiskFactor {
    let days = days_since_order(order_date, now);
    if days <= 1 {
        RiskFactor::new(
            RiskCategory::Timing,
            "Instant return — request within 24hrs of delivery",
            20,
            Severity::High,
            "⚡",
        )
    } else if days <= 3 {
        RiskFactor::new(
            RiskCategory::Timing,
            format!("Very fast return — {days} days after delivery"),
            12,
            Severity::Medium,
            "🕐",
        )
    } else if days > 30 {
        RiskFactor::new(
            RiskCategory::Timing,
            format!("Late return — {days} days after delivery (outside window)"),
            15,
            Severity::High,
            "📅",
        )
    } else {
        RiskFactor::new(
            RiskCategory::Timing,
            format!("Normal return window — {days} days after delivery"),
            -2,
            Severity::Low,
            "📆",
        )
    }
}
