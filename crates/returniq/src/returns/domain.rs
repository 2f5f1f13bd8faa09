use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::scoring::ScoringError;

/// Reason a customer selects when opening a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnReasonCategory {
    Damaged,
    Defective,
    WrongItem,
    NotAsDescribed,
    TooSmall,
    TooLarge,
    ChangedMind,
    Other,
}

impl ReturnReasonCategory {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Damaged,
            Self::WrongItem,
            Self::NotAsDescribed,
            Self::Defective,
            Self::TooSmall,
            Self::TooLarge,
            Self::ChangedMind,
            Self::Other,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Damaged => "damaged",
            Self::Defective => "defective",
            Self::WrongItem => "wrong_item",
            Self::NotAsDescribed => "not_as_described",
            Self::TooSmall => "too_small",
            Self::TooLarge => "too_large",
            Self::ChangedMind => "changed_mind",
            Self::Other => "other",
        }
    }

    /// Customer-facing wording shown in the return form.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Damaged => "Product arrived damaged",
            Self::Defective => "Product is defective",
            Self::WrongItem => "Received wrong item",
            Self::NotAsDescribed => "Not as described",
            Self::TooSmall => "Too small / doesn't fit",
            Self::TooLarge => "Too large / doesn't fit",
            Self::ChangedMind => "Changed my mind",
            Self::Other => "Other reason",
        }
    }

    /// Lowercase phrase used inside report sentences ("changed mind").
    pub fn phrase(self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Reasons asserting the item itself is faulty.
    pub const fn claims_damage(self) -> bool {
        matches!(self, Self::Damaged | Self::Defective)
    }

    /// Fit and preference reasons where the item should come back untouched.
    pub const fn is_preference(self) -> bool {
        matches!(self, Self::ChangedMind | Self::TooSmall | Self::TooLarge)
    }
}

impl fmt::Display for ReturnReasonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnReasonCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ordered()
            .into_iter()
            .find(|reason| reason.as_str() == normalized)
            .ok_or_else(|| format!("unknown return reason '{value}'"))
    }
}

/// Attributes of a single return request handed to the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnContext {
    pub reason: ReturnReasonCategory,
    #[serde(default)]
    pub reason_text: String,
    pub product_price: f64,
    pub order_date: DateTime<Utc>,
    #[serde(default)]
    pub has_image: bool,
    pub customer_id: String,
    pub product_name: String,
}

impl ReturnContext {
    pub fn new(
        reason: ReturnReasonCategory,
        reason_text: impl Into<String>,
        product_price: f64,
        order_date: DateTime<Utc>,
        has_image: bool,
        customer_id: impl Into<String>,
        product_name: impl Into<String>,
    ) -> Self {
        Self {
            reason,
            reason_text: reason_text.into(),
            product_price,
            order_date,
            has_image,
            customer_id: customer_id.into(),
            product_name: product_name.into(),
        }
    }

    /// Checks the inputs the engine cannot score.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ScoringError> {
        if !self.product_price.is_finite() {
            return Err(ScoringError::invalid(
                "product_price",
                "price must be a finite number",
            ));
        }
        if self.product_price < 0.0 {
            return Err(ScoringError::invalid(
                "product_price",
                format!("price {} must not be negative", self.product_price),
            ));
        }
        if self.order_date > now {
            return Err(ScoringError::invalid(
                "order_date",
                format!("order date {} is in the future", self.order_date),
            ));
        }
        if self.customer_id.trim().is_empty() {
            return Err(ScoringError::invalid(
                "customer_id",
                "customer identifier must not be empty",
            ));
        }
        Ok(())
    }
}

/// Return request as posted by the storefront.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSubmission {
    pub order_id: Option<String>,
    pub customer_email: Option<String>,
    pub product_name: Option<String>,
    pub product_price: Option<f64>,
    pub return_reason: Option<String>,
    pub return_reason_category: Option<ReturnReasonCategory>,
    pub order_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub brand_id: Option<String>,
    #[serde(default)]
    pub is_video: bool,
}

impl ReturnSubmission {
    /// Name of the first required field that is absent or blank.
    pub fn missing_field(&self) -> Option<&'static str> {
        fn blank(value: &Option<String>) -> bool {
            value.as_deref().map_or(true, |value| value.trim().is_empty())
        }

        if blank(&self.order_id) {
            Some("order_id")
        } else if blank(&self.customer_email) {
            Some("customer_email")
        } else if blank(&self.return_reason) {
            Some("return_reason")
        } else if self.return_reason_category.is_none() {
            Some("return_reason_category")
        } else {
            None
        }
    }

    /// Fill storefront defaults: unknown product, zero price, ordered `now`.
    pub fn to_context(&self, now: DateTime<Utc>) -> Option<ReturnContext> {
        if self.missing_field().is_some() {
            return None;
        }

        Some(ReturnContext {
            reason: self.return_reason_category?,
            reason_text: self.return_reason.clone().unwrap_or_default(),
            product_price: self.product_price.unwrap_or(0.0),
            order_date: self.order_date.unwrap_or(now),
            has_image: self
                .image_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty()),
            customer_id: self.customer_email.clone().unwrap_or_default(),
            product_name: self
                .product_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Unknown Product".to_string()),
        })
    }
}

/// Signal family a risk factor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Frequency,
    Sentiment,
    Image,
    Mismatch,
    Value,
    Timing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn marker(self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
        }
    }
}

/// One scored, labelled signal contributing to the fraud score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: RiskCategory,
    pub label: String,
    pub score: i32,
    pub severity: Severity,
    pub icon: String,
}

impl RiskFactor {
    pub fn new(
        category: RiskCategory,
        label: impl Into<String>,
        score: i32,
        severity: Severity,
        icon: &str,
    ) -> Self {
        Self {
            category,
            label: label.into(),
            score,
            severity,
            icon: icon.to_string(),
        }
    }
}

/// Detected condition of the returned product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageClassification {
    Damaged,
    Used,
    CorrectCondition,
    NoImage,
}

impl DamageClassification {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Damaged => "damaged",
            Self::Used => "used",
            Self::CorrectCondition => "correct_condition",
            Self::NoImage => "no_image",
        }
    }

    pub fn phrase(self) -> String {
        self.as_str().replace('_', " ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudLevel {
    Low,
    Medium,
    High,
}

impl FraudLevel {
    pub const fn from_score(score: u8) -> Self {
        if score <= 30 {
            Self::Low
        } else if score <= 60 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendedAction {
    #[serde(rename = "Approve Refund")]
    ApproveRefund,
    #[serde(rename = "Suggest Exchange")]
    SuggestExchange,
    #[serde(rename = "Reject")]
    Reject,
}

impl RecommendedAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApproveRefund => "Approve Refund",
            Self::SuggestExchange => "Suggest Exchange",
            Self::Reject => "Reject",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeKind {
    SizeReplacement,
    ProductSwap,
    StoreCredit,
}

/// Alternative resolution offered instead of a cash refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSuggestion {
    #[serde(rename = "type")]
    pub kind: ExchangeKind,
    pub title: String,
    pub description: String,
    pub savings: f64,
}

/// Engine output for one return request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub fraud_score: u8,
    pub fraud_level: FraudLevel,
    pub recommended_action: RecommendedAction,
    pub confidence: u8,
    pub reasoning: String,
    pub damage_classification: DamageClassification,
    pub sentiment_score: f64,
    pub reason_image_mismatch: bool,
    pub past_return_count: u32,
    pub exchange_suggestion: Option<ExchangeSuggestion>,
    pub refund_loss_prevented: f64,
    pub risk_factors: Vec<RiskFactor>,
}
