use std::sync::OnceLock;

use regex::Regex;

use super::super::domain::{RiskCategory, RiskFactor, Severity};

const NEGATIVE_PREFIX: &str = "⚠";
const POSITIVE_PREFIX: &str = "✓";
const BRIEF_REASON_CHARS: usize = 20;
const DETAILED_REASON_CHARS: usize = 100;
const NORMALIZATION_DIVISOR: f64 = 60.0;
const RISK_SCALE: f64 = 18.0;

/// Normalized reading of a free-text return reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReading {
    /// In `[-1, 1]`; negative means hostile.
    pub score: f64,
    pub tags: Vec<String>,
}

/// Text-to-sentiment seam; the keyword model is the default implementation.
pub trait SentimentModel: Send + Sync {
    fn read(&self, text: &str) -> SentimentReading;
}

/// Weighted pattern; negative weights push the reading towards hostile.
#[derive(Debug, Clone)]
pub struct SentimentRule {
    pub pattern: Regex,
    pub weight: i32,
    pub tag: String,
}

impl SentimentRule {
    pub fn new(pattern: &str, weight: i32, tag: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            weight,
            tag: tag.into(),
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

const STANDARD_RULES: &[(&str, i32, &str)] = &[
    (r"(?i)refund|money back|cash", -20, "demands refund"),
    (r"(?i)lawyer|legal|sue|complaint|report", -35, "legal threats"),
    (r"(?i)scam|fake|fraud|cheat|lie|steal", -30, "accusatory language"),
    (r"(?i)urgent|immediately|asap|right now", -15, "urgency pressure"),
    (r"(?i)worst|terrible|horrible|disgusting|garbage", -20, "extreme negativity"),
    (r"(?i)never (again|buying|ordering)", -10, "threat to leave"),
    (r"!{2,}", -10, "excessive exclamation"),
    (r"(?i)ALL CAPS|[A-Z]{5,}", -8, "aggressive capitalization"),
    (r"(?i)broken|cracked|torn|ripped|scratched|dented", 20, "specific damage details"),
    (r"(?i)photo|picture|image|attached|see|showing", 10, "references evidence"),
    (r"(?i)packaging|box|shipping|delivery", 8, "shipping concern"),
    (r"(?i)wrong (size|color|model|variant|shade)", 15, "specific mismatch"),
    (r"(?i)please|thank|appreciate|sorry|unfortunately", 12, "polite tone"),
    (r"(?i)tried|tested|checked|attempted|noticed", 10, "describes troubleshooting"),
    (r"(?i)receipt|invoice|order number|packaging slip", 8, "references documentation"),
];

fn standard_rules() -> &'static [SentimentRule] {
    static RULES: OnceLock<Vec<SentimentRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        STANDARD_RULES
            .iter()
            .map(|(pattern, weight, tag)| {
                SentimentRule::new(pattern, *weight, *tag).expect("standard sentiment pattern")
            })
            .collect()
    })
}

/// Rule-table sentiment scoring over the return reason text.
#[derive(Debug, Clone)]
pub struct KeywordSentimentModel {
    rules: Vec<SentimentRule>,
}

impl KeywordSentimentModel {
    pub fn new(rules: Vec<SentimentRule>) -> Self {
        Self { rules }
    }

    /// The built-in table, compiled once per process.
    pub fn standard() -> Self {
        Self::new(standard_rules().to_vec())
    }

    pub fn rules(&self) -> &[SentimentRule] {
        &self.rules
    }
}

impl Default for KeywordSentimentModel {
    fn default() -> Self {
        Self::standard()
    }
}

impl SentimentModel for KeywordSentimentModel {
    fn read(&self, text: &str) -> SentimentReading {
        let mut raw = 0;
        let mut tags = Vec::new();

        // Negative rules report first so hostile tags lead the label.
        let ordered = self
            .rules
            .iter()
            .filter(|rule| rule.weight < 0)
            .chain(self.rules.iter().filter(|rule| rule.weight >= 0));

        for rule in ordered {
            if rule.matches(text) {
                raw += rule.weight;
                let prefix = if rule.weight < 0 {
                    NEGATIVE_PREFIX
                } else {
                    POSITIVE_PREFIX
                };
                tags.push(format!("{prefix} {}", rule.tag));
            }
        }

        let length = text.chars().count();
        if length < BRIEF_REASON_CHARS {
            raw -= 12;
            tags.push(format!("{NEGATIVE_PREFIX} suspiciously brief reason"));
        } else if length > DETAILED_REASON_CHARS {
            raw += 5;
        }

        SentimentReading {
            score: (f64::from(raw) / NORMALIZATION_DIVISOR).clamp(-1.0, 1.0),
            tags,
        }
    }
}

pub(crate) struct SentimentAssessment {
    pub score: f64,
    pub risk: i32,
    pub tags: Vec<String>,
    pub factor: RiskFactor,
}

/// Only negative readings add risk; positive ones contribute zero.
pub(crate) fn risk_from_score(score: f64) -> i32 {
    ((-score * RISK_SCALE).round() as i32).max(0)
}

pub(crate) fn analyze_sentiment(model: &dyn SentimentModel, text: &str) -> SentimentAssessment {
    let SentimentReading { score, tags } = model.read(text);
    let score = score.clamp(-1.0, 1.0);
    let risk = risk_from_score(score);

    let (severity, label, icon) = if score < -0.4 {
        let hostile: Vec<&str> = tags
            .iter()
            .filter(|tag| tag.starts_with(NEGATIVE_PREFIX))
            .map(String::as_str)
            .collect();
        (
            Severity::High,
            format!("Hostile sentiment detected ({})", hostile.join(", ")),
            "😤",
        )
    } else if score < 0.0 {
        let leading: Vec<&str> = tags.iter().take(2).map(String::as_str).collect();
        (
            Severity::Medium,
            format!("Mildly negative tone ({})", leading.join(", ")),
            "😐",
        )
    } else {
        (
            Severity::Low,
            "Neutral/positive tone — customer appears genuine".to_string(),
            "😊",
        )
    };

    SentimentAssessment {
        score,
        risk,
        tags,
        factor: RiskFactor::new(RiskCategory::Sentiment, label, risk, severity, icon),
    }
}
