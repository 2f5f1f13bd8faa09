use chrono::{DateTime, Duration, Utc};
use clap::Args;
use returniq::error::AppError;
use returniq::returns::{
    AnalysisResult, ReturnContext, ReturnReasonCategory, ScoringCatalog, ScoringConfig,
    ScoringEngine,
};
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Return reason category (damaged, defective, wrong_item, not_as_described,
    /// too_small, too_large, changed_mind, other)
    #[arg(long)]
    pub(crate) reason: ReturnReasonCategory,
    /// Customer's own explanation of the return
    #[arg(long)]
    pub(crate) text: String,
    /// Product price in rupees
    #[arg(long)]
    pub(crate) price: f64,
    /// Order date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) order_date: DateTime<Utc>,
    /// The customer attached a product photo
    #[arg(long)]
    pub(crate) image: bool,
    /// Customer identifier used for the return-history lookup
    #[arg(long, default_value = "demo@returniq.com")]
    pub(crate) customer: String,
    /// Product name used for exchange alternatives
    #[arg(long, default_value = "Unknown Product")]
    pub(crate) product: String,
    /// Seed the simulated collaborators for a reproducible verdict
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print the analysis as JSON instead of the report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed the simulated collaborators for a reproducible run
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Print one summary row per scenario and skip the full reports
    #[arg(long)]
    pub(crate) summary_only: bool,
}

#[derive(Debug, Serialize)]
struct ScenarioSummary {
    title: &'static str,
    fraud_score: u8,
    fraud_level: &'static str,
    recommended_action: &'static str,
    confidence: u8,
    refund_loss_prevented: f64,
}

impl ScenarioSummary {
    fn new(title: &'static str, analysis: &AnalysisResult) -> Self {
        Self {
            title,
            fraud_score: analysis.fraud_score,
            fraud_level: analysis.fraud_level.label(),
            recommended_action: analysis.recommended_action.label(),
            confidence: analysis.confidence,
            refund_loss_prevented: analysis.refund_loss_prevented,
        }
    }
}

fn cli_engine(seed: Option<u64>) -> ScoringEngine {
    let config = match seed {
        Some(seed) => ScoringConfig::seeded(seed),
        None => ScoringConfig {
            simulated_latency: None,
            ..ScoringConfig::default()
        },
    };
    ScoringEngine::new(config, ScoringCatalog::demo())
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        reason,
        text,
        price,
        order_date,
        image,
        customer,
        product,
        seed,
        json,
    } = args;

    let context = ReturnContext::new(reason, text, price, order_date, image, customer, product);
    let analysis = cli_engine(seed).evaluate(&context)?;

    if json {
        let rendered = serde_json::to_string_pretty(&analysis).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        println!("Return analysis: {} ({})", context.product_name, reason.label());
        println!("{}", analysis.reasoning);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = cli_engine(args.seed);
    let now = Utc::now();

    println!("ReturnIQ scoring demo");
    let mut summaries = Vec::new();
    for (title, context) in demo_scenarios(now) {
        let analysis = engine.evaluate(&context)?;
        if !args.summary_only {
            println!("\n{title}");
            println!(
                "- {} | {} | ₹{:.0} | ordered {} day(s) ago",
                context.customer_id,
                context.reason.label(),
                context.product_price,
                (now - context.order_date).num_days()
            );
            println!("{}", analysis.reasoning);
        }
        summaries.push(ScenarioSummary::new(title, &analysis));
    }

    println!("\nSummary");
    for summary in &summaries {
        println!(
            "- {}: {} | risk {} ({}/100) | confidence {}% | ₹{:.0} protected",
            summary.title,
            summary.recommended_action,
            summary.fraud_level,
            summary.fraud_score,
            summary.confidence,
            summary.refund_loss_prevented
        );
    }
    let protected: f64 = summaries
        .iter()
        .map(|summary| summary.refund_loss_prevented)
        .sum();
    println!("Total refund loss prevented: ₹{protected:.0}");

    if args.summary_only {
        let rendered = serde_json::to_string_pretty(&summaries).map_err(std::io::Error::from)?;
        println!("{rendered}");
    }
    Ok(())
}

fn demo_scenarios(now: DateTime<Utc>) -> Vec<(&'static str, ReturnContext)> {
    vec![
        (
            "Fit return from a first-time customer",
            ReturnContext::new(
                ReturnReasonCategory::TooSmall,
                "The jacket fits too tight across the shoulders, I would like a bigger one.",
                5999.0,
                now - Duration::days(10),
                false,
                "emma@example.com",
                "Premium Leather Jacket",
            ),
        ),
        (
            "Hostile change-of-mind from a serial returner",
            ReturnContext::new(
                ReturnReasonCategory::ChangedMind,
                "I want a refund immediately!! Product is totally fake. Will contact lawyer.",
                15999.0,
                now - Duration::days(10),
                false,
                "rachel@example.com",
                "Smart Fitness Watch",
            ),
        ),
        (
            "Documented transit damage",
            ReturnContext::new(
                ReturnReasonCategory::Damaged,
                "The lens arrived cracked, the box was crushed in delivery. Photo attached, thank you.",
                7999.0,
                now - Duration::days(5),
                true,
                "sarah@example.com",
                "Designer Sunglasses",
            ),
        ),
        (
            "Defect claim without a damage description",
            ReturnContext::new(
                ReturnReasonCategory::Defective,
                "Stopped syncing with my phone after a week of use.",
                12499.0,
                now - Duration::days(2),
                true,
                "nina@example.com",
                "Wireless Noise-Cancelling Headphones",
            ),
        ),
    ]
}
