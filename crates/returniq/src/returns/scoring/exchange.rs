use super::super::domain::{ExchangeKind, ExchangeSuggestion, ReturnReasonCategory};
use super::catalog::ProductAlternatives;

/// Share of the price retained by each resolution.
const SIZE_REPLACEMENT_RETENTION: f64 = 0.85;
const PRODUCT_SWAP_RETENTION: f64 = 0.70;
const REPLACEMENT_UNIT_RETENTION: f64 = 0.60;
const STORE_CREDIT_RETENTION: f64 = 0.50;

/// Every return gets an offer; a zero price yields zero savings.
pub(crate) fn suggest_exchange(
    catalog: &dyn ProductAlternatives,
    reason: ReturnReasonCategory,
    product_name: &str,
    price: f64,
) -> ExchangeSuggestion {
    let alternatives = catalog
        .alternatives(product_name)
        .filter(|alternatives| !alternatives.is_empty())
        .unwrap_or_else(|| {
            vec![
                format!("{product_name} (different variant)"),
                "Store Credit".to_string(),
            ]
        });
    let first = alternatives[0].as_str();
    let second = alternatives.get(1).map(String::as_str).unwrap_or(first);

    match reason {
        ReturnReasonCategory::TooSmall | ReturnReasonCategory::TooLarge => ExchangeSuggestion {
            kind: ExchangeKind::SizeReplacement,
            title: format!("Size Replacement: {first}"),
            description: "Replace with the correct size at no extra cost. Customer keeps their preferred product, brand retains the sale.".to_string(),
            savings: (price * SIZE_REPLACEMENT_RETENTION).round(),
        },
        ReturnReasonCategory::ChangedMind | ReturnReasonCategory::NotAsDescribed => {
            ExchangeSuggestion {
                kind: ExchangeKind::ProductSwap,
                title: format!("Product Swap: {second}"),
                description: "Offer a similar alternative product. Keeps the customer engaged and prevents full refund loss.".to_string(),
                savings: (price * PRODUCT_SWAP_RETENTION).round(),
            }
        }
        ReturnReasonCategory::Damaged | ReturnReasonCategory::Defective => ExchangeSuggestion {
            kind: ExchangeKind::ProductSwap,
            title: "Replacement: Same product (new unit)".to_string(),
            description: "Ship a replacement unit. Customer gets a working product, brand avoids cash refund.".to_string(),
            savings: (price * REPLACEMENT_UNIT_RETENTION).round(),
        },
        ReturnReasonCategory::WrongItem | ReturnReasonCategory::Other => ExchangeSuggestion {
            kind: ExchangeKind::StoreCredit,
            title: "Store Credit Offer".to_string(),
            description: format!(
                "Offer store credit worth ₹{price:.0} + 10% bonus. Retains customer lifetime value."
            ),
            savings: (price * STORE_CREDIT_RETENTION).round(),
        },
    }
}
