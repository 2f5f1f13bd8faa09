use std::collections::HashMap;
use std::sync::Arc;

/// Prior-return counts keyed by customer identifier.
pub trait CustomerHistory: Send + Sync {
    fn past_returns(&self, customer_id: &str) -> Option<u32>;
}

/// Substitute products offered when proposing an exchange.
pub trait ProductAlternatives: Send + Sync {
    fn alternatives(&self, product_name: &str) -> Option<Vec<String>>;
}

/// In-memory customer history table; identifiers compare case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticCustomerHistory {
    counts: HashMap<String, u32>,
}

impl StaticCustomerHistory {
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: AsRef<str>,
    {
        let counts = entries
            .into_iter()
            .map(|(customer, count)| (customer.as_ref().trim().to_lowercase(), count))
            .collect();
        Self { counts }
    }

    pub fn demo() -> Self {
        Self::new([
            ("sarah@example.com", 1),
            ("john@example.com", 4),
            ("emma@example.com", 0),
            ("mike@example.com", 6),
            ("lisa@example.com", 2),
            ("demo@returniq.com", 0),
            ("alex@example.com", 1),
            ("rachel@example.com", 5),
            ("tom@example.com", 0),
            ("nina@example.com", 3),
            ("dave@example.com", 1),
        ])
    }
}

impl CustomerHistory for StaticCustomerHistory {
    fn past_returns(&self, customer_id: &str) -> Option<u32> {
        self.counts.get(&customer_id.trim().to_lowercase()).copied()
    }
}

/// In-memory product alternatives table keyed by exact product name.
#[derive(Debug, Clone, Default)]
pub struct StaticProductAlternatives {
    entries: HashMap<String, Vec<String>>,
}

impl StaticProductAlternatives {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(product, alternatives)| {
                (
                    product.into(),
                    alternatives.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn demo() -> Self {
        Self::new([
            (
                "Premium Leather Jacket",
                vec![
                    "Premium Leather Jacket (different size)",
                    "Suede Bomber Jacket",
                    "Wool Overcoat",
                ],
            ),
            (
                "Wireless Noise-Cancelling Headphones",
                vec![
                    "Over-Ear Studio Headphones",
                    "Premium Earbuds Pro",
                    "Wireless Speaker",
                ],
            ),
            (
                "Organic Cotton T-Shirt",
                vec![
                    "Organic Cotton T-Shirt (different size)",
                    "Organic V-Neck Tee",
                    "Linen Blend Shirt",
                ],
            ),
            (
                "Smart Fitness Watch",
                vec!["Smart Fitness Watch v2", "Sport Band", "Health Tracker Ring"],
            ),
            (
                "Designer Sunglasses",
                vec![
                    "Designer Sunglasses (different style)",
                    "Polarized Aviators",
                    "Blue Light Glasses",
                ],
            ),
            (
                "Running Shoes Pro Max",
                vec![
                    "Running Shoes Pro Max (different size)",
                    "Trail Running Shoes",
                    "Walking Sneakers",
                ],
            ),
        ])
    }
}

impl ProductAlternatives for StaticProductAlternatives {
    fn alternatives(&self, product_name: &str) -> Option<Vec<String>> {
        self.entries.get(product_name).cloned()
    }
}

/// Read-only lookup collaborators handed to the engine at construction time.
#[derive(Clone)]
pub struct ScoringCatalog {
    pub history: Arc<dyn CustomerHistory>,
    pub alternatives: Arc<dyn ProductAlternatives>,
}

impl ScoringCatalog {
    pub fn new(
        history: Arc<dyn CustomerHistory>,
        alternatives: Arc<dyn ProductAlternatives>,
    ) -> Self {
        Self {
            history,
            alternatives,
        }
    }

    pub fn demo() -> Self {
        Self::new(
            Arc::new(StaticCustomerHistory::demo()),
            Arc::new(StaticProductAlternatives::demo()),
        )
    }

    pub fn empty() -> Self {
        Self::new(
            Arc::new(StaticCustomerHistory::default()),
            Arc::new(StaticProductAlternatives::default()),
        )
    }
}

impl Default for ScoringCatalog {
    fn default() -> Self {
        Self::demo()
    }
}

impl std::fmt::Debug for ScoringCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringCatalog").finish_non_exhaustive()
    }
}
