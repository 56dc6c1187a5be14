use std::collections::HashMap;

use recipe::{normalize_unit, IngredientKey};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round a money amount to the nearest cent, half away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Price-table entry for one ingredient, expressed in base units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// Price per base unit (per g, per ml, or per item).
    pub unit_price: Decimal,
    /// Purchase granularity in base units; demand is bought in whole
    /// multiples of this when the metrics compare shopping scenarios.
    pub pack_size: f64,
}

/// Per-ingredient unit prices, owned elsewhere; read-only to the engine.
pub trait IngredientPriceTable: Send + Sync {
    fn price(&self, key: &IngredientKey) -> Option<PricePoint>;
}

/// One row of a price fixture, in whatever unit the source quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEntry {
    pub name: String,
    /// Unit the quote is per ("lb", "l", "item", ...).
    pub unit: String,
    pub unit_price: Decimal,
    /// Purchase pack size in `unit`. Defaults to one.
    #[serde(default = "default_pack_size")]
    pub pack_size: f64,
}

fn default_pack_size() -> f64 {
    1.0
}

/// Price table backed by a map, loaded from a JSON fixture by the CLI.
///
/// Quotes are converted to base units on load: a price per lb becomes a
/// price per gram, and the pack size becomes grams per pack.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPriceTable {
    prices: HashMap<IngredientKey, PricePoint>,
}

impl InMemoryPriceTable {
    pub fn from_entries(entries: Vec<PriceEntry>) -> Self {
        let mut prices = HashMap::new();
        for entry in entries {
            let normalized = normalize_unit(&entry.unit, 1.0);
            let factor = normalized.quantity; // base units per quoted unit
            let key = IngredientKey {
                name: entry.name.trim().to_lowercase(),
                class: normalized.class,
            };
            let unit_price = if factor > 0.0 {
                entry.unit_price / Decimal::from_f64(factor).unwrap_or(Decimal::ONE)
            } else {
                entry.unit_price
            };
            prices.insert(
                key,
                PricePoint {
                    unit_price,
                    pack_size: (entry.pack_size * factor).max(1.0),
                },
            );
        }
        Self { prices }
    }
}

impl IngredientPriceTable for InMemoryPriceTable {
    fn price(&self, key: &IngredientKey) -> Option<PricePoint> {
        self.prices.get(key).copied()
    }
}
