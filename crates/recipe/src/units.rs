use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical unit class an ingredient quantity normalizes into.
///
/// Base units: ml for volume, g for mass, item for counts. Units outside
/// the conversion table keep their raw spelling in `Other` and only ever
/// aggregate with identical spellings; the consolidator flags those lines
/// `unit_mismatch` instead of conflating them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    Volume,
    Mass,
    Count,
    Other(String),
}

impl UnitClass {
    /// The unit all quantities of this class are expressed in.
    pub fn base_unit(&self) -> &str {
        match self {
            UnitClass::Volume => "ml",
            UnitClass::Mass => "g",
            UnitClass::Count => "item",
            UnitClass::Other(unit) => unit.as_str(),
        }
    }

    /// Whether quantities of this class went through the conversion table.
    pub fn is_convertible(&self) -> bool {
        !matches!(self, UnitClass::Other(_))
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_unit())
    }
}

/// A quantity converted to its class's base unit.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuantity {
    pub class: UnitClass,
    pub quantity: f64,
}

/// Normalize a unit spelling and convert the quantity to the base unit.
///
/// Conversion table:
/// - volume -> ml: cup=240, tbsp=15, tsp=5, l=1000, fl oz=29.57
/// - mass -> g: kg=1000, oz=28.35, lb=453.59
/// - counts -> item: whole/piece/clove/can/bunch/empty
///
/// Normalizing an already-normalized quantity is the identity (ml -> ml,
/// g -> g, item -> item with factor 1).
pub fn normalize_unit(unit: &str, quantity: f64) -> NormalizedQuantity {
    let unit = unit.trim().to_lowercase();

    let (class, factor) = match unit.as_str() {
        // Volume units -> ml
        "cup" | "cups" => (UnitClass::Volume, 240.0),
        "tbsp" | "tablespoon" | "tablespoons" => (UnitClass::Volume, 15.0),
        "tsp" | "teaspoon" | "teaspoons" => (UnitClass::Volume, 5.0),
        "ml" | "milliliter" | "milliliters" => (UnitClass::Volume, 1.0),
        "l" | "liter" | "liters" => (UnitClass::Volume, 1000.0),
        "fl oz" | "fluid ounce" | "fluid ounces" => (UnitClass::Volume, 29.57),

        // Mass units -> g
        "g" | "gram" | "grams" => (UnitClass::Mass, 1.0),
        "kg" | "kilogram" | "kilograms" => (UnitClass::Mass, 1000.0),
        "oz" | "ounce" | "ounces" => (UnitClass::Mass, 28.35),
        "lb" | "lbs" | "pound" | "pounds" => (UnitClass::Mass, 453.59),

        // Count units -> item
        "item" | "items" | "whole" | "piece" | "pieces" | "clove" | "cloves" | "can" | "cans"
        | "bunch" | "bunches" | "" => (UnitClass::Count, 1.0),

        // Unknown units are kept as-is and never merged across spellings
        other => (UnitClass::Other(other.to_string()), 1.0),
    };

    NormalizedQuantity {
        class,
        quantity: quantity * factor,
    }
}

/// Pool and grocery aggregation key: normalized name plus unit class.
///
/// Two demands merge only when both the name and the unit class agree, so
/// "onion, 1 whole" never silently folds into "onion, 1 cup diced".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IngredientKey {
    pub name: String,
    pub class: UnitClass,
}

impl IngredientKey {
    /// Build the key for an ingredient demand and return the quantity
    /// converted to the key's base unit.
    pub fn from_demand(name: &str, unit: &str, quantity: f64) -> (Self, f64) {
        let normalized = normalize_unit(unit, quantity);
        (
            IngredientKey {
                name: name.trim().to_lowercase(),
                class: normalized.class,
            },
            normalized.quantity,
        )
    }
}

impl fmt::Display for IngredientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.class)
    }
}
