//! Ingredient-class unit standardization.
//!
//! Converts raw units into the display unit a shopper expects for a class of
//! ingredient: meats in ounces, large gram weights of dairy in ounces, and
//! produce counts capped at a realistic number.
//!
//! The numeric thresholds encode guesses about what a bare number means
//! (e.g. "2 chicken" is two pounds, "12 chicken" is twelve ounces). They are
//! kept exactly as-is for compatibility with existing lists.

use crate::quantity_parser::canonical_unit;
use crate::types::ParsedQuantity;

pub const OUNCES_PER_POUND: f64 = 16.0;
pub const OUNCES_PER_GRAM: f64 = 0.035274;

/// Unitless meat amounts up to this are read as pounds.
pub const MEAT_POUND_LIMIT: f64 = 5.0;
/// Unitless meat amounts up to this (above the pound limit) are read as ounces.
pub const MEAT_OUNCE_LIMIT: f64 = 20.0;
/// Dairy gram weights above this are shown in ounces.
pub const DAIRY_GRAM_LIMIT: f64 = 200.0;
/// Produce counts are capped at this.
pub const PRODUCE_COUNT_CAP: f64 = 6.0;

const MEAT_KEYWORDS: &[&str] = &["chicken", "beef", "pork", "turkey", "steak", "meat"];
/// Matched as whole words, so "butternut squash" is not dairy.
const DAIRY_WORDS: &[&str] = &[
    "butter",
    "cream",
    "ghee",
    "yogurt",
    "yoghurt",
    "kefir",
    "cheese",
    "cheddar",
    "mozzarella",
    "parmesan",
    "feta",
    "ricotta",
    "gouda",
    "brie",
];
const PRODUCE_KEYWORDS: &[&str] = &["pepper", "onion", "potato"];

/// Units counted as "one of the thing" for the produce cap.
const PIECE_UNITS: &[&str] = &["piece", "whole", "medium"];

/// Ingredient class deciding which unit rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientClass {
    Meat,
    Dairy,
    Produce,
    General,
}

/// Classify an ingredient by keyword containment in its lower-cased name.
pub fn classify(name: &str) -> IngredientClass {
    let lower = name.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
    let has_word = |words: &[&str]| {
        lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| words.contains(&word))
    };

    if has(MEAT_KEYWORDS) {
        IngredientClass::Meat
    } else if has_word(DAIRY_WORDS) {
        IngredientClass::Dairy
    } else if has(PRODUCE_KEYWORDS) {
        IngredientClass::Produce
    } else {
        IngredientClass::General
    }
}

/// Apply the first matching rule for this ingredient, if any.
///
/// Returns `None` when no rule applies; the quantity then passes through.
pub fn apply_rules(name: &str, quantity: &ParsedQuantity) -> Option<ParsedQuantity> {
    let magnitude = quantity.magnitude?;
    let unit = canonical_unit(&quantity.unit);

    match classify(name) {
        IngredientClass::Meat => match unit.as_str() {
            "lb" => Some(ParsedQuantity::new(magnitude * OUNCES_PER_POUND, "oz")),
            "" if magnitude <= MEAT_POUND_LIMIT => {
                Some(ParsedQuantity::new(magnitude * OUNCES_PER_POUND, "oz"))
            }
            "" if magnitude <= MEAT_OUNCE_LIMIT => Some(ParsedQuantity::new(magnitude, "oz")),
            "g" => Some(ParsedQuantity::new(
                (magnitude * OUNCES_PER_GRAM).round(),
                "oz",
            )),
            _ => None,
        },
        IngredientClass::Dairy if unit == "g" && magnitude > DAIRY_GRAM_LIMIT => {
            Some(ParsedQuantity::new(magnitude * OUNCES_PER_GRAM, "oz"))
        }
        IngredientClass::Produce if magnitude > PRODUCE_COUNT_CAP => {
            if unit.is_empty() {
                Some(ParsedQuantity::count(PRODUCE_COUNT_CAP))
            } else if PIECE_UNITS.contains(&unit.as_str()) {
                Some(ParsedQuantity::new(PRODUCE_COUNT_CAP, "medium"))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Standardize a quantity, passing it through unchanged when no rule applies.
pub fn standardize(name: &str, quantity: ParsedQuantity) -> ParsedQuantity {
    apply_rules(name, &quantity).unwrap_or(quantity)
}
