//! Ingredient aggregation.
//!
//! Merges normalized ingredients that share an aggregation key. Quantities
//! with the same unit are summed, known convertible units are converted to
//! the first-seen unit, and anything else is kept as an overflow quantity.

use std::collections::HashMap;

use crate::quantity_parser::canonical_unit;
use crate::types::{AggregatedIngredient, NormalizedIngredient, ParsedQuantity};

/// Convertible unit pairs: (from, to, factor) where `to = from * factor`.
const CONVERSIONS: &[(&str, &str, f64)] = &[
    ("lb", "oz", 16.0),
    ("kg", "g", 1000.0),
    ("l", "ml", 1000.0),
    ("tbsp", "tsp", 3.0),
];

/// Factor converting an amount in `from` into `to`, if the pair is known.
pub fn conversion_factor(from: &str, to: &str) -> Option<f64> {
    CONVERSIONS.iter().find_map(|&(a, b, factor)| {
        if a == from && b == to {
            Some(factor)
        } else if a == to && b == from {
            Some(1.0 / factor)
        } else {
            None
        }
    })
}

/// Try to fold `next` into `total`. Returns false when the units are incompatible.
fn merge_into(total: &mut ParsedQuantity, next: &ParsedQuantity) -> bool {
    let (Some(current), Some(addition)) = (total.magnitude, next.magnitude) else {
        return false;
    };

    let target = canonical_unit(&total.unit);
    let source = canonical_unit(&next.unit);

    if target == source {
        total.magnitude = Some(current + addition);
        return true;
    }

    match conversion_factor(&source, &target) {
        Some(factor) => {
            total.magnitude = Some(current + addition * factor);
            true
        }
        None => false,
    }
}

/// Aggregate normalized ingredients by key, keeping first-seen order.
///
/// The display name and category come from the first entry of each group.
pub fn aggregate(entries: Vec<NormalizedIngredient>, precision: u32) -> Vec<AggregatedIngredient> {
    let mut groups: Vec<AggregatedIngredient> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        match index.get(&entry.aggregation_key).copied() {
            Some(i) => {
                let group = &mut groups[i];
                group.mention_count += 1;
                if group.category.is_none() {
                    group.category = entry.category;
                }
                if !merge_into(&mut group.total_quantity, &entry.quantity) {
                    group
                        .overflow_quantities
                        .push(entry.quantity.display(precision));
                }
            }
            None => {
                index.insert(entry.aggregation_key.clone(), groups.len());
                groups.push(AggregatedIngredient {
                    display_name: entry.canonical_name,
                    aggregation_key: entry.aggregation_key,
                    total_quantity: entry.quantity,
                    overflow_quantities: Vec::new(),
                    category: entry.category,
                    mention_count: 1,
                });
            }
        }
    }

    groups
}
