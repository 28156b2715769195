//! End-to-end shopping list normalization.
//!
//! adapt -> extract -> normalize names -> parse quantities -> standardize
//! units -> aggregate -> categorize -> format. Every stage is a pure function
//! of the previous stage's output.

use serde::Serialize;

use crate::adapter::{adapt, detect_shape, Adapted};
use crate::aggregator::aggregate;
use crate::config::EngineConfig;
use crate::error::AdapterError;
use crate::formatter::format_shopping_list;
use crate::ingredient_categorizer::{categorize_all, Department};
use crate::name_normalizer::normalize_name;
use crate::quantity_parser::parse_quantity;
use crate::types::{NormalizedIngredient, RawIngredientMention, ShoppingList, OTHER_CATEGORY};
use crate::unit_standardizer::apply_rules;

/// Counters describing what happened during one pipeline run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Name of the detected input shape.
    pub shape: &'static str,
    pub mentions: usize,
    pub unknown_items: usize,
    pub unparseable_quantities: usize,
    pub standardized_units: usize,
    /// Mentions folded into an earlier mention of the same ingredient.
    pub merged_mentions: usize,
    pub overflow_quantities: usize,
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub list: ShoppingList,
    pub stats: PipelineStats,
}

/// Normalize an upstream payload with the default configuration.
pub fn run_pipeline(input: &serde_json::Value) -> Result<ShoppingList, AdapterError> {
    run_pipeline_with_config(input, &EngineConfig::default())
}

pub fn run_pipeline_with_config(
    input: &serde_json::Value,
    config: &EngineConfig,
) -> Result<ShoppingList, AdapterError> {
    run_pipeline_with_stats(input, config).map(|output| output.list)
}

/// Normalize an upstream payload and report per-stage statistics.
///
/// Fails only for scalar roots. Anything else produces a renderable list,
/// falling back to a single placeholder line when nothing was salvaged.
pub fn run_pipeline_with_stats(
    input: &serde_json::Value,
    config: &EngineConfig,
) -> Result<PipelineOutput, AdapterError> {
    let mut stats = PipelineStats::default();

    let shape = detect_shape(input)?;
    stats.shape = shape.name();
    tracing::debug!(shape = stats.shape, "Detected input shape");

    let list = match adapt(shape) {
        Adapted::Categorized(list) => {
            tracing::debug!(items = list.item_count(), "Input already categorized");
            list
        }
        Adapted::Mentions(mentions) => {
            build_list(mentions, Department::Other.as_str(), config, &mut stats)
        }
        Adapted::Salvaged(mentions) => build_list(mentions, OTHER_CATEGORY, config, &mut stats),
    };

    if list.is_empty() {
        tracing::warn!(
            shape = stats.shape,
            "No ingredients salvaged, emitting placeholder list"
        );
        stats.placeholder = true;
        return Ok(PipelineOutput {
            list: ShoppingList::placeholder(&config.placeholder_item),
            stats,
        });
    }

    Ok(PipelineOutput { list, stats })
}

/// Run raw mentions through normalization, aggregation and categorization.
///
/// Ingredients no department claims are filed under `unmatched`.
fn build_list(
    mentions: Vec<RawIngredientMention>,
    unmatched: &str,
    config: &EngineConfig,
    stats: &mut PipelineStats,
) -> ShoppingList {
    stats.mentions = mentions.len();
    let normalized = normalize_mentions(mentions, config, stats);

    let aggregated = aggregate(normalized, config.display_precision);
    stats.merged_mentions = aggregated.iter().map(|a| a.mention_count - 1).sum();
    stats.overflow_quantities = aggregated
        .iter()
        .map(|a| a.overflow_quantities.len())
        .sum();
    tracing::debug!(
        mentions = stats.mentions,
        ingredients = aggregated.len(),
        merged = stats.merged_mentions,
        overflow = stats.overflow_quantities,
        "Aggregated ingredients"
    );

    format_shopping_list(categorize_all(aggregated, unmatched), config.display_precision)
}

/// Clean names, parse quantities and apply unit rules to raw mentions.
pub fn normalize_mentions(
    mentions: Vec<RawIngredientMention>,
    config: &EngineConfig,
    stats: &mut PipelineStats,
) -> Vec<NormalizedIngredient> {
    mentions
        .into_iter()
        .map(|mention| {
            let name = normalize_name(&mention.name);
            if name.is_unknown() {
                stats.unknown_items += 1;
            }

            let mut quantity = parse_quantity(mention.raw_quantity.as_deref());
            if quantity.is_opaque() {
                stats.unparseable_quantities += 1;
            }

            if config.unit_heuristics {
                if let Some(standardized) = apply_rules(&name.canonical_name, &quantity) {
                    stats.standardized_units += 1;
                    quantity = standardized;
                }
            }

            NormalizedIngredient {
                canonical_name: name.canonical_name,
                aggregation_key: name.aggregation_key,
                quantity,
                category: mention.category,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ShoppingItem;
    use serde_json::json;

    #[test]
    fn test_all_items_end_to_end() {
        let input = json!({
            "groceryList": [{
                "category": "All Items",
                "items": [
                    { "name": "Chicken Breast", "quantity": "16 oz" },
                    { "name": "Chicken Breasts", "quantity": "1 lb" },
                    { "name": "Onion", "quantity": "2" }
                ]
            }]
        });

        let output = run_pipeline_with_stats(&input, &EngineConfig::default()).unwrap();
        let list = output.list;
        assert_eq!(list.category_names(), vec!["meat-seafood", "produce"]);
        assert_eq!(
            list.get("meat-seafood").unwrap(),
            &[ShoppingItem::new("Chicken Breast", "32 oz Chicken Breast")]
        );
        assert_eq!(
            list.get("produce").unwrap(),
            &[ShoppingItem::new("Onion", "2 Onion")]
        );

        assert_eq!(output.stats.shape, "grocery_groups");
        assert_eq!(output.stats.mentions, 3);
        assert_eq!(output.stats.merged_mentions, 1);
        assert_eq!(output.stats.standardized_units, 1);
        assert!(!output.stats.placeholder);
    }

    #[test]
    fn test_placeholder_when_nothing_salvaged() {
        let output =
            run_pipeline_with_stats(&json!({ "status": "ok" }), &EngineConfig::default()).unwrap();
        assert!(output.stats.placeholder);
        assert_eq!(output.stats.shape, "unrecognized");
        assert_eq!(
            output.list.get("Other").unwrap(),
            &[ShoppingItem::new("No items found", "No items found")]
        );
    }

    #[test]
    fn test_custom_placeholder() {
        let config = EngineConfig {
            placeholder_item: "Nothing to buy".to_string(),
            ..EngineConfig::default()
        };
        let list = run_pipeline_with_config(&json!([]), &config).unwrap();
        assert_eq!(list.get("Other").unwrap()[0].name, "Nothing to buy");
    }

    #[test]
    fn test_heuristics_disabled() {
        let config = EngineConfig {
            unit_heuristics: false,
            ..EngineConfig::default()
        };
        let input = json!(["2 chicken thighs"]);

        let list = run_pipeline_with_config(&input, &config).unwrap();
        assert_eq!(list.get("meat-seafood").unwrap()[0].display_name, "2 chicken thigh");

        let list = run_pipeline(&input).unwrap();
        assert_eq!(list.get("meat-seafood").unwrap()[0].display_name, "32 oz chicken thigh");
    }

    #[test]
    fn test_scalar_root_is_error() {
        assert_eq!(
            run_pipeline(&json!(42)),
            Err(AdapterError::InvalidRoot { kind: "number" })
        );
    }

    #[test]
    fn test_stats_count_data_quality_issues() {
        let input = json!([
            { "name": "96", "quantity": "1" },
            { "name": "salt", "quantity": "to taste" },
            { "name": "rice", "quantity": "1 cup" },
            { "name": "rice", "quantity": "200 g" }
        ]);
        let output = run_pipeline_with_stats(&input, &EngineConfig::default()).unwrap();
        assert_eq!(output.stats.shape, "flat_array");
        assert_eq!(output.stats.unknown_items, 1);
        assert_eq!(output.stats.unparseable_quantities, 1);
        assert_eq!(output.stats.merged_mentions, 1);
        assert_eq!(output.stats.overflow_quantities, 1);
    }
}
