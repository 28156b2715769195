//! Engine configuration from environment variables.

use std::env;

use crate::types::DEFAULT_DISPLAY_PRECISION;

/// Default text of the entry emitted when nothing could be salvaged.
pub const DEFAULT_PLACEHOLDER_ITEM: &str = "No items found";

/// Highest accepted display precision.
const MAX_DISPLAY_PRECISION: u32 = 6;

/// Tunables for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Text of the placeholder line in the `Other` bucket.
    pub placeholder_item: String,
    /// Maximum decimal places in rendered magnitudes.
    pub display_precision: u32,
    /// Whether the ingredient-class unit rules run.
    pub unit_heuristics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            placeholder_item: DEFAULT_PLACEHOLDER_ITEM.to_string(),
            display_precision: DEFAULT_DISPLAY_PRECISION,
            unit_heuristics: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `GROCERY_PLACEHOLDER_ITEM`: placeholder text (default: "No items found")
    /// - `GROCERY_DISPLAY_PRECISION`: decimal places, 0-6 (default: 2)
    /// - `GROCERY_UNIT_HEURISTICS`: "false" or "0" disables unit rules (default: on)
    ///
    /// Invalid values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let placeholder_item = lookup("GROCERY_PLACEHOLDER_ITEM")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.placeholder_item);

        let display_precision = lookup("GROCERY_DISPLAY_PRECISION")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|p| *p <= MAX_DISPLAY_PRECISION)
            .unwrap_or(defaults.display_precision);

        let unit_heuristics = lookup("GROCERY_UNIT_HEURISTICS")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "off"))
            .unwrap_or(defaults.unit_heuristics);

        Self {
            placeholder_item,
            display_precision,
            unit_heuristics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config_from(&[]), EngineConfig::default());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = config_from(&[
            ("GROCERY_PLACEHOLDER_ITEM", "Nothing to buy"),
            ("GROCERY_DISPLAY_PRECISION", "1"),
            ("GROCERY_UNIT_HEURISTICS", "false"),
        ]);
        assert_eq!(config.placeholder_item, "Nothing to buy");
        assert_eq!(config.display_precision, 1);
        assert!(!config.unit_heuristics);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("GROCERY_PLACEHOLDER_ITEM", "   "),
            ("GROCERY_DISPLAY_PRECISION", "twelve"),
            ("GROCERY_UNIT_HEURISTICS", "yes"),
        ]);
        assert_eq!(config.placeholder_item, DEFAULT_PLACEHOLDER_ITEM);
        assert_eq!(config.display_precision, DEFAULT_DISPLAY_PRECISION);
        assert!(config.unit_heuristics);

        let config = config_from(&[("GROCERY_DISPLAY_PRECISION", "9")]);
        assert_eq!(config.display_precision, DEFAULT_DISPLAY_PRECISION);
    }
}
