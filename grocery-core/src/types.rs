use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::quantity_parser::is_bare_quantity;

/// Name used when an ingredient name is empty or purely numeric.
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Bucket used for placeholder entries when nothing could be salvaged.
pub const OTHER_CATEGORY: &str = "Other";

/// Default number of decimal places kept when rendering magnitudes.
pub const DEFAULT_DISPLAY_PRECISION: u32 = 2;

/// An ingredient mention as pulled out of an upstream payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIngredientMention {
    pub name: String,
    pub raw_quantity: Option<String>,
    /// Category the upstream payload already assigned, if any.
    pub category: Option<String>,
}

impl RawIngredientMention {
    pub fn new(name: impl Into<String>, raw_quantity: Option<String>) -> Self {
        Self {
            name: name.into(),
            raw_quantity,
            category: None,
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }
}

/// A quantity split into magnitude and unit.
///
/// When `magnitude` is `None` the quantity could not be parsed and `unit`
/// holds the original text verbatim. Such quantities never merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuantity {
    pub magnitude: Option<f64>,
    pub unit: String,
}

impl ParsedQuantity {
    pub fn new(magnitude: f64, unit: impl Into<String>) -> Self {
        Self {
            magnitude: Some(magnitude),
            unit: unit.into(),
        }
    }

    /// A bare count with no unit.
    pub fn count(magnitude: f64) -> Self {
        Self::new(magnitude, "")
    }

    /// An unparseable quantity kept as display text.
    pub fn opaque(text: impl Into<String>) -> Self {
        Self {
            magnitude: None,
            unit: text.into(),
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.magnitude.is_none()
    }

    /// Render as `"{magnitude} {unit}"`, omitting an empty unit.
    ///
    /// Text that would not split back off a rendered line as the same
    /// quantity (opaque text, unknown units) is wrapped in parentheses.
    pub fn display(&self, precision: u32) -> String {
        let text = match self.magnitude {
            Some(value) => {
                let number = format_magnitude(value, precision);
                if self.unit.is_empty() {
                    number
                } else {
                    format!("{} {}", number, self.unit)
                }
            }
            None => self.unit.clone(),
        };

        if text.is_empty() || is_bare_quantity(&text) {
            text
        } else {
            format!("({})", text)
        }
    }
}

/// Format a magnitude with at most `precision` decimal places and no trailing zeros.
pub fn format_magnitude(value: f64, precision: u32) -> String {
    let scale = 10f64.powi(precision as i32);
    let rounded = (value * scale).round() / scale;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        let text = format!("{:.*}", precision as usize, rounded);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// An ingredient after name cleaning, quantity parsing and unit standardization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIngredient {
    /// Cleaned display name. Never empty.
    pub canonical_name: String,
    /// Grouping key, never displayed.
    pub aggregation_key: String,
    pub quantity: ParsedQuantity,
    pub category: Option<String>,
}

/// All mentions of one ingredient merged together.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedIngredient {
    pub display_name: String,
    pub aggregation_key: String,
    pub total_quantity: ParsedQuantity,
    /// Quantities whose units could not be merged into `total_quantity`.
    pub overflow_quantities: Vec<String>,
    pub category: Option<String>,
    pub mention_count: usize,
}

/// An aggregated ingredient with its shopping department decided.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedItem {
    pub category: String,
    pub ingredient: AggregatedIngredient,
}

/// One rendered shopping list line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub display_name: String,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
        }
    }
}

/// Final `{category -> items}` output.
///
/// Categories keep the order in which they were first seen. Serializes as
/// `{"categories": {"<department>": [{"name", "display_name"}]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    categories: Vec<(String, Vec<ShoppingItem>)>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding a single placeholder line in the `Other` bucket.
    pub fn placeholder(text: &str) -> Self {
        let mut list = Self::new();
        list.push(OTHER_CATEGORY, ShoppingItem::new(text, text));
        list
    }

    /// Append an item, creating the category at the end if it is new.
    pub fn push(&mut self, category: &str, item: ShoppingItem) {
        self.bucket_mut(category).push(item);
    }

    /// Make sure a category exists, even if it stays empty.
    pub fn ensure_category(&mut self, category: &str) {
        self.bucket_mut(category);
    }

    fn bucket_mut(&mut self, category: &str) -> &mut Vec<ShoppingItem> {
        let index = match self.categories.iter().position(|(name, _)| name == category) {
            Some(index) => index,
            None => {
                self.categories.push((category.to_string(), Vec::new()));
                self.categories.len() - 1
            }
        };
        &mut self.categories[index].1
    }

    pub fn get(&self, category: &str) -> Option<&[ShoppingItem]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, items)| items.as_slice())
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ShoppingItem])> {
        self.categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

impl Serialize for ShoppingList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Categories<'a>(&'a [(String, Vec<ShoppingItem>)]);

        impl Serialize for Categories<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (name, items) in self.0 {
                    map.serialize_entry(name, items)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("categories", &Categories(&self.categories))?;
        map.end()
    }
}
