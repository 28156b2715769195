//! Upstream response shape detection.
//!
//! Shopping list payloads arrive in several shapes depending on the upstream
//! source and API version. The shape is detected once into an [`InputShape`],
//! then [`adapt`] reduces it either to an already-categorized list or to raw
//! ingredient mentions for the rest of the pipeline.
//!
//! Detection order matters because some payloads satisfy more than one shape:
//!
//! 1. `{categories: {...}}` is already a shopping list
//! 2. `{groceryList: ...}` as category groups, a flat item list, or a map
//! 3. `{data: {categories: {...}}}` is a wrapped shopping list
//! 4. a bare array, grouped by its own `category` fields when every item has one
//! 5. meal plans (`days`), then any other object is salvaged for arrays
//!
//! String roots are parsed as JSON when possible, otherwise read as one
//! ingredient per line.

use crate::error::AdapterError;
use crate::extract::{
    extract_meal_plan, mentions_from_item, mentions_from_items, mentions_from_text, real_category,
};
use crate::types::{RawIngredientMention, ShoppingItem, ShoppingList};

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// The detected shape of an upstream payload, borrowing from it.
#[derive(Debug, Clone, PartialEq)]
pub enum InputShape<'a> {
    /// `{categories: {dept: items}}`
    Categories(&'a JsonMap),
    /// `{data: {categories: {dept: items}}}`
    WrappedCategories(&'a JsonMap),
    /// `{groceryList: [{category, items}]}`
    GroceryGroups(&'a [serde_json::Value]),
    /// `{groceryList: [item, ...]}`
    GroceryItems(&'a [serde_json::Value]),
    /// `{groceryList: {dept: items}}`
    GroceryMap(&'a JsonMap),
    /// `[{name, category}, ...]` where every element names a real category
    CategorizedArray(&'a [serde_json::Value]),
    /// `[item, ...]`
    FlatArray(&'a [serde_json::Value]),
    /// `{days: [...]}` or a meal plan nested under `mealPlan`
    MealPlan(&'a serde_json::Value),
    /// A string root
    Text(&'a str),
    /// Any other object; arrays found in its properties are salvaged
    Unrecognized(&'a JsonMap),
}

impl InputShape<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            InputShape::Categories(_) => "categories",
            InputShape::WrappedCategories(_) => "wrapped_categories",
            InputShape::GroceryGroups(_) => "grocery_groups",
            InputShape::GroceryItems(_) => "grocery_items",
            InputShape::GroceryMap(_) => "grocery_map",
            InputShape::CategorizedArray(_) => "categorized_array",
            InputShape::FlatArray(_) => "flat_array",
            InputShape::MealPlan(_) => "meal_plan",
            InputShape::Text(_) => "text",
            InputShape::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Result of adapting a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Adapted {
    /// Already categorized and formatted; skips the rest of the pipeline.
    Categorized(ShoppingList),
    /// Raw mentions to normalize, aggregate and categorize.
    Mentions(Vec<RawIngredientMention>),
    /// Mentions scavenged from an unrecognized object. Items no department
    /// claims go to the same `Other` bucket as the placeholder line.
    Salvaged(Vec<RawIngredientMention>),
}

/// Detect the shape of a payload.
///
/// Only scalar roots (null, booleans, numbers) are rejected.
pub fn detect_shape(input: &serde_json::Value) -> Result<InputShape<'_>, AdapterError> {
    match input {
        serde_json::Value::Null => Err(AdapterError::InvalidRoot { kind: "null" }),
        serde_json::Value::Bool(_) => Err(AdapterError::InvalidRoot { kind: "boolean" }),
        serde_json::Value::Number(_) => Err(AdapterError::InvalidRoot { kind: "number" }),
        serde_json::Value::String(s) => Ok(InputShape::Text(s)),
        serde_json::Value::Array(arr) => Ok(detect_array(arr)),
        serde_json::Value::Object(obj) => Ok(detect_object(input, obj)),
    }
}

fn detect_object<'a>(root: &'a serde_json::Value, obj: &'a JsonMap) -> InputShape<'a> {
    if let Some(serde_json::Value::Object(categories)) = obj.get("categories") {
        return InputShape::Categories(categories);
    }

    match obj.get("groceryList").or_else(|| obj.get("grocery_list")) {
        Some(serde_json::Value::Array(items)) if is_group_list(items) => {
            return InputShape::GroceryGroups(items);
        }
        Some(serde_json::Value::Array(items)) => return InputShape::GroceryItems(items),
        Some(serde_json::Value::Object(map)) => return InputShape::GroceryMap(map),
        _ => {}
    }

    if let Some(serde_json::Value::Object(categories)) =
        obj.get("data").and_then(|data| data.get("categories"))
    {
        return InputShape::WrappedCategories(categories);
    }

    if has_days(root) {
        return InputShape::MealPlan(root);
    }
    for key in ["mealPlan", "meal_plan"] {
        if let Some(plan) = obj.get(key).filter(|plan| has_days(plan)) {
            return InputShape::MealPlan(plan);
        }
    }

    InputShape::Unrecognized(obj)
}

fn detect_array(arr: &[serde_json::Value]) -> InputShape<'_> {
    let all_categorized = !arr.is_empty()
        && arr.iter().all(|item| {
            item.get("category")
                .and_then(|c| c.as_str())
                .and_then(real_category)
                .is_some()
        });

    if all_categorized {
        InputShape::CategorizedArray(arr)
    } else {
        InputShape::FlatArray(arr)
    }
}

/// Every element is `{category, items: [...]}`.
fn is_group_list(items: &[serde_json::Value]) -> bool {
    !items.is_empty()
        && items.iter().all(|group| {
            group.get("category").is_some_and(|c| c.is_string())
                && group.get("items").is_some_and(|i| i.is_array())
        })
}

fn has_days(value: &serde_json::Value) -> bool {
    value.get("days").is_some_and(|days| days.is_array())
}

/// Reduce a detected shape to a shopping list or raw mentions.
pub fn adapt(shape: InputShape<'_>) -> Adapted {
    match shape {
        InputShape::Categories(categories) | InputShape::WrappedCategories(categories) => {
            Adapted::Categorized(passthrough(categories))
        }
        InputShape::GroceryGroups(groups) => {
            let mentions = groups
                .iter()
                .flat_map(|group| {
                    let category = group.get("category").and_then(|c| c.as_str());
                    let items = group
                        .get("items")
                        .and_then(|i| i.as_array())
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    mentions_from_items(items, category)
                })
                .collect();
            Adapted::Mentions(mentions)
        }
        InputShape::GroceryItems(items) | InputShape::FlatArray(items) => {
            Adapted::Mentions(mentions_from_items(items, None))
        }
        InputShape::CategorizedArray(items) => {
            // Each item carries its own category, which mentions_from_item prefers.
            Adapted::Mentions(mentions_from_items(items, None))
        }
        InputShape::GroceryMap(map) => {
            let mentions = map
                .iter()
                .filter_map(|(category, items)| Some((category, items.as_array()?)))
                .flat_map(|(category, items)| mentions_from_items(items, Some(category.as_str())))
                .collect();
            Adapted::Mentions(mentions)
        }
        InputShape::MealPlan(plan) => Adapted::Mentions(extract_meal_plan(plan)),
        InputShape::Text(text) => adapt_text(text),
        InputShape::Unrecognized(obj) => Adapted::Salvaged(salvage(obj)),
    }
}

/// A string root may be serialized JSON; otherwise it is a plain list.
fn adapt_text(text: &str) -> Adapted {
    if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(text) {
        if parsed.is_object() || parsed.is_array() {
            if let Ok(shape) = detect_shape(&parsed) {
                tracing::debug!(shape = shape.name(), "Parsed JSON from string payload");
                return adapt(shape);
            }
        }
    }
    Adapted::Mentions(mentions_from_text(text))
}

/// Concatenate every array-valued property into raw mentions.
fn salvage(obj: &JsonMap) -> Vec<RawIngredientMention> {
    let mut mentions = Vec::new();
    let mut arrays = 0;
    for items in obj.values().filter_map(|v| v.as_array()) {
        arrays += 1;
        mentions.extend(items.iter().flat_map(|item| mentions_from_item(item, None)));
    }

    tracing::warn!(
        keys = obj.len(),
        arrays,
        salvaged = mentions.len(),
        "Unrecognized shopping list shape, salvaging array fields"
    );
    mentions
}

/// Copy an already-categorized map into a shopping list unchanged.
fn passthrough(categories: &JsonMap) -> ShoppingList {
    let mut list = ShoppingList::new();
    for (category, items) in categories {
        let Some(items) = items.as_array() else {
            continue;
        };
        list.ensure_category(category);
        for item in items.iter().filter_map(passthrough_item) {
            list.push(category, item);
        }
    }
    list
}

fn passthrough_item(item: &serde_json::Value) -> Option<ShoppingItem> {
    match item {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(ShoppingItem::new(s, s)),
        serde_json::Value::Number(n) => Some(ShoppingItem::new(n.to_string(), n.to_string())),
        serde_json::Value::Object(obj) => {
            let text = |key: &str| {
                obj.get(key)
                    .and_then(|v| match v {
                        serde_json::Value::String(s) => Some(s.trim().to_string()),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.is_empty())
            };

            let display_name = text("display_name");
            let name = text("name").or_else(|| display_name.clone())?;
            let display_name = display_name.unwrap_or_else(|| match text("quantity") {
                Some(quantity) => format!("{} {}", quantity, name),
                None => name.clone(),
            });
            Some(ShoppingItem::new(name, display_name))
        }
        _ => None,
    }
}
