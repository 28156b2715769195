//! Ingredient mention extraction.
//!
//! Walks meal plans (day -> meal/snack -> ingredient) and loose item lists,
//! flattening them into `RawIngredientMention`s. Upstream sources disagree on
//! key names, so several spellings are accepted for each field.

use crate::quantity_parser::{split_quantity_chain, take_quantity_chain};
use crate::types::RawIngredientMention;

const NAME_KEYS: &[&str] = &["name", "ingredient", "item", "title"];
const QUANTITY_KEYS: &[&str] = &["quantity", "amount", "qty"];
const UNIT_KEYS: &[&str] = &["unit", "units"];
const CATEGORY_KEYS: &[&str] = &["category", "department"];
const DISPLAY_KEYS: &[&str] = &["display_name", "displayName"];

/// Category literal meaning "not categorized yet".
pub const ALL_ITEMS_CATEGORY: &str = "All Items";

/// Flatten a meal plan into ingredient mentions.
///
/// Order is day ascending, then meals before snacks, then ingredient order.
/// Later stages rely on this order to pick display names.
pub fn extract_meal_plan(plan: &serde_json::Value) -> Vec<RawIngredientMention> {
    let Some(days) = plan.get("days").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    let mut mentions = Vec::new();
    for day in days {
        for section in ["meals", "snacks"] {
            for entry in entries(day.get(section)) {
                if let Some(ingredients) = entry.get("ingredients").and_then(|v| v.as_array()) {
                    mentions.extend(ingredients.iter().flat_map(|i| mentions_from_item(i, None)));
                }
            }
        }
    }

    tracing::debug!(days = days.len(), mentions = mentions.len(), "Extracted meal plan");
    mentions
}

/// Meals and snacks come as arrays, or as objects keyed by meal name.
fn entries(value: Option<&serde_json::Value>) -> Vec<&serde_json::Value> {
    match value {
        Some(serde_json::Value::Array(arr)) => arr.iter().collect(),
        Some(entry @ serde_json::Value::Object(obj)) if obj.contains_key("ingredients") => {
            vec![entry]
        }
        Some(serde_json::Value::Object(obj)) => obj.values().collect(),
        _ => Vec::new(),
    }
}

/// Convert a list of upstream items into mentions.
pub fn mentions_from_items(
    items: &[serde_json::Value],
    category: Option<&str>,
) -> Vec<RawIngredientMention> {
    items
        .iter()
        .flat_map(|item| mentions_from_item(item, category))
        .collect()
}

/// Convert one upstream item (a string or an object) into mentions.
///
/// Usually there is one mention per item. A rendered line that lists
/// several quantities ("1 cup, 200 g rice") gives one mention per quantity.
///
/// `category` is the group the item was found in; an item's own category
/// field takes precedence. "All Items" counts as no category.
pub fn mentions_from_item(
    item: &serde_json::Value,
    category: Option<&str>,
) -> Vec<RawIngredientMention> {
    let category = category.and_then(real_category);

    match item {
        serde_json::Value::String(s) => with_category(mentions_from_line(s), category),
        serde_json::Value::Number(n) => with_category(
            vec![RawIngredientMention::new(n.to_string(), None)],
            category,
        ),
        serde_json::Value::Object(obj) => {
            let Some(name) = first_text(obj, NAME_KEYS) else {
                return Vec::new();
            };
            let quantity = first_text(obj, QUANTITY_KEYS);
            let unit = first_text(obj, UNIT_KEYS);
            let own_category = first_text(obj, CATEGORY_KEYS);

            let category = own_category
                .as_deref()
                .and_then(real_category)
                .or(category);

            let mentions = match (quantity, unit) {
                (Some(q), Some(u)) => {
                    vec![RawIngredientMention::new(name, Some(format!("{} {}", q, u)))]
                }
                (Some(q), None) => vec![RawIngredientMention::new(name, Some(q))],
                (None, _) => match first_text(obj, DISPLAY_KEYS) {
                    Some(display) => mentions_from_display(&display, &name),
                    None => mentions_from_line(&name),
                },
            };
            with_category(mentions, category)
        }
        _ => Vec::new(),
    }
}

/// Read quantities from an already rendered item.
///
/// When `display` is the name with quantities in front ("2 Onion" for
/// "Onion"), the name is kept as given and only the prefix is parsed.
fn mentions_from_display(display: &str, name: &str) -> Vec<RawIngredientMention> {
    let prefix = display
        .strip_suffix(name)
        .filter(|prefix| prefix.is_empty() || prefix.ends_with(char::is_whitespace));

    match prefix.map(take_quantity_chain) {
        Some((quantities, rest)) if rest.trim().is_empty() => {
            if quantities.is_empty() {
                vec![RawIngredientMention::new(name, None)]
            } else {
                quantities
                    .into_iter()
                    .map(|q| RawIngredientMention::new(name, Some(q)))
                    .collect()
            }
        }
        _ => mentions_from_line(display),
    }
}

/// Build mentions from a free-text line such as "2 lb chicken breast".
///
/// Empty lines give no mentions. Lines with a chain of quantities give one
/// mention per quantity, all with the same name.
pub fn mentions_from_line(line: &str) -> Vec<RawIngredientMention> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }

    let (quantities, name) = split_quantity_chain(line);
    if quantities.is_empty() {
        return vec![RawIngredientMention::new(name, None)];
    }
    quantities
        .into_iter()
        .map(|q| RawIngredientMention::new(name.clone(), Some(q)))
        .collect()
}

/// Split newline-separated text into mentions, skipping blank lines.
pub fn mentions_from_text(text: &str) -> Vec<RawIngredientMention> {
    text.lines().flat_map(mentions_from_line).collect()
}

fn with_category(
    mentions: Vec<RawIngredientMention>,
    category: Option<&str>,
) -> Vec<RawIngredientMention> {
    mentions
        .into_iter()
        .map(|m| m.with_category(category.map(str::to_string)))
        .collect()
}

/// Read the first present key as text; numbers are rendered as strings.
fn first_text(obj: &serde_json::Map<String, serde_json::Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A category that actually classifies something.
pub fn real_category(category: &str) -> Option<&str> {
    let trimmed = category.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_ITEMS_CATEGORY) {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_meal_plan_order() {
        let plan = json!({
            "days": [
                {
                    "meals": [
                        { "ingredients": ["2 eggs", { "name": "Spinach", "quantity": "1 cup" }] },
                        { "ingredients": [{ "ingredient": "Chicken Breast", "amount": "8 oz" }] }
                    ],
                    "snacks": [{ "ingredients": ["1 apple"] }]
                },
                {
                    "meals": [{ "ingredients": [{ "name": "Rice", "amount": 1, "unit": "cup" }] }]
                }
            ]
        });

        let mentions = extract_meal_plan(&plan);
        let names: Vec<&str> = mentions.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["eggs", "Spinach", "Chicken Breast", "apple", "Rice"]
        );
        assert_eq!(mentions[0].raw_quantity.as_deref(), Some("2"));
        assert_eq!(mentions[2].raw_quantity.as_deref(), Some("8 oz"));
        assert_eq!(mentions[4].raw_quantity.as_deref(), Some("1 cup"));
    }

    #[test]
    fn test_meal_plan_meals_keyed_by_name() {
        let plan = json!({
            "days": [{
                "meals": {
                    "breakfast": { "ingredients": ["oats"] },
                    "dinner": { "ingredients": ["salmon"] }
                },
                "snacks": { "ingredients": ["almonds"] }
            }]
        });
        let names: Vec<String> = extract_meal_plan(&plan).into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["oats", "salmon", "almonds"]);
    }

    #[test]
    fn test_meal_plan_without_days() {
        assert!(extract_meal_plan(&json!({ "weeks": [] })).is_empty());
    }

    fn one(item: serde_json::Value, category: Option<&str>) -> RawIngredientMention {
        let mut mentions = mentions_from_item(&item, category);
        assert_eq!(mentions.len(), 1, "expected one mention from {}", item);
        mentions.remove(0)
    }

    #[test]
    fn test_item_string_with_embedded_quantity() {
        let mention = one(json!("2 lb chicken breast"), None);
        assert_eq!(mention.name, "chicken breast");
        assert_eq!(mention.raw_quantity.as_deref(), Some("2 lb"));
    }

    #[test]
    fn test_item_object_category_wins() {
        let mention = one(
            json!({ "name": "Milk", "quantity": "1 gallon", "category": "Dairy" }),
            Some("Produce"),
        );
        assert_eq!(mention.category.as_deref(), Some("Dairy"));

        let mention = one(json!({ "name": "Milk" }), Some("Produce"));
        assert_eq!(mention.category.as_deref(), Some("Produce"));
        assert_eq!(mention.raw_quantity, None);
    }

    #[test]
    fn test_all_items_is_no_category() {
        let mention = one(json!("Onion"), Some("All Items"));
        assert_eq!(mention.category, None);
        assert_eq!(real_category("all items"), None);
        assert_eq!(real_category("  "), None);
        assert_eq!(real_category(" Produce "), Some("Produce"));
    }

    #[test]
    fn test_item_without_name_skipped() {
        assert!(mentions_from_item(&json!({ "quantity": "2" }), None).is_empty());
        assert!(mentions_from_item(&json!(null), None).is_empty());
        assert!(mentions_from_item(&json!("   "), None).is_empty());
    }

    #[test]
    fn test_numeric_item_kept_as_name() {
        let mention = one(json!(96), None);
        assert_eq!(mention.name, "96");
    }

    #[test]
    fn test_rendered_line_gives_mention_per_quantity() {
        let mentions = mentions_from_item(&json!("1 cup, 200 g rice"), Some("grains"));
        let quantities: Vec<_> = mentions.iter().map(|m| m.raw_quantity.as_deref()).collect();
        assert_eq!(quantities, vec![Some("1 cup"), Some("200 g")]);
        assert!(mentions.iter().all(|m| m.name == "rice"));
        assert!(mentions.iter().all(|m| m.category.as_deref() == Some("grains")));

        let mention = one(json!("(to taste) pepper"), None);
        assert_eq!(mention.name, "pepper");
        assert_eq!(mention.raw_quantity.as_deref(), Some("to taste"));
    }

    #[test]
    fn test_display_name_supplies_quantity() {
        let mention = one(json!({ "name": "Onion", "display_name": "2 Onion" }), None);
        assert_eq!(mention.name, "Onion");
        assert_eq!(mention.raw_quantity.as_deref(), Some("2"));

        let mentions = mentions_from_item(
            &json!({ "name": "rice", "display_name": "1 cup, 200 g rice" }),
            None,
        );
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[1].raw_quantity.as_deref(), Some("200 g"));

        let mention = one(json!({ "name": "Olive oil", "display_name": "Olive oil" }), None);
        assert_eq!(mention.raw_quantity, None);
    }

    #[test]
    fn test_display_name_not_ending_in_name() {
        let mention = one(json!({ "name": "Onion", "display_name": "3 lb onions" }), None);
        assert_eq!(mention.name, "onions");
        assert_eq!(mention.raw_quantity.as_deref(), Some("3 lb"));

        // An explicit quantity beats the rendered text.
        let mention = one(
            json!({ "name": "Onion", "quantity": "4", "display_name": "2 Onion" }),
            None,
        );
        assert_eq!(mention.raw_quantity.as_deref(), Some("4"));
    }

    #[test]
    fn test_text_lines() {
        let mentions = mentions_from_text("2 cups flour\n\n1 tsp salt\nbasil");
        assert_eq!(mentions.len(), 3);
        assert_eq!(mentions[0].name, "flour");
        assert_eq!(mentions[2].raw_quantity, None);
    }
}
