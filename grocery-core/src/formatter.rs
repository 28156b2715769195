//! Rendering of categorized ingredients into the final shopping list.

use crate::types::{AggregatedIngredient, CategorizedItem, ShoppingItem, ShoppingList};

/// Render one ingredient as `"{quantity} {unit} {name}"`.
///
/// Overflow quantities follow the primary quantity, comma separated:
/// `"1 cup, 200 g rice"`.
pub fn display_string(ingredient: &AggregatedIngredient, precision: u32) -> String {
    let mut quantity = ingredient.total_quantity.display(precision);
    for overflow in &ingredient.overflow_quantities {
        if quantity.is_empty() {
            quantity = overflow.clone();
        } else {
            quantity = format!("{}, {}", quantity, overflow);
        }
    }

    if quantity.is_empty() {
        ingredient.display_name.clone()
    } else {
        format!("{} {}", quantity, ingredient.display_name)
    }
}

/// Build the shopping list, keeping categories in first-seen order.
pub fn format_shopping_list(items: Vec<CategorizedItem>, precision: u32) -> ShoppingList {
    let mut list = ShoppingList::new();
    for item in items {
        let display_name = display_string(&item.ingredient, precision);
        list.push(
            &item.category,
            ShoppingItem::new(item.ingredient.display_name, display_name),
        );
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedQuantity;

    fn ingredient(name: &str, quantity: ParsedQuantity, overflow: &[&str]) -> AggregatedIngredient {
        AggregatedIngredient {
            display_name: name.to_string(),
            aggregation_key: name.to_lowercase(),
            total_quantity: quantity,
            overflow_quantities: overflow.iter().map(|s| s.to_string()).collect(),
            category: None,
            mention_count: 1,
        }
    }

    #[test]
    fn test_display_with_unit() {
        let item = ingredient("Chicken Breast", ParsedQuantity::new(32.0, "oz"), &[]);
        assert_eq!(display_string(&item, 2), "32 oz Chicken Breast");
    }

    #[test]
    fn test_display_without_unit() {
        let item = ingredient("Onion", ParsedQuantity::count(2.0), &[]);
        assert_eq!(display_string(&item, 2), "2 Onion");
    }

    #[test]
    fn test_display_with_overflow() {
        let item = ingredient("rice", ParsedQuantity::new(1.0, "cup"), &["200 g"]);
        assert_eq!(display_string(&item, 2), "1 cup, 200 g rice");
    }

    #[test]
    fn test_display_opaque() {
        let item = ingredient("salt", ParsedQuantity::opaque("to taste"), &[]);
        assert_eq!(display_string(&item, 2), "(to taste) salt");
    }

    #[test]
    fn test_display_precision() {
        let item = ingredient("cheese", ParsedQuantity::new(8.8185, "oz"), &[]);
        assert_eq!(display_string(&item, 2), "8.82 oz cheese");
        assert_eq!(display_string(&item, 1), "8.8 oz cheese");
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let items = vec![
            CategorizedItem {
                category: "meat-seafood".to_string(),
                ingredient: ingredient("Chicken", ParsedQuantity::new(16.0, "oz"), &[]),
            },
            CategorizedItem {
                category: "produce".to_string(),
                ingredient: ingredient("Onion", ParsedQuantity::count(2.0), &[]),
            },
            CategorizedItem {
                category: "meat-seafood".to_string(),
                ingredient: ingredient("Beef", ParsedQuantity::new(8.0, "oz"), &[]),
            },
        ];

        let list = format_shopping_list(items, 2);
        assert_eq!(list.category_names(), vec!["meat-seafood", "produce"]);
        let meat = list.get("meat-seafood").unwrap();
        assert_eq!(meat[0], ShoppingItem::new("Chicken", "16 oz Chicken"));
        assert_eq!(meat[1], ShoppingItem::new("Beef", "8 oz Beef"));
    }
}
