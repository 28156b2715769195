//! Ingredient department audit output.

use std::collections::BTreeMap;

use grocery_core::name_normalizer::normalize_name;
use grocery_core::Department;

/// Department assigned to a raw name after the same cleaning the pipeline applies.
fn department_for(name: &str) -> Department {
    grocery_core::categorize(&normalize_name(name).canonical_name)
}

fn csv_field(field: &str) -> String {
    // Escape CSV fields that contain commas or quotes
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Print `ingredient,category` lines for each name, optionally with a summary.
pub fn print_csv(names: &[String], summary: bool) {
    println!("ingredient,category");

    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for name in names {
        let department = department_for(name);
        println!("{},{}", csv_field(name.trim()), department.as_str());
        *by_category.entry(department.as_str()).or_default() += 1;
    }

    if summary {
        eprintln!("\nCategories:");
        for (category, count) in by_category {
            eprintln!("  {}: {}", category, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(csv_field("onion"), "onion");
        assert_eq!(csv_field("chicken, diced"), "\"chicken, diced\"");
        assert_eq!(csv_field("6\" tortilla"), "\"6\"\" tortilla\"");
    }

    #[test]
    fn test_department_uses_cleaned_name() {
        assert_eq!(department_for("Salmon Fillets (skin on)"), Department::MeatSeafood);
        assert_eq!(department_for("96"), Department::Other);
    }
}
