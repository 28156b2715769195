//! Ingredient categorization for shopping list grouping.
//!
//! Maps ingredient names to shopping departments based on keyword matching.
//! Department keyword data is loaded from `data/departments.json` at compile time.

use std::sync::LazyLock;

use serde::Deserialize;

use crate::types::{AggregatedIngredient, CategorizedItem};

/// Shopping departments, in keyword lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Produce,
    Fruits,
    Beverages,
    DairyEggs,
    Deli,
    BreadsGrains,
    FrozenFoods,
    MeatSeafood,
    BakingSpices,
    Condiments,
    Other,
}

impl Department {
    /// All departments in lookup order
    pub const ALL: &'static [Department] = &[
        Department::Produce,
        Department::Fruits,
        Department::Beverages,
        Department::DairyEggs,
        Department::Deli,
        Department::BreadsGrains,
        Department::FrozenFoods,
        Department::MeatSeafood,
        Department::BakingSpices,
        Department::Condiments,
        Department::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Produce => "produce",
            Department::Fruits => "fruits",
            Department::Beverages => "beverages",
            Department::DairyEggs => "dairy-eggs",
            Department::Deli => "deli",
            Department::BreadsGrains => "breads-grains",
            Department::FrozenFoods => "frozen-foods",
            Department::MeatSeafood => "meat-seafood",
            Department::BakingSpices => "baking-spices",
            Department::Condiments => "condiments",
            Department::Other => "other",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.as_str() == s)
    }
}

/// The raw JSON structure for the departments data file.
#[derive(Deserialize)]
struct DepartmentsData {
    departments: Vec<DepartmentEntry>,
}

#[derive(Deserialize)]
struct DepartmentEntry {
    name: String,
    keywords: Vec<String>,
}

/// Keyword table in department order.
static KEYWORD_TABLE: LazyLock<Vec<(Department, Vec<String>)>> = LazyLock::new(|| {
    let json = include_str!("../../data/departments.json");
    let data: DepartmentsData =
        serde_json::from_str(json).expect("Failed to parse departments.json");

    let mut table: Vec<(Department, Vec<String>)> = data
        .departments
        .into_iter()
        .map(|entry| {
            let department = Department::from_slug(&entry.name)
                .unwrap_or_else(|| panic!("Unknown department in departments.json: {}", entry.name));
            let keywords = entry.keywords.iter().map(|k| k.to_lowercase()).collect();
            (department, keywords)
        })
        .collect();
    // Lookup order is the enum order, whatever order the file lists them in.
    table.sort_by_key(|(department, _)| Department::ALL.iter().position(|d| d == department));
    table
});

/// Fallback keywords checked only when no department keyword matched.
const FALLBACK_RULES: &[(&[&str], Department)] = &[
    (&["sauce", "dressing", "oil"], Department::Condiments),
    (&["cheese"], Department::DairyEggs),
];

/// Categorize an ingredient by name.
///
/// Returns the first department owning a keyword contained in the
/// lower-cased name, then the fallback rules, then `Other`.
pub fn categorize(item: &str) -> Department {
    let lower = item.to_lowercase();

    for (department, keywords) in KEYWORD_TABLE.iter() {
        if keywords.iter().any(|k| lower.contains(k.as_str())) {
            return *department;
        }
    }

    for (keywords, department) in FALLBACK_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *department;
        }
    }

    Department::Other
}

/// Assign a category to each aggregated ingredient.
///
/// A category already carried from the upstream payload is kept as-is.
/// Ingredients that match no department are filed under `unmatched`.
pub fn categorize_all(items: Vec<AggregatedIngredient>, unmatched: &str) -> Vec<CategorizedItem> {
    items
        .into_iter()
        .map(|ingredient| {
            let category = match &ingredient.category {
                Some(category) => category.clone(),
                None => match categorize(&ingredient.display_name) {
                    Department::Other => unmatched.to_string(),
                    department => department.as_str().to_string(),
                },
            };
            CategorizedItem {
                category,
                ingredient,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedQuantity;

    #[test]
    fn test_table_covers_every_department() {
        let departments: Vec<Department> = KEYWORD_TABLE.iter().map(|(d, _)| *d).collect();
        assert_eq!(departments, Department::ALL);
    }

    #[test]
    fn test_produce() {
        assert_eq!(categorize("Onion"), Department::Produce);
        assert_eq!(categorize("tomatoes"), Department::Produce);
        assert_eq!(categorize("Fresh Basil"), Department::Produce);
        assert_eq!(categorize("eggplant"), Department::Produce);
    }

    #[test]
    fn test_meat() {
        assert_eq!(categorize("chicken breast"), Department::MeatSeafood);
        assert_eq!(categorize("Chicken Breast"), Department::MeatSeafood);
        assert_eq!(categorize("salmon fillet"), Department::MeatSeafood);
    }

    #[test]
    fn test_dairy() {
        assert_eq!(categorize("butter"), Department::DairyEggs);
        assert_eq!(categorize("egg"), Department::DairyEggs);
        assert_eq!(categorize("Greek Yogurt"), Department::DairyEggs);
        assert_eq!(categorize("goat cheese"), Department::DairyEggs);
    }

    #[test]
    fn test_department_order_decides_ties() {
        // "almond milk" hits beverages before dairy's "milk"
        assert_eq!(categorize("almond milk"), Department::Beverages);
        // "lemon juice" hits fruits before beverages' "juice"
        assert_eq!(categorize("lemon juice"), Department::Fruits);
    }

    #[test]
    fn test_fallback_rules() {
        assert_eq!(categorize("olive oil"), Department::Condiments);
        assert_eq!(categorize("soy sauce"), Department::Condiments);
        assert_eq!(categorize("ranch dressing"), Department::Condiments);
    }

    #[test]
    fn test_grains_and_spices() {
        assert_eq!(categorize("brown rice"), Department::BreadsGrains);
        assert_eq!(categorize("all-purpose flour"), Department::BakingSpices);
        assert_eq!(categorize("kosher salt"), Department::BakingSpices);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(categorize("xyzfoobar123"), Department::Other);
        assert_eq!(categorize(""), Department::Other);
        assert_eq!(categorize("Unknown Item"), Department::Other);
    }

    #[test]
    fn test_slugs_round_trip() {
        for department in Department::ALL {
            assert_eq!(Department::from_slug(department.as_str()), Some(*department));
        }
        assert_eq!(Department::from_slug("Produce"), None);
    }

    #[test]
    fn test_categorize_all_keeps_upstream_category() {
        let make = |name: &str, category: Option<&str>| AggregatedIngredient {
            display_name: name.to_string(),
            aggregation_key: name.to_lowercase(),
            total_quantity: ParsedQuantity::count(1.0),
            overflow_quantities: vec![],
            category: category.map(str::to_string),
            mention_count: 1,
        };

        let result = categorize_all(
            vec![make("Onion", None), make("Onion Dip", Some("Snacks"))],
            Department::Other.as_str(),
        );
        assert_eq!(result[0].category, "produce");
        assert_eq!(result[1].category, "Snacks");

        let result = categorize_all(vec![make("Xanthan Gum", None), make("Onion", None)], "Other");
        assert_eq!(result[0].category, "Other");
        assert_eq!(result[1].category, "produce");
    }
}
