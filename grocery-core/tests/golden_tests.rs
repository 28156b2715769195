//! Golden file tests for shopping list normalization.
//!
//! Each fixture in `fixtures/shopping_list/` holds an upstream payload and the
//! exact shopping list it must produce, including category and item order.

use glob::glob;
use grocery_core::run_pipeline;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A test case loaded from a JSON fixture file
#[derive(Debug, Deserialize)]
struct TestCase {
    input: serde_json::Value,
    expected: serde_json::Value,
}

/// Load all test cases from the fixtures directory
fn load_test_cases() -> Vec<(String, TestCase)> {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shopping_list");
    let pattern = fixtures_dir.join("*.json");
    let pattern_str = pattern.to_string_lossy();

    let mut cases = Vec::new();
    for entry in glob(&pattern_str).expect("Failed to read glob pattern") {
        let path = entry.expect("Failed to read glob entry");
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
        let case: TestCase = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e));
        cases.push((name, case));
    }

    assert!(
        !cases.is_empty(),
        "No test fixtures found in {:?}",
        fixtures_dir
    );
    cases
}

#[test]
fn test_shopping_list_golden_files() {
    let mut failures = Vec::new();

    for (name, case) in load_test_cases() {
        let list = run_pipeline(&case.input)
            .unwrap_or_else(|e| panic!("Pipeline failed for {}: {}", name, e));

        // Compare serialized text so category and item order are checked too.
        let actual = serde_json::to_string_pretty(&list).unwrap();
        let expected = serde_json::to_string_pretty(&case.expected).unwrap();
        if actual != expected {
            failures.push(format!(
                "{}\n\nExpected:\n{}\n\nActual:\n{}",
                name, expected, actual
            ));
        }
    }

    assert!(
        failures.is_empty(),
        "{} golden file(s) differ:\n\n{}",
        failures.len(),
        failures.join("\n\n---\n\n")
    );
}

#[test]
fn test_golden_outputs_are_fixed_points() {
    // Feeding a produced list back in must return it unchanged.
    for (name, case) in load_test_cases() {
        let first = run_pipeline(&case.input).unwrap();
        let reparsed = serde_json::to_value(&first).unwrap();
        let second = run_pipeline(&reparsed).unwrap();
        assert_eq!(first, second, "Output of {} is not a fixed point", name);
    }
}
