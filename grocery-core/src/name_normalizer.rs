//! Ingredient name normalization.
//!
//! Cleans raw ingredient names into a display name and an aggregation key:
//! notes and preparation words are removed, plurals reduced, and synonyms
//! resolved. Synonym data is loaded from `data/synonyms.json` at compile time.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use crate::types::UNKNOWN_ITEM;

/// A cleaned ingredient name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    /// Display form, original casing kept. Never empty.
    pub canonical_name: String,
    /// Lower-cased, singular, synonym-resolved grouping key.
    pub aggregation_key: String,
}

impl NormalizedName {
    fn unknown() -> Self {
        Self {
            canonical_name: UNKNOWN_ITEM.to_string(),
            aggregation_key: UNKNOWN_ITEM.to_lowercase(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.canonical_name == UNKNOWN_ITEM
    }
}

#[derive(Deserialize)]
struct SynonymsData {
    synonyms: Vec<SynonymEntry>,
}

#[derive(Deserialize)]
struct SynonymEntry {
    canonical: String,
    variants: Vec<String>,
}

/// Synonym table in file order; the first entry with a matching variant wins.
static SYNONYMS: LazyLock<Vec<SynonymEntry>> = LazyLock::new(|| {
    let json = include_str!("../../data/synonyms.json");
    let data: SynonymsData =
        serde_json::from_str(json).expect("synonyms.json should be valid JSON");
    data.synonyms
        .into_iter()
        .map(|entry| SynonymEntry {
            canonical: entry.canonical.to_lowercase(),
            variants: entry.variants.iter().map(|v| v.to_lowercase()).collect(),
        })
        .collect()
});

/// Plural forms reduced to singular, matched as whole words.
const PLURALS: &[(&str, &str)] = &[
    ("eggs", "egg"),
    ("tomatoes", "tomato"),
    ("potatoes", "potato"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("breasts", "breast"),
    ("thighs", "thigh"),
    ("drumsticks", "drumstick"),
    ("wings", "wing"),
    ("fillets", "fillet"),
    ("filets", "filet"),
    ("sausages", "sausage"),
    ("shrimps", "shrimp"),
    ("scallops", "scallop"),
    ("anchovies", "anchovy"),
    ("onions", "onion"),
    ("shallots", "shallot"),
    ("carrots", "carrot"),
    ("peppers", "pepper"),
    ("chilies", "chili"),
    ("chillies", "chilli"),
    ("jalapeños", "jalapeño"),
    ("jalapenos", "jalapeno"),
    ("mushrooms", "mushroom"),
    ("cucumbers", "cucumber"),
    ("radishes", "radish"),
    ("avocados", "avocado"),
    ("mangoes", "mango"),
    ("mangos", "mango"),
    ("peaches", "peach"),
    ("apples", "apple"),
    ("bananas", "banana"),
    ("lemons", "lemon"),
    ("limes", "lime"),
    ("oranges", "orange"),
    ("cherries", "cherry"),
    ("strawberries", "strawberry"),
    ("blueberries", "blueberry"),
    ("raspberries", "raspberry"),
    ("cranberries", "cranberry"),
    ("beans", "bean"),
    ("chickpeas", "chickpea"),
    ("lentils", "lentil"),
    ("noodles", "noodle"),
    ("tortillas", "tortilla"),
    ("buns", "bun"),
    ("rolls", "roll"),
];

/// Preparation and description words stripped from names.
const DESCRIPTORS: &[&str] = &[
    "diced", "chopped", "minced", "sliced", "grated", "crushed", "ground", "cooked", "finely",
    "roughly", "coarsely", "thinly", "freshly",
];

/// Trailing comma clauses containing any of these are dropped.
const PREP_NOTES: &[&str] = &[
    "to taste",
    "as needed",
    "optional",
    "divided",
    "for serving",
    "for garnish",
    "room temperature",
    "cooked",
    "diced",
    "chopped",
    "minced",
    "sliced",
    "grated",
    "crushed",
    "ground",
    "peeled",
    "trimmed",
    "drained",
    "rinsed",
    "softened",
    "melted",
    "shredded",
    "cubed",
    "halved",
    "quartered",
    "thawed",
    "beaten",
    "sifted",
    "packed",
    "seeded",
    "deveined",
];

/// Words ending in "s" that are not plurals.
const NON_PLURAL_S: &[&str] = &[
    "hummus",
    "berries",
    "leaves",
    "asparagus",
    "couscous",
    "molasses",
    "brussels",
    "greens",
    "grits",
    "citrus",
    "swiss",
];

static NUMERIC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?\s*$").expect("valid regex"));

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

static DANGLING_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:and|or)\b|\b(?:and|or)$").expect("valid regex"));

static PLURAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let words: Vec<String> = PLURALS.iter().map(|(p, _)| regex::escape(p)).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).expect("valid regex")
});

static SINGULARS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| PLURALS.iter().copied().collect());

static DESCRIPTOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", DESCRIPTORS.join("|"))).expect("valid regex")
});

/// Normalize a raw ingredient name.
///
/// Purely numeric, empty, or all-noise names resolve to "Unknown Item".
pub fn normalize_name(raw: &str) -> NormalizedName {
    let raw = raw.trim();
    if raw.is_empty() || NUMERIC_NAME.is_match(raw) {
        return NormalizedName::unknown();
    }

    let without_notes = strip_notes(raw);
    let singular = singularize(&without_notes);
    let stripped = DESCRIPTOR_PATTERN.replace_all(&singular, " ");
    let cleaned = tidy(&stripped);

    if !cleaned.chars().any(char::is_alphabetic) {
        return NormalizedName::unknown();
    }

    let aggregation_key = aggregation_key(&cleaned);
    NormalizedName {
        canonical_name: cleaned,
        aggregation_key,
    }
}

/// Drop parenthetical notes and trailing preparation clauses.
fn strip_notes(name: &str) -> String {
    let mut name = PARENTHETICAL.replace_all(name, " ").into_owned();

    while let Some(idx) = name.rfind(',') {
        let clause = name[idx + 1..].trim();
        if clause.is_empty() || is_prep_note(clause) {
            name.truncate(idx);
        } else {
            break;
        }
    }
    name
}

fn is_prep_note(s: &str) -> bool {
    let lower = s.to_lowercase();
    PREP_NOTES.iter().any(|note| lower.contains(note))
}

/// Replace known plurals with their singular, keeping the original casing style.
pub fn singularize(name: &str) -> String {
    PLURAL_PATTERN
        .replace_all(name, |caps: &Captures| {
            let word = &caps[0];
            let singular = SINGULARS
                .get(word.to_lowercase().as_str())
                .copied()
                .unwrap_or(word);
            match_case(word, singular)
        })
        .into_owned()
}

fn match_case(original: &str, replacement: &str) -> String {
    let mut chars = original.chars();
    let Some(first) = chars.next() else {
        return replacement.to_string();
    };

    if original.chars().count() > 1 && original.chars().all(|c| !c.is_lowercase()) {
        return replacement.to_uppercase();
    }
    if first.is_uppercase() {
        let mut rest = replacement.chars();
        return match rest.next() {
            Some(head) => head.to_uppercase().chain(rest).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

/// Collapse whitespace and trim stray punctuation and connectors.
fn tidy(s: &str) -> String {
    let trim = |s: &str| -> String {
        s.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .replace(" ,", ",")
            .trim_matches(|c: char| c == ',' || c == ';' || c == '-' || c.is_whitespace())
            .to_string()
    };

    let mut out = trim(s);
    loop {
        let next = trim(&DANGLING_CONNECTOR.replace_all(&out, ""));
        if next == out {
            return out;
        }
        out = next;
    }
}

/// Compute the grouping key for an already-cleaned name.
///
/// A synonym match gives its canonical term; otherwise the lower-cased
/// name with a plural "s" dropped from its last word.
pub fn aggregation_key(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let singular = strip_plural_suffix(&lower);
    resolve_synonym(&lower)
        .or_else(|| resolve_synonym(&singular))
        .map(str::to_string)
        .unwrap_or(singular)
}

/// Find the canonical term whose variant appears in `lower` as whole words.
pub fn resolve_synonym(lower: &str) -> Option<&'static str> {
    SYNONYMS
        .iter()
        .find(|entry| entry.variants.iter().any(|v| contains_phrase(lower, v)))
        .map(|entry| entry.canonical.as_str())
}

fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[start + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

fn strip_plural_suffix(lower: &str) -> String {
    let (head, last) = match lower.rfind(' ') {
        Some(idx) => (&lower[..=idx], &lower[idx + 1..]),
        None => ("", lower),
    };

    let keep = last.len() <= 3
        || !last.ends_with('s')
        || last.ends_with("ss")
        || last.ends_with("us")
        || last.ends_with("ies")
        || NON_PLURAL_S.contains(&last);

    if keep {
        lower.to_string()
    } else {
        format!("{}{}", head, &last[..last.len() - 1])
    }
}
