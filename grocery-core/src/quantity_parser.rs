//! Quantity parsing module.
//!
//! Splits raw quantity strings (e.g., "16 oz", "1 1/2 cups") into a numeric
//! magnitude and a unit token, and pulls leading quantities off free-text
//! ingredient lines (e.g., "2 lb chicken breast").

use std::sync::LazyLock;

use regex::Regex;

use crate::types::ParsedQuantity;

/// Canonical unit spellings and the aliases that map onto them.
const UNIT_ALIASES: &[(&str, &[&str])] = &[
    // Weight
    ("lb", &["lb", "lbs", "pound", "pounds"]),
    ("oz", &["oz", "ounce", "ounces"]),
    ("g", &["g", "gr", "gram", "grams"]),
    ("kg", &["kg", "kgs", "kilogram", "kilograms"]),
    ("mg", &["mg", "milligram", "milligrams"]),
    // Volume
    (
        "fl oz",
        &["fl oz", "fl. oz", "fluid ounce", "fluid ounces"],
    ),
    ("cup", &["cup", "cups", "c"]),
    ("tbsp", &["tbsp", "tbs", "tb", "tablespoon", "tablespoons"]),
    ("tsp", &["tsp", "ts", "teaspoon", "teaspoons"]),
    ("ml", &["ml", "milliliter", "milliliters", "millilitre", "millilitres"]),
    ("l", &["l", "liter", "liters", "litre", "litres"]),
    ("pint", &["pint", "pints", "pt"]),
    ("quart", &["quart", "quarts", "qt"]),
    ("gallon", &["gallon", "gallons", "gal"]),
    // Count
    ("piece", &["piece", "pieces", "pc", "pcs"]),
    ("clove", &["clove", "cloves"]),
    ("can", &["can", "cans"]),
    ("jar", &["jar", "jars"]),
    ("bottle", &["bottle", "bottles"]),
    ("package", &["package", "packages", "pkg", "pkgs"]),
    ("bag", &["bag", "bags"]),
    ("box", &["box", "boxes"]),
    ("bunch", &["bunch", "bunches"]),
    ("head", &["head", "heads"]),
    ("slice", &["slice", "slices"]),
    ("stalk", &["stalk", "stalks"]),
    ("sprig", &["sprig", "sprigs"]),
    ("stick", &["stick", "sticks"]),
    ("pinch", &["pinch", "pinches"]),
    ("dash", &["dash", "dashes"]),
    ("dozen", &["dozen"]),
    ("medium", &["medium"]),
];

/// All unit aliases, longest first so "tablespoons" wins over "tb".
static UNITS_BY_LENGTH: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut units: Vec<&'static str> = UNIT_ALIASES
        .iter()
        .flat_map(|(_, aliases)| aliases.iter().copied())
        .collect();
    units.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    units
});

static MIXED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(\d+)/(\d+)").expect("valid regex"));
static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/(\d+)").expect("valid regex"));
static VULGAR_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\d+)\s*)?([½⅓⅔¼¾⅛⅜⅝⅞])").expect("valid regex"));
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?").expect("valid regex"));
static RANGE_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-–]\s*|(?:to|or)\s+)\d+(?:\.\d+)?(?:/\d+)?").expect("valid regex")
});

/// Parse a raw quantity string into magnitude and unit.
///
/// - `None` or blank input means one unit of the ingredient: `(1, "")`.
/// - A leading number becomes the magnitude; the rest is the unit, trimmed,
///   lower-cased, with a trailing period removed.
/// - Anything else (no leading number, or a range like "2-3 cups") is
///   returned opaque and will not merge with other quantities.
pub fn parse_quantity(raw: Option<&str>) -> ParsedQuantity {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return ParsedQuantity::count(1.0);
    };

    match leading_amount(raw) {
        Some((value, consumed)) => {
            let rest = raw[consumed..].trim_start();
            if RANGE_TAIL.is_match(rest) {
                return ParsedQuantity::opaque(raw);
            }
            ParsedQuantity::new(value, clean_unit(rest))
        }
        None => ParsedQuantity::opaque(raw),
    }
}

/// Lower-case, trim and drop a trailing period from a unit token.
fn clean_unit(unit: &str) -> String {
    let unit = unit.trim().to_lowercase();
    let unit = unit.trim_end_matches('.').trim();
    unit.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read the numeric token at the start of `s`.
///
/// Returns the value and the number of bytes consumed.
pub fn leading_amount(s: &str) -> Option<(f64, usize)> {
    if let Some(caps) = MIXED_NUMBER.captures(s) {
        let whole: f64 = caps[1].parse().ok()?;
        if let Some(fraction) = ratio(&caps[2], &caps[3]) {
            return Some((whole + fraction, caps[0].len()));
        }
    }

    if let Some(caps) = FRACTION.captures(s) {
        if let Some(fraction) = ratio(&caps[1], &caps[2]) {
            return Some((fraction, caps[0].len()));
        }
    }

    if let Some(caps) = VULGAR_FRACTION.captures(s) {
        let whole: f64 = match caps.get(1) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0.0,
        };
        let fraction = vulgar_value(caps[2].chars().next()?)?;
        return Some((whole + fraction, caps[0].len()));
    }

    let m = DECIMAL.find(s)?;
    let value: f64 = m.as_str().parse().ok()?;
    Some((value, m.end()))
}

fn ratio(numerator: &str, denominator: &str) -> Option<f64> {
    let numerator: f64 = numerator.parse().ok()?;
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

fn vulgar_value(c: char) -> Option<f64> {
    let value = match c {
        '½' => 1.0 / 2.0,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 1.0 / 4.0,
        '¾' => 3.0 / 4.0,
        '⅛' => 1.0 / 8.0,
        '⅜' => 3.0 / 8.0,
        '⅝' => 5.0 / 8.0,
        '⅞' => 7.0 / 8.0,
        _ => return None,
    };
    Some(value)
}

/// Map a unit token onto its canonical spelling ("lbs" -> "lb").
///
/// Unknown units are returned lower-cased and otherwise untouched.
pub fn canonical_unit(unit: &str) -> String {
    let lower = clean_unit(unit);
    UNIT_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&lower.as_str()))
        .map(|(canonical, _)| (*canonical).to_string())
        .unwrap_or(lower)
}

/// Check whether a token is a recognised cooking unit.
pub fn is_known_unit(unit: &str) -> bool {
    let lower = clean_unit(unit);
    UNIT_ALIASES
        .iter()
        .any(|(_, aliases)| aliases.contains(&lower.as_str()))
}

/// Split the leading quantities off a free-text ingredient line.
///
/// "2 lb chicken breast" becomes `(["2 lb"], "chicken breast")`. A unit is
/// only taken when the word after the number is a known unit, so "2 onions"
/// becomes `(["2"], "onions")`.
///
/// Rendered shopping list lines chain quantities with ", " and wrap
/// quantities that would not read back on their own in parentheses, so
/// "1 cup, 200 g rice" gives `(["1 cup", "200 g"], "rice")` and
/// "(to taste) pepper" gives `(["to taste"], "pepper")`.
///
/// Lines without a leading quantity, or whose name would be empty, are
/// returned unchanged with no quantities.
pub fn split_quantity_chain(line: &str) -> (Vec<String>, String) {
    let line = line.trim();
    let (quantities, rest) = take_quantity_chain(line);

    let name = rest.trim_start_matches(|c: char| c == ',' || c == '.' || c.is_whitespace());
    let name = name
        .strip_prefix("of ")
        .or_else(|| name.strip_prefix("Of "))
        .unwrap_or(name)
        .trim();

    if quantities.is_empty() || name.is_empty() {
        return (Vec::new(), line.to_string());
    }
    (quantities, name.to_string())
}

/// Consume a ", "-separated chain of quantities from the start of `s`.
///
/// Returns the quantities in order and the unconsumed remainder.
pub fn take_quantity_chain(s: &str) -> (Vec<String>, &str) {
    let mut quantities = Vec::new();
    let mut rest = s.trim_start();

    while let Some((quantity, len)) = leading_quantity(rest) {
        quantities.push(quantity);
        rest = &rest[len..];
        match rest.strip_prefix(',').map(str::trim_start) {
            Some(next) if leading_quantity(next).is_some() => rest = next,
            _ => break,
        }
    }
    (quantities, rest)
}

/// Whether `text` reads back as exactly one quantity token.
///
/// Quantities that don't (opaque text, unknown units) are rendered in
/// parentheses so a rendered line splits the same way again.
pub fn is_bare_quantity(text: &str) -> bool {
    quantity_len(text) == Some(text.len())
}

/// The quantity at the start of `s` and the number of bytes it spans.
fn leading_quantity(s: &str) -> Option<(String, usize)> {
    if s.starts_with('(') {
        let close = matching_paren(s)?;
        let text = s[1..close].trim();
        if text.is_empty() {
            return None;
        }
        return Some((text.to_string(), close + 1));
    }

    let len = quantity_len(s)?;
    Some((s[..len].trim().to_string(), len))
}

/// Byte index of the parenthesis closing the one at the start of `s`.
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Length in bytes of the number, optional range tail and known unit at the
/// start of `s`.
fn quantity_len(s: &str) -> Option<usize> {
    let (_, mut end) = leading_amount(s)?;

    let rest = &s[end..];
    let trimmed = rest.trim_start();
    if let Some(m) = RANGE_TAIL.find(trimmed) {
        end += rest.len() - trimmed.len() + m.end();
    }

    let rest = &s[end..];
    let trimmed = rest.trim_start();
    if let Some(unit_len) = match_unit(trimmed) {
        end += rest.len() - trimmed.len() + unit_len;
    }
    Some(end)
}

/// Length in bytes of a unit at the start of `s`, respecting word boundaries.
fn match_unit(s: &str) -> Option<usize> {
    let lower = s.to_lowercase();
    // Lower-casing may change byte lengths for non-ASCII input.
    if lower.len() != s.len() {
        return None;
    }

    for &unit in UNITS_BY_LENGTH.iter() {
        if lower.starts_with(unit) {
            let after = &s[unit.len()..];
            if after.is_empty() {
                return Some(unit.len());
            }
            if after.starts_with(|c: char| c.is_whitespace() || c == ',') {
                return Some(unit.len());
            }
            if after.starts_with('.') {
                return Some(unit.len() + 1);
            }
        }
    }
    None
}
