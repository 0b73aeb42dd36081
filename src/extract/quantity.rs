//! Quantity expression parsing
//!
//! Material text on item pages comes in several loose shapes. Each line or
//! segment is tried against an ordered list of patterns; the first match
//! wins. Colon and parenthesis forms come before the looser `x` infix and
//! dash forms so names containing dashes or the letter "x" misparse less.

use crate::catalog::Material;
use regex::Regex;
use std::sync::LazyLock;

/// Which capture group holds what in a [`TextPattern`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupOrder {
    NameFirst,
    QuantityFirst,
}

struct TextPattern {
    regex: Regex,
    order: GroupOrder,
}

impl TextPattern {
    fn new(pattern: &str, order: GroupOrder) -> Self {
        Self {
            regex: Regex::new(pattern).expect("material pattern must compile"),
            order,
        }
    }
}

static TEXT_PATTERNS: LazyLock<Vec<TextPattern>> = LazyLock::new(|| {
    vec![
        // Steel: 5
        TextPattern::new(r"(?i)(.+?):\s*(\d+)", GroupOrder::NameFirst),
        // Steel (5)
        TextPattern::new(r"(?i)(.+?)\s*\((\d+)\)", GroupOrder::NameFirst),
        // Steel x5
        TextPattern::new(r"(?i)(.+?)\s*x\s*(\d+)", GroupOrder::NameFirst),
        // 5x Steel
        TextPattern::new(r"(?i)(\d+)\s*x\s*(.+)", GroupOrder::QuantityFirst),
        // Steel - 5
        TextPattern::new(r"(?i)(.+?)\s*-\s*(\d+)", GroupOrder::NameFirst),
    ]
});

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("integer pattern must compile"));

static SEGMENT_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;/\n]+").expect("delimiter pattern must compile"));

/// Parses one line of text into a material
///
/// The multiplication glyph `×` is treated as `x`. Returns `None` when no
/// pattern matches, the name is blank, or the quantity does not fit a `u64`.
///
/// # Example
///
/// ```
/// use recycling_tracker::extract::parse_material_text;
///
/// let material = parse_material_text("2× Metal Parts").unwrap();
/// assert_eq!(material.name, "Metal Parts");
/// assert_eq!(material.quantity, 2);
/// ```
pub fn parse_material_text(text: &str) -> Option<Material> {
    let normalized = text.replace('×', "x");

    let (pattern, captures) = TEXT_PATTERNS
        .iter()
        .find_map(|p| p.regex.captures(&normalized).map(|c| (p, c)))?;

    let (name, quantity) = match pattern.order {
        GroupOrder::NameFirst => (&captures[1], &captures[2]),
        GroupOrder::QuantityFirst => (&captures[2], &captures[1]),
    };

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let quantity = quantity.parse::<u64>().ok()?;
    Some(Material::new(name, quantity))
}

/// Returns the first integer literal in `text`, e.g. `"x2 pending"` → 2
pub fn parse_quantity(text: &str) -> Option<u64> {
    FIRST_INTEGER.find(text)?.as_str().parse().ok()
}

/// Splits a multi-material cell on commas, semicolons, slashes and newlines
pub fn split_segments(text: &str) -> impl Iterator<Item = &str> {
    SEGMENT_DELIMITERS
        .split(text)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}
