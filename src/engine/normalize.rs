use crate::eval::Evaluator;
use regex::Regex;
use std::sync::OnceLock;

/// Inserted between digit groups of radix results.
pub const GROUP_SEPARATOR: char = ' ';

/// Formatted result split for alignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayValue {
    /// Leading numeric or radix text, right-aligned across the document.
    pub value: String,
    /// Trailing unit, including its leading whitespace, or empty.
    pub unit: String,
}

fn radix_re() -> &'static Regex {
    static RADIX_RE: OnceLock<Regex> = OnceLock::new();
    RADIX_RE.get_or_init(|| {
        Regex::new(r#"^"?0(?:b([01]+)|x([0-9a-fA-F]+)|o([0-7]+))"?$"#).expect("valid regex")
    })
}

fn unit_re() -> &'static Regex {
    static UNIT_RE: OnceLock<Regex> = OnceLock::new();
    UNIT_RE.get_or_init(|| Regex::new(r"(?s)^(.*?)(\s+[a-zA-Z].*)?$").expect("valid regex"))
}

/// Format `value` and normalise it; `None` for values that are never shown.
pub fn normalize_value<E>(evaluator: &E, value: &E::Value, precision: usize) -> Option<DisplayValue>
where
    E: Evaluator + ?Sized,
{
    if !evaluator.is_displayable(value) {
        return None;
    }
    Some(normalize(&evaluator.format(value, precision)))
}

/// Canonical display form of an evaluator-formatted result.
pub fn normalize(text: &str) -> DisplayValue {
    if let Some(grouped) = regroup_radix(text) {
        return DisplayValue {
            value: grouped,
            unit: String::new(),
        };
    }
    split_unit(text)
}

/// `"0x1a2b"` becomes `1A 2B`, `0b101101` becomes `10 1101`, `0o7777`
/// becomes `7 777`. Groups are counted from the least significant digit.
pub fn regroup_radix(text: &str) -> Option<String> {
    let captures = radix_re().captures(text)?;

    if let Some(bits) = captures.get(1) {
        Some(group_from_end(bits.as_str(), 4))
    } else if let Some(hex) = captures.get(2) {
        Some(group_from_end(&hex.as_str().to_ascii_uppercase(), 2))
    } else {
        captures
            .get(3)
            .map(|octal| group_from_end(octal.as_str(), 3))
    }
}

/// Split off a trailing unit: whitespace followed by a letter, then the rest.
pub fn split_unit(text: &str) -> DisplayValue {
    match unit_re().captures(text) {
        Some(captures) => DisplayValue {
            value: captures.get(1).map_or("", |m| m.as_str()).to_string(),
            unit: captures.get(2).map_or("", |m| m.as_str()).to_string(),
        },
        None => DisplayValue {
            value: text.to_string(),
            unit: String::new(),
        },
    }
}

fn group_from_end(digits: &str, size: usize) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + count / size);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (count - i) % size == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}
