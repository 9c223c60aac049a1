//! Filter conditions for repository queries.
//!
//! Conditions are produced by the typed per-entity filters, so column names
//! always come from code, never from request input. Storage backends either
//! render them into SQL or evaluate them in memory with [`FilterField::matches`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// SQL `ILIKE` case-insensitive pattern match (`%` and `_` wildcards,
    /// a backslash escapes the next character).
    ILike,
}

impl FilterOp {
    /// Return the SQL operator for this comparison.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::ILike => "ILIKE",
        }
    }
}

/// A filter value that can represent the column types used by entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
}

impl FilterValue {
    fn compare(&self, other: &FilterValue) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            _ => None,
        }
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A single filter condition on a named column.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterField {
    /// The column name to filter on.
    pub field: &'static str,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: &'static str, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Self {
            field,
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: &'static str, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Shorthand for a case-insensitive substring filter. Wildcards in
    /// `needle` match literally.
    pub fn contains(field: &'static str, needle: &str) -> Self {
        Self::new(field, FilterOp::ILike, format!("%{}%", escape_like(needle)))
    }

    /// Evaluate this condition against the actual column value.
    ///
    /// Values of incompatible types never match.
    pub fn matches(&self, actual: &FilterValue) -> bool {
        if let FilterOp::ILike = self.op {
            return match (actual, &self.value) {
                (FilterValue::String(text), FilterValue::String(pattern)) => {
                    ilike(text, pattern)
                }
                _ => false,
            };
        }

        match (self.op, actual.compare(&self.value)) {
            (_, None) => false,
            (FilterOp::Eq, Some(ordering)) => ordering == Ordering::Equal,
            (FilterOp::Ne, Some(ordering)) => ordering != Ordering::Equal,
            (FilterOp::Gt, Some(ordering)) => ordering == Ordering::Greater,
            (FilterOp::Gte, Some(ordering)) => ordering != Ordering::Less,
            (FilterOp::Lt, Some(ordering)) => ordering == Ordering::Less,
            (FilterOp::Lte, Some(ordering)) => ordering != Ordering::Greater,
            (FilterOp::ILike, Some(_)) => false,
        }
    }
}

/// Escape `LIKE` wildcards so `value` matches only itself.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Escape character used in `LIKE` patterns.
pub const LIKE_ESCAPE: char = '\\';

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    Any,
    One,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            LIKE_ESCAPE => LikeToken::Literal(chars.next().unwrap_or(LIKE_ESCAPE)),
            '%' => LikeToken::Any,
            '_' => LikeToken::One,
            c => LikeToken::Literal(c),
        });
    }
    tokens
}

/// Case-insensitive SQL `LIKE` matching.
fn ilike(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern = like_tokens(&pattern.to_lowercase());

    // matched[j] == pattern[..j] matches text[..i]
    let mut matched = vec![false; pattern.len() + 1];
    matched[0] = true;
    for j in 1..=pattern.len() {
        matched[j] = matched[j - 1] && pattern[j - 1] == LikeToken::Any;
    }

    for c in &text {
        let mut next = vec![false; pattern.len() + 1];
        for j in 1..=pattern.len() {
            next[j] = match pattern[j - 1] {
                LikeToken::Any => next[j - 1] || matched[j],
                LikeToken::One => matched[j - 1],
                LikeToken::Literal(p) => matched[j - 1] && p == *c,
            };
        }
        matched = next;
    }

    matched[pattern.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_comparisons() {
        let actual = FilterValue::Integer(5);
        assert!(FilterField::eq("id", 5).matches(&actual));
        assert!(FilterField::new("id", FilterOp::Gt, 4).matches(&actual));
        assert!(!FilterField::new("id", FilterOp::Lt, 5).matches(&actual));
        assert!(FilterField::new("id", FilterOp::Lte, 5).matches(&actual));
    }

    #[test]
    fn test_mixed_numeric_comparison() {
        let rating = FilterValue::Float(4.5);
        assert!(FilterField::new("rating", FilterOp::Gte, 4).matches(&rating));
        assert!(!FilterField::new("rating", FilterOp::Gt, 4.5).matches(&rating));
    }

    #[test]
    fn test_type_mismatch_never_matches() {
        let name = FilterValue::String("Jamaica".into());
        assert!(!FilterField::eq("name", 1).matches(&name));
        assert!(!FilterField::new("name", FilterOp::Ne, 1).matches(&name));
    }

    #[test]
    fn test_ilike_wildcards() {
        assert!(ilike("Sandals Resort and Spa", "%resort%"));
        assert!(ilike("Jamaica", "jam%"));
        assert!(!ilike("Jamaica", "%jam"));
        assert!(ilike("JM", "j_"));
        assert!(!ilike("JMX", "j_"));
        assert!(ilike("", "%"));
    }

    #[test]
    fn test_contains_helper() {
        let field = FilterField::contains("name", "palld");
        assert!(field.matches(&FilterValue::String("Grand Palldium".into())));
    }

    #[test]
    fn test_contains_treats_wildcards_literally() {
        let underscore = FilterField::contains("name", "_");
        assert!(!underscore.matches(&FilterValue::String("Jamaica".into())));
        assert!(underscore.matches(&FilterValue::String("Half_Moon".into())));

        let percent = FilterField::contains("name", "100%");
        assert!(!percent.matches(&FilterValue::String("1000 Palms".into())));
        assert!(percent.matches(&FilterValue::String("100% Beach".into())));

        let backslash = FilterField::contains("address", "a\\b");
        assert!(backslash.matches(&FilterValue::String("xa\\by".into())));
        assert!(!backslash.matches(&FilterValue::String("xab".into())));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Negril"), "Negril");
    }
}
