//! Sort order

use serde::Serialize;

/// Ordering used when a request has no `sort` parameter
pub const DEFAULT_SORT: &str = "-createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// `-price` sorts descending, `price` ascending
    fn parse(token: &str) -> Option<Self> {
        match token.strip_prefix('-') {
            Some("") => None,
            Some(field) => Some(Self::desc(field)),
            None if token.is_empty() => None,
            None => Some(Self::asc(token)),
        }
    }
}

/// Sort keys in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderSpec {
    keys: Vec<SortKey>,
}

impl OrderSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Parse a comma-separated `sort` value; empty tokens are skipped
    pub fn parse(raw: &str) -> Self {
        let keys = raw
            .split(',')
            .map(str::trim)
            .filter_map(SortKey::parse)
            .collect();
        Self { keys }
    }

    /// Newest first
    pub fn default_order() -> Self {
        Self::parse(DEFAULT_SORT)
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directions() {
        assert_eq!(
            OrderSpec::parse("-price,ratingsAverage").keys(),
            &[SortKey::desc("price"), SortKey::asc("ratingsAverage")]
        );
    }

    #[test]
    fn test_parse_skips_empty_tokens() {
        assert_eq!(
            OrderSpec::parse("price,,-,  name ").keys(),
            &[SortKey::asc("price"), SortKey::asc("name")]
        );
        assert!(OrderSpec::parse("").is_empty());
    }

    #[test]
    fn test_default_is_newest_first() {
        assert_eq!(
            OrderSpec::default_order().keys(),
            &[SortKey::desc("createdAt")]
        );
    }
}
