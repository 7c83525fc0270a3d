//! Raw query parameters
//!
//! Query strings arrive as flat `(key, value)` pairs. Keys may use bracket
//! notation (`duration[gte]=5`, `a[b][c]=1`, `tags[]=x`), which is expanded
//! into nested [`RawValue::Nested`] maps. Repeating a plain key collects
//! its values into [`RawValue::Many`].

use std::collections::BTreeMap;

use serde::Serialize;

/// Nesting deeper than this keeps the remaining brackets as a literal key
const MAX_DEPTH: usize = 5;

/// Control parameters that never become filter conditions
pub const CONTROL_KEYS: [&str; 4] = ["page", "sort", "limit", "fields"];

/// A single parameter value after bracket expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    Many(Vec<String>),
    Nested(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Scalar view of the value; a repeated key yields its last occurrence
    pub fn last(&self) -> Option<&str> {
        match self {
            Self::Single(v) => Some(v),
            Self::Many(values) => values.last().map(String::as_str),
            Self::Nested(_) => None,
        }
    }
}

/// Parsed query parameters of one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawQueryParams {
    entries: BTreeMap<String, RawValue>,
}

impl RawQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded `(key, value)` pairs in request order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.push(key.as_ref(), value.into());
        }
        params
    }

    /// Add one decoded pair, expanding bracket notation in `key`
    pub fn push(&mut self, key: &str, value: String) {
        let path = split_key(key);
        insert_path(&mut self.entries, &path, value);
    }

    /// Replace `key` with a single value, as the top-5 alias does
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .insert(key.into(), RawValue::Single(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key)
    }

    /// Scalar value of a control parameter (`page`, `sort`, ...)
    pub fn control(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(RawValue::last)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawQueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

/// `a[b][c]` -> `["a", "b", "c"]`; `tags[]` -> `["tags", ""]`.
/// Malformed keys (`a[b`, `[x]`, `a]b`) are kept whole.
fn split_key(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };
    if open == 0 {
        return vec![key.to_string()];
    }

    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open..];

    while let Some(stripped) = rest.strip_prefix('[') {
        if segments.len() > MAX_DEPTH {
            segments.push(rest.to_string());
            return segments;
        }
        let Some(close) = stripped.find(']') else {
            return vec![key.to_string()];
        };
        let segment = &stripped[..close];
        if segment.contains('[') {
            return vec![key.to_string()];
        }
        segments.push(segment.to_string());
        rest = &stripped[close + 1..];
    }

    if rest.is_empty() {
        segments
    } else {
        vec![key.to_string()]
    }
}

fn insert_path(map: &mut BTreeMap<String, RawValue>, path: &[String], value: String) {
    let Some((head, tail)) = path.split_first() else {
        return;
    };

    // `tags[]=x` appends without creating a nested level
    let append_only = tail.len() == 1 && tail[0].is_empty();

    if tail.is_empty() || append_only {
        match map.get_mut(head) {
            None if append_only => {
                map.insert(head.clone(), RawValue::Many(vec![value]));
            }
            None => {
                map.insert(head.clone(), RawValue::Single(value));
            }
            Some(RawValue::Single(existing)) => {
                let first = std::mem::take(existing);
                map.insert(head.clone(), RawValue::Many(vec![first, value]));
            }
            Some(RawValue::Many(values)) => values.push(value),
            // A scalar after a nested value for the same key is dropped
            Some(RawValue::Nested(_)) => {}
        }
        return;
    }

    match map
        .entry(head.clone())
        .or_insert_with(|| RawValue::Nested(BTreeMap::new()))
    {
        RawValue::Nested(inner) => insert_path(inner, tail, value),
        // A nested value after a scalar for the same key is dropped
        RawValue::Single(_) | RawValue::Many(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested(pairs: &[(&str, RawValue)]) -> RawValue {
        RawValue::Nested(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn single(v: &str) -> RawValue {
        RawValue::Single(v.to_string())
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("duration"), vec!["duration"]);
        assert_eq!(split_key("duration[gte]"), vec!["duration", "gte"]);
        assert_eq!(split_key("a[b][c]"), vec!["a", "b", "c"]);
        assert_eq!(split_key("tags[]"), vec!["tags", ""]);
        assert_eq!(split_key("a[b"), vec!["a[b"]);
        assert_eq!(split_key("[x]"), vec!["[x]"]);
        assert_eq!(split_key("a[b]c"), vec!["a[b]c"]);
    }

    #[test]
    fn test_depth_limit_keeps_remainder() {
        let segments = split_key("a[1][2][3][4][5][6][7]");
        assert_eq!(segments.len(), MAX_DEPTH + 2);
        assert_eq!(segments.last().unwrap(), "[6][7]");
    }

    #[test]
    fn test_bracket_expansion() {
        let params = RawQueryParams::from_pairs([
            ("duration[gte]", "5"),
            ("duration[lt]", "9"),
            ("difficulty", "easy"),
        ]);

        assert_eq!(params.get("difficulty"), Some(&single("easy")));
        assert_eq!(
            params.get("duration"),
            Some(&nested(&[("gte", single("5")), ("lt", single("9"))]))
        );
    }

    #[test]
    fn test_repeated_key_collects() {
        let params = RawQueryParams::from_pairs([
            ("difficulty", "easy"),
            ("difficulty", "medium"),
            ("tags[]", "a"),
        ]);

        assert_eq!(
            params.get("difficulty"),
            Some(&RawValue::Many(vec!["easy".into(), "medium".into()]))
        );
        assert_eq!(params.get("tags"), Some(&RawValue::Many(vec!["a".into()])));
    }

    #[test]
    fn test_control_uses_last_value() {
        let params = RawQueryParams::from_pairs([("sort", "price"), ("sort", "-name")]);
        assert_eq!(params.control("sort"), Some("-name"));
        assert_eq!(params.control("page"), None);
    }

    #[test]
    fn test_conflicting_shapes_keep_first() {
        let params = RawQueryParams::from_pairs([("a", "1"), ("a[b]", "2")]);
        assert_eq!(params.get("a"), Some(&single("1")));

        let params = RawQueryParams::from_pairs([("a[b]", "2"), ("a", "1")]);
        assert_eq!(params.get("a"), Some(&nested(&[("b", single("2"))])));
    }

    #[test]
    fn test_set_overrides() {
        let params = RawQueryParams::from_pairs([("limit", "100"), ("sort", "name")])
            .set("limit", "5")
            .set("fields", "name,price");

        assert_eq!(params.control("limit"), Some("5"));
        assert_eq!(params.control("sort"), Some("name"));
        assert_eq!(params.control("fields"), Some("name,price"));
        assert_eq!(params.len(), 3);
    }
}
