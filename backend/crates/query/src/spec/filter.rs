//! Filter conditions
//!
//! A [`FilterSpec`] maps field names to conditions. Values stay strings;
//! type coercion happens when a store evaluates the filter.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::params::{CONTROL_KEYS, RawQueryParams, RawValue};

/// Comparison operators understood by stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparisonOp {
    Gt,
    Gte,
    Lt,
    Lte,
    /// Only produced programmatically (resource scopes)
    Ne,
}

impl ComparisonOp {
    /// Operator for a bracket key in a query string.
    /// Only the whole-key range operators are recognised; `ne` is not.
    pub fn from_query_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::Ne => "$ne",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key inside a nested condition: a sub-field or an operator
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Field(String),
    Op(ComparisonOp),
}

impl Serialize for FilterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Field(name) => serializer.serialize_str(name),
            Self::Op(op) => serializer.serialize_str(op.as_str()),
        }
    }
}

/// Condition on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Equality
    Literal(String),
    /// Equal to any of the values
    AnyOf(Vec<String>),
    /// Operators apply to the current field, sub-fields extend the path
    Nested(BTreeMap<FilterKey, FilterValue>),
}

impl FilterValue {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn op(op: ComparisonOp, value: impl Into<String>) -> Self {
        Self::Nested(BTreeMap::from([(
            FilterKey::Op(op),
            Self::Literal(value.into()),
        )]))
    }

    /// Structural rewrite of a raw parameter value: every key that is
    /// exactly a range operator token becomes an operator, at any depth
    fn from_raw(raw: &RawValue) -> Self {
        match raw {
            RawValue::Single(v) => Self::Literal(v.clone()),
            RawValue::Many(values) => Self::AnyOf(values.clone()),
            RawValue::Nested(map) => Self::Nested(
                map.iter()
                    .map(|(key, value)| {
                        let key = ComparisonOp::from_query_token(key)
                            .map(FilterKey::Op)
                            .unwrap_or_else(|| FilterKey::Field(key.clone()));
                        (key, Self::from_raw(value))
                    })
                    .collect(),
            ),
        }
    }

    /// Combine two conditions on the same field; nested maps merge
    /// key-by-key, anything else is replaced by `other`
    fn merge(self, other: FilterValue) -> FilterValue {
        match (self, other) {
            (Self::Nested(mut left), Self::Nested(right)) => {
                for (key, value) in right {
                    let merged = match left.remove(&key) {
                        Some(existing) => existing.merge(value),
                        None => value,
                    };
                    left.insert(key, merged);
                }
                Self::Nested(left)
            }
            (_, other) => other,
        }
    }
}

/// Field conditions, all of which must hold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSpec {
    conditions: BTreeMap<String, FilterValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every non-control parameter becomes a condition
    pub fn from_params(params: &RawQueryParams) -> Self {
        let conditions = params
            .iter()
            .filter(|(key, _)| !CONTROL_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), FilterValue::from_raw(value)))
            .collect();
        Self { conditions }
    }

    pub fn with(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(field, FilterValue::literal(value))
    }

    pub fn compare(
        self,
        field: impl Into<String>,
        op: ComparisonOp,
        value: impl Into<String>,
    ) -> Self {
        self.with(field, FilterValue::op(op, value))
    }

    /// Add a condition, merging with an existing one on the same field
    pub fn insert(&mut self, field: impl Into<String>, value: FilterValue) {
        let field = field.into();
        let merged = match self.conditions.remove(&field) {
            Some(existing) => existing.merge(value),
            None => value,
        };
        self.conditions.insert(field, merged);
    }

    /// Conditions of `other` added on top of these
    pub fn merge(&mut self, other: FilterSpec) {
        for (field, value) in other.conditions {
            self.insert(field, value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.conditions.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Keys are plain strings and values are strings, lists or maps
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_tokens() {
        assert_eq!(ComparisonOp::from_query_token("gte"), Some(ComparisonOp::Gte));
        assert_eq!(ComparisonOp::from_query_token("lt"), Some(ComparisonOp::Lt));
        assert_eq!(ComparisonOp::from_query_token("ne"), None);
        assert_eq!(ComparisonOp::from_query_token("gte_x"), None);
        assert_eq!(ComparisonOp::from_query_token("GTE"), None);
    }

    #[test]
    fn test_from_params_drops_control_keys() {
        let params = RawQueryParams::from_pairs([
            ("page", "2"),
            ("sort", "price"),
            ("limit", "10"),
            ("fields", "name"),
            ("difficulty", "easy"),
        ]);

        let filter = FilterSpec::from_params(&params);
        assert_eq!(filter.to_json(), json!({ "difficulty": "easy" }));
    }

    #[test]
    fn test_rewrite_is_structural() {
        let params = RawQueryParams::from_pairs([
            ("price[lt]", "1000"),
            ("startLocation[coordinates][gte]", "3"),
            ("name[gte_x]", "a"),
            ("note", "gte"),
        ]);

        let filter = FilterSpec::from_params(&params);
        assert_eq!(
            filter.to_json(),
            json!({
                "price": { "$lt": "1000" },
                "startLocation": { "coordinates": { "$gte": "3" } },
                "name": { "gte_x": "a" },
                "note": "gte",
            })
        );
    }

    #[test]
    fn test_merge_combines_nested_conditions() {
        let mut filter = FilterSpec::new().compare("price", ComparisonOp::Gte, "100");
        filter.merge(
            FilterSpec::new()
                .compare("price", ComparisonOp::Lt, "500")
                .eq("difficulty", "easy"),
        );

        assert_eq!(
            filter.to_json(),
            json!({
                "price": { "$gte": "100", "$lt": "500" },
                "difficulty": "easy",
            })
        );
    }

    #[test]
    fn test_merge_replaces_scalars() {
        let mut filter = FilterSpec::new().eq("difficulty", "easy");
        filter.merge(FilterSpec::new().eq("difficulty", "hard"));
        assert_eq!(filter.get("difficulty"), Some(&FilterValue::literal("hard")));
    }
}
