//! In-memory execution of a [`DocumentQuery`]
//!
//! Filter values are strings; they are coerced against the stored JSON:
//!
//! - equality: a string field compares as text, a number field compares
//!   numerically, a boolean field accepts `"true"` / `"false"`
//! - range operators compare numbers with numbers and strings with strings
//!   (ISO-8601 dates order correctly as strings); other pairs never match
//! - an array field matches when any element matches
//! - `$ne` matches exactly the documents equality does not, including
//!   documents without the field

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::collection::{Document, DocumentQuery};
use crate::spec::{
    ComparisonOp, FilterKey, FilterSpec, FilterValue, OrderSpec, PaginationSpec, ProjectionSpec,
    SortDirection,
};

/// Run the query over `documents`: scope and filter, sort, page, project
pub fn execute<I>(query: &DocumentQuery, documents: I) -> Vec<Document>
where
    I: IntoIterator<Item = Document>,
{
    let mut selected: Vec<Document> = documents
        .into_iter()
        .filter(|doc| matches(query.scope(), doc) && matches(query.filter(), doc))
        .collect();

    sort(query.order(), &mut selected);

    let page = match query.pagination() {
        Some(pagination) => paginate(pagination, selected),
        None => selected,
    };

    match query.projection() {
        Some(projection) => page.iter().map(|doc| project(projection, doc)).collect(),
        None => page,
    }
}

/// Whether `doc` satisfies every condition of `filter`
pub fn matches(filter: &FilterSpec, doc: &Document) -> bool {
    filter
        .iter()
        .all(|(field, condition)| condition_matches(doc, field, condition))
}

fn condition_matches(doc: &Document, path: &str, condition: &FilterValue) -> bool {
    match condition {
        FilterValue::Literal(literal) => equals(lookup(doc, path), literal),
        FilterValue::AnyOf(literals) => literals.iter().any(|l| equals(lookup(doc, path), l)),
        FilterValue::Nested(entries) => entries.iter().all(|(key, value)| match key {
            FilterKey::Op(op) => operator_matches(doc, path, *op, value),
            FilterKey::Field(sub) => condition_matches(doc, &format!("{path}.{sub}"), value),
        }),
    }
}

fn operator_matches(doc: &Document, path: &str, op: ComparisonOp, operand: &FilterValue) -> bool {
    let value = lookup(doc, path);
    match operand {
        FilterValue::Literal(literal) => compare(value, op, literal),
        // `$ne` against a list means "none of", ranges need every bound
        FilterValue::AnyOf(literals) => literals.iter().all(|l| compare(value, op, l)),
        FilterValue::Nested(_) => false,
    }
}

fn compare(value: Option<&Value>, op: ComparisonOp, literal: &str) -> bool {
    if op == ComparisonOp::Ne {
        return !equals(value, literal);
    }
    match value {
        Some(Value::Array(items)) => items.iter().any(|item| scalar_compare(item, op, literal)),
        Some(item) => scalar_compare(item, op, literal),
        None => false,
    }
}

fn scalar_compare(value: &Value, op: ComparisonOp, literal: &str) -> bool {
    let ordering = match value {
        Value::Number(n) => match (n.as_f64(), literal.trim().parse::<f64>()) {
            (Some(left), Ok(right)) => left.partial_cmp(&right),
            _ => None,
        },
        Value::String(s) => Some(s.as_str().cmp(literal)),
        _ => None,
    };

    match ordering {
        Some(ordering) => match op {
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Gte => ordering != Ordering::Less,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Lte => ordering != Ordering::Greater,
            ComparisonOp::Ne => ordering != Ordering::Equal,
        },
        None => false,
    }
}

fn equals(value: Option<&Value>, literal: &str) -> bool {
    match value {
        Some(Value::Array(items)) => items.iter().any(|item| scalar_equals(item, literal)),
        Some(item) => scalar_equals(item, literal),
        None => false,
    }
}

fn scalar_equals(value: &Value, literal: &str) -> bool {
    match value {
        Value::String(s) => s == literal,
        Value::Number(n) => match (n.as_f64(), literal.trim().parse::<f64>()) {
            (Some(left), Ok(right)) => left == right,
            _ => false,
        },
        Value::Bool(b) => matches!((*b, literal), (true, "true") | (false, "false")),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Typed JSON form of a string filter value
pub fn coerce(literal: &str) -> Value {
    match literal {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(int) = literal.parse::<i64>() {
        return Value::Number(int.into());
    }
    literal
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(literal.to_string()))
}

/// Value at a dotted path (`startLocation.coordinates`)
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Stable sort by the keys of `order`, first key first
pub fn sort(order: &OrderSpec, documents: &mut [Document]) {
    if order.is_empty() {
        return;
    }
    documents.sort_by(|a, b| {
        order
            .keys()
            .iter()
            .map(|key| {
                let ordering = compare_values(lookup(a, &key.field), lookup(b, &key.field));
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

/// jsonb ordering: a missing field (SQL null) sorts before every value,
/// then null, strings, numbers, booleans, arrays, objects
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::Bool(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        // Shorter arrays first, then element by element
        (Some(Value::Array(x)), Some(Value::Array(y))) if x.len() != y.len() => {
            x.len().cmp(&y.len())
        }
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            for (left, right) in x.iter().zip(y) {
                let ordering = compare_values(Some(left), Some(right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Skip then take
pub fn paginate(pagination: PaginationSpec, documents: Vec<Document>) -> Vec<Document> {
    let skip = usize::try_from(pagination.skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit).unwrap_or(usize::MAX);
    documents.into_iter().skip(skip).take(limit).collect()
}

/// Apply a projection to one document. Inclusion always keeps `id`.
pub fn project(projection: &ProjectionSpec, doc: &Document) -> Document {
    match projection {
        ProjectionSpec::Include(fields) => {
            let mut out = Document::new();
            if let Some(id) = doc.get("id") {
                out.insert("id".to_string(), id.clone());
            }
            for field in fields {
                if let Some(value) = lookup(doc, field) {
                    insert_path(&mut out, field, value.clone());
                }
            }
            out
        }
        ProjectionSpec::Exclude(fields) => {
            let mut out = doc.clone();
            for field in fields {
                remove_path(&mut out, field);
            }
            out
        }
    }
}

fn insert_path(doc: &mut Document, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            doc.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = doc
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Document::new()));
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

fn remove_path(doc: &mut Document, path: &str) {
    match path.split_once('.') {
        None => {
            doc.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(inner)) = doc.get_mut(head) {
                remove_path(inner, rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("5"), json!(5));
        assert_eq!(coerce("4.5"), json!(4.5));
        assert_eq!(coerce("true"), json!(true));
        assert_eq!(coerce("easy"), json!("easy"));
        assert_eq!(coerce("NaN"), json!("NaN"));
    }

    #[test]
    fn test_lookup_dotted() {
        let d = doc(json!({ "startLocation": { "coordinates": [-80.1, 25.7] } }));
        assert_eq!(lookup(&d, "startLocation.coordinates.1"), Some(&json!(25.7)));
        assert_eq!(lookup(&d, "startLocation.missing"), None);
        assert_eq!(lookup(&d, "nothing"), None);
    }

    #[test]
    fn test_equality_coercion() {
        let d = doc(json!({
            "duration": 5,
            "secretTour": false,
            "name": "The Forest Hiker",
            "guides": ["a", "b"],
        }));

        assert!(equals(lookup(&d, "duration"), "5"));
        assert!(equals(lookup(&d, "duration"), "5.0"));
        assert!(!equals(lookup(&d, "duration"), "five"));
        assert!(equals(lookup(&d, "secretTour"), "false"));
        assert!(equals(lookup(&d, "name"), "The Forest Hiker"));
        assert!(equals(lookup(&d, "guides"), "b"));
        assert!(!equals(lookup(&d, "missing"), "x"));
    }

    #[test]
    fn test_range_comparison() {
        let d = doc(json!({ "price": 497, "startDate": "2021-06-19T09:00:00.000Z" }));

        assert!(compare(lookup(&d, "price"), ComparisonOp::Gte, "497"));
        assert!(compare(lookup(&d, "price"), ComparisonOp::Lt, "1000"));
        assert!(!compare(lookup(&d, "price"), ComparisonOp::Gt, "497"));
        assert!(!compare(lookup(&d, "price"), ComparisonOp::Lt, "abc"));
        assert!(compare(lookup(&d, "startDate"), ComparisonOp::Gte, "2021-01-01"));
        assert!(!compare(lookup(&d, "missing"), ComparisonOp::Lt, "5"));
    }

    #[test]
    fn test_ne_includes_missing() {
        let secret = doc(json!({ "secretTour": true }));
        let public = doc(json!({ "secretTour": false }));
        let unset = doc(json!({}));

        assert!(!compare(lookup(&secret, "secretTour"), ComparisonOp::Ne, "true"));
        assert!(compare(lookup(&public, "secretTour"), ComparisonOp::Ne, "true"));
        assert!(compare(lookup(&unset, "secretTour"), ComparisonOp::Ne, "true"));
    }

    #[test]
    fn test_sort_mixed_types_and_stability() {
        let mut docs = vec![
            doc(json!({ "k": "b", "n": 1 })),
            doc(json!({ "k": 2, "n": 2 })),
            doc(json!({ "n": 3 })),
            doc(json!({ "k": 2, "n": 4 })),
        ];
        sort(&OrderSpec::parse("k"), &mut docs);

        let order: Vec<_> = docs.iter().map(|d| d["n"].clone()).collect();
        assert_eq!(order, vec![json!(3), json!(1), json!(2), json!(4)]);
    }

    #[test]
    fn test_sort_follows_jsonb_type_order() {
        let mut docs = vec![
            doc(json!({ "k": { "a": 1 }, "n": 1 })),
            doc(json!({ "k": [1, 2], "n": 2 })),
            doc(json!({ "k": true, "n": 3 })),
            doc(json!({ "k": 10, "n": 4 })),
            doc(json!({ "k": "z", "n": 5 })),
            doc(json!({ "k": null, "n": 6 })),
            doc(json!({ "n": 7 })),
            doc(json!({ "k": [9], "n": 8 })),
        ];
        sort(&OrderSpec::parse("k"), &mut docs);

        let order: Vec<_> = docs.iter().map(|d| d["n"].clone()).collect();
        assert_eq!(
            order,
            vec![json!(7), json!(6), json!(5), json!(4), json!(3), json!(8), json!(2), json!(1)]
        );

        sort(&OrderSpec::parse("-k"), &mut docs);
        assert_eq!(docs[0]["n"], json!(1));
        assert_eq!(docs[7]["n"], json!(7));
    }

    #[test]
    fn test_project_nested_paths() {
        let d = doc(json!({
            "id": "1",
            "name": "x",
            "startLocation": { "address": "Miami", "type": "Point" },
            "__v": 0,
        }));

        let included = project(
            &ProjectionSpec::Include(vec!["startLocation.address".into()]),
            &d,
        );
        assert_eq!(
            Value::Object(included),
            json!({ "id": "1", "startLocation": { "address": "Miami" } })
        );

        let excluded = project(&ProjectionSpec::default(), &d);
        assert!(!excluded.contains_key("__v"));
        assert!(excluded.contains_key("name"));
    }
}
