//! Translator behaviour against the collection seam

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::collection::{Document, DocumentQuery, QueryableCollection};
use crate::eval;
use crate::params::RawQueryParams;
use crate::spec::{
    ComparisonOp, FilterSpec, OrderSpec, PaginationSpec, ProjectionSpec, SortDirection, SortKey,
};
use crate::translator::ApiFeatures;

/// Collection that records which refinement was applied, in order
#[derive(Debug, Clone, Default)]
struct RecordingCollection {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingCollection {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(self, call: &'static str) -> Self {
        self.calls.lock().unwrap().push(call);
        self
    }
}

impl QueryableCollection for RecordingCollection {
    fn with_filter(self, _: FilterSpec) -> Self {
        self.record("filter")
    }

    fn with_sort(self, _: OrderSpec) -> Self {
        self.record("sort")
    }

    fn with_projection(self, _: ProjectionSpec) -> Self {
        self.record("projection")
    }

    fn with_pagination(self, _: PaginationSpec) -> Self {
        self.record("pagination")
    }
}

fn features(pairs: &[(&str, &str)]) -> ApiFeatures<DocumentQuery> {
    ApiFeatures::new(
        DocumentQuery::new(),
        RawQueryParams::from_pairs(pairs.iter().copied()),
    )
}

fn tours() -> Vec<Document> {
    let raw = json!([
        { "id": "1", "name": "The Forest Hiker", "difficulty": "easy", "duration": 5,
          "price": 397, "createdAt": "2024-01-01T00:00:00.000Z", "__v": 0 },
        { "id": "2", "name": "The Sea Explorer", "difficulty": "medium", "duration": 7,
          "price": 497, "createdAt": "2024-01-02T00:00:00.000Z", "__v": 0 },
        { "id": "3", "name": "The Snow Adventurer", "difficulty": "difficult", "duration": 4,
          "price": 997, "createdAt": "2024-01-03T00:00:00.000Z", "__v": 0 },
        { "id": "4", "name": "The City Wanderer", "difficulty": "easy", "duration": 9,
          "price": 1197, "createdAt": "2024-01-04T00:00:00.000Z", "__v": 0 },
        { "id": "5", "name": "The Park Camper", "difficulty": "easy", "duration": 10,
          "price": 1497, "createdAt": "2024-01-05T00:00:00.000Z", "__v": 0 },
        { "id": "6", "name": "The Sports Lover", "difficulty": "difficult", "duration": 14,
          "price": 2997, "createdAt": "2024-01-06T00:00:00.000Z", "__v": 0 },
    ]);
    match raw {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().filter_map(|d| d["id"].as_str()).collect()
}

mod translator_tests {
    use super::*;

    #[test]
    fn test_missing_sort_defaults_to_newest_first() {
        for pairs in [
            &[][..],
            &[("difficulty", "easy")][..],
            &[("page", "2"), ("fields", "name")][..],
        ] {
            assert_eq!(
                features(pairs).order_spec().keys(),
                &[SortKey::desc("createdAt")]
            );
        }
    }

    #[test]
    fn test_empty_sort_defaults_to_newest_first() {
        for raw in ["", ",", " , ,"] {
            assert_eq!(
                features(&[("sort", raw)]).order_spec().keys(),
                &[SortKey::desc("createdAt")]
            );
        }
    }

    #[test]
    fn test_sort_keeps_client_tie_break_order() {
        let order = features(&[("sort", "a,-b")]).order_spec();
        assert_eq!(
            order.keys(),
            &[
                SortKey {
                    field: "a".into(),
                    direction: SortDirection::Asc
                },
                SortKey {
                    field: "b".into(),
                    direction: SortDirection::Desc
                },
            ]
        );
    }

    #[test]
    fn test_operator_rewrite_and_control_keys() {
        let filter = features(&[
            ("duration[gte]", "5"),
            ("page", "2"),
            ("sort", "price"),
            ("limit", "3"),
            ("fields", "name"),
        ])
        .filter_spec();

        assert_eq!(filter.to_json(), json!({ "duration": { "$gte": "5" } }));
        for key in ["page", "sort", "limit", "fields"] {
            assert!(filter.get(key).is_none());
        }
    }

    #[test]
    fn test_pagination_window() {
        assert_eq!(
            features(&[("page", "2"), ("limit", "10")]).pagination_spec(),
            PaginationSpec { skip: 10, limit: 10 }
        );
        assert_eq!(
            features(&[("limit", "10")]).pagination_spec(),
            PaginationSpec { skip: 0, limit: 10 }
        );
        assert_eq!(
            features(&[("page", "x"), ("limit", "-1")]).pagination_spec(),
            PaginationSpec { skip: 0, limit: 100 }
        );
    }

    #[test]
    fn test_projection_default_and_requested() {
        assert_eq!(
            features(&[]).projection_spec(),
            ProjectionSpec::Exclude(vec!["__v".into()])
        );
        assert_eq!(
            features(&[("fields", "name,duration")]).projection_spec(),
            ProjectionSpec::Include(vec!["name".into(), "duration".into()])
        );
    }

    #[test]
    fn test_filter_is_idempotent() {
        let features = features(&[("difficulty", "easy"), ("price[lt]", "1000")]);
        assert_eq!(features.filter_spec(), features.filter_spec());

        let once = features.clone().filter().into_query();
        let twice = features.filter().filter().into_query();
        assert_eq!(once, twice);
        assert_eq!(twice.filter().len(), 2);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let features = features(&[
            ("difficulty", "easy"),
            ("duration[gte]", "5"),
            ("sort", "-price"),
            ("fields", "name,price"),
            ("page", "1"),
            ("limit", "5"),
        ]);

        assert_eq!(
            features.filter_spec().to_json(),
            json!({ "difficulty": "easy", "duration": { "$gte": "5" } })
        );
        assert_eq!(features.order_spec().keys(), &[SortKey::desc("price")]);
        assert_eq!(
            features.projection_spec(),
            ProjectionSpec::Include(vec!["name".into(), "price".into()])
        );
        assert_eq!(
            features.pagination_spec(),
            PaginationSpec { skip: 0, limit: 5 }
        );

        let query = features.filter().sort().limit_fields().paginate().into_query();
        let result = eval::execute(&query, tours());
        assert_eq!(
            result.into_iter().map(Value::Object).collect::<Vec<_>>(),
            vec![
                json!({ "id": "5", "name": "The Park Camper", "price": 1497 }),
                json!({ "id": "4", "name": "The City Wanderer", "price": 1197 }),
                json!({ "id": "1", "name": "The Forest Hiker", "price": 397 }),
            ]
        );
    }

    #[test]
    fn test_steps_apply_in_fixed_order() {
        let collection = RecordingCollection::default();
        let applied = ApiFeatures::new(collection.clone(), RawQueryParams::new())
            .paginate()
            .limit_fields()
            .sort()
            .filter()
            .into_query();

        assert_eq!(
            applied.calls(),
            vec!["filter", "sort", "projection", "pagination"]
        );
    }

    #[test]
    fn test_only_requested_steps_apply() {
        let collection = RecordingCollection::default();
        let applied = ApiFeatures::new(collection, RawQueryParams::new())
            .sort()
            .paginate()
            .into_query();

        assert_eq!(applied.calls(), vec!["sort", "pagination"]);
    }

    #[test]
    fn test_plan_is_lazy() {
        let collection = RecordingCollection::default();
        let features = ApiFeatures::new(collection.clone(), RawQueryParams::new())
            .filter()
            .sort();

        assert!(collection.calls().is_empty());
        assert!(features.plan().filter.is_some());
        assert!(features.plan().projection.is_none());
    }
}

mod execution_tests {
    use super::*;

    fn run(pairs: &[(&str, &str)]) -> Vec<Document> {
        let query = ApiFeatures::apply_all(
            DocumentQuery::new(),
            RawQueryParams::from_pairs(pairs.iter().copied()),
        );
        eval::execute(&query, tours())
    }

    #[test]
    fn test_default_listing() {
        let result = run(&[]);
        assert_eq!(ids(&result), vec!["6", "5", "4", "3", "2", "1"]);
        assert!(result.iter().all(|d| !d.contains_key("__v")));
    }

    #[test]
    fn test_range_filter() {
        let result = run(&[("price[gte]", "497"), ("price[lt]", "1500"), ("sort", "price")]);
        assert_eq!(ids(&result), vec!["2", "3", "4", "5"]);
    }

    #[test]
    fn test_repeated_value_is_any_of() {
        let result = run(&[
            ("difficulty", "medium"),
            ("difficulty", "difficult"),
            ("sort", "duration"),
        ]);
        assert_eq!(ids(&result), vec!["3", "2", "6"]);
    }

    #[test]
    fn test_numeric_equality_is_coerced() {
        let result = run(&[("duration", "5")]);
        assert_eq!(ids(&result), vec!["1"]);
    }

    #[test]
    fn test_second_page() {
        let result = run(&[("sort", "price"), ("limit", "4"), ("page", "2")]);
        assert_eq!(ids(&result), vec!["5", "6"]);

        let beyond = run(&[("limit", "4"), ("page", "3")]);
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_exclusion_projection() {
        let result = run(&[("fields", "-price,-duration"), ("limit", "1")]);
        assert_eq!(result.len(), 1);
        assert!(!result[0].contains_key("price"));
        assert!(!result[0].contains_key("duration"));
        assert!(result[0].contains_key("__v"));
        assert!(result[0].contains_key("name"));
    }

    #[test]
    fn test_unknown_operator_matches_nothing() {
        let result = run(&[("price[ne]", "397")]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_scope_cannot_be_widened() {
        let scoped = DocumentQuery::scoped(FilterSpec::new().compare(
            "difficulty",
            ComparisonOp::Ne,
            "difficult",
        ));
        let query = ApiFeatures::apply_all(
            scoped,
            RawQueryParams::from_pairs([("difficulty", "difficult")]),
        );

        assert!(eval::execute(&query, tours()).is_empty());
    }
}
