//! Tour documents

use query::{ComparisonOp, Document, FilterSpec};
use serde_json::{Value, json};

use crate::domain::collection::Collection;
use crate::domain::document::{
    check_numbers, coerce_bool, coerce_number, is_set, number, round_one_decimal, set_default,
    text, trim_field,
};
use crate::domain::resource::Resource;

pub const DIFFICULTIES: [&str; 3] = ["easy", "medium", "difficult"];
pub const DEFAULT_RATINGS_AVERAGE: f64 = 4.5;

const NAME_MIN_CHARS: usize = 10;
const NAME_MAX_CHARS: usize = 40;

const NUMBER_FIELDS: [&str; 6] = [
    "duration",
    "maxGroupSize",
    "ratingsAverage",
    "ratingsQuantity",
    "price",
    "priceDiscount",
];

pub struct Tour;

impl Resource for Tour {
    const COLLECTION: Collection = Collection::Tours;

    /// Secret tours are never served
    fn scope() -> FilterSpec {
        FilterSpec::new().compare("secretTour", ComparisonOp::Ne, "true")
    }

    fn prepare(doc: &mut Document) {
        for field in ["name", "summary", "description", "difficulty"] {
            trim_field(doc, field);
        }
        for field in NUMBER_FIELDS {
            coerce_number(doc, field);
        }
        coerce_bool(doc, "secretTour");

        set_default(doc, "ratingsAverage", json!(DEFAULT_RATINGS_AVERAGE));
        set_default(doc, "ratingsQuantity", json!(0));
        set_default(doc, "images", json!([]));
        set_default(doc, "startDates", json!([]));
        set_default(doc, "secretTour", json!(false));
        set_default(doc, "locations", json!([]));
        set_default(doc, "guides", json!([]));

        if let Some(average) = number(doc, "ratingsAverage") {
            doc.insert("ratingsAverage".into(), json!(round_one_decimal(average)));
        }
        if let Some(slug) = doc.get("name").and_then(Value::as_str).map(slugify) {
            doc.insert("slug".into(), Value::String(slug));
        }

        default_point_type(doc.get_mut("startLocation"));
        if let Some(Value::Array(locations)) = doc.get_mut("locations") {
            for location in locations {
                default_point_type(Some(location));
            }
        }
    }

    fn validate(doc: &Document) -> Vec<String> {
        let mut errors = Vec::new();

        match text(doc, "name") {
            None => errors.push("A tour must have a name".to_string()),
            Some(name) => {
                let chars = name.chars().count();
                if chars > NAME_MAX_CHARS {
                    errors.push(format!(
                        "A tour name must have less or equal then {NAME_MAX_CHARS} characters"
                    ));
                } else if chars < NAME_MIN_CHARS {
                    errors.push(format!(
                        "A tour name must have more or equal then {NAME_MIN_CHARS} characters"
                    ));
                }
            }
        }

        for (field, message) in [
            ("duration", "A tour must have a duration"),
            ("maxGroupSize", "A tour must have a group size"),
            ("price", "A tour must have a price"),
        ] {
            if !is_set(doc, field) {
                errors.push(message.to_string());
            }
        }
        check_numbers(doc, &NUMBER_FIELDS, &mut errors);

        match text(doc, "difficulty") {
            None => errors.push("A tour must have a difficulty".to_string()),
            Some(difficulty) if !DIFFICULTIES.contains(&difficulty) => {
                errors.push("Difficulty is either: easy, medium, difficult".to_string());
            }
            Some(_) => {}
        }

        if let Some(average) = number(doc, "ratingsAverage") {
            if average < 1.0 {
                errors.push("Rating must be above 1.0".to_string());
            } else if average > 5.0 {
                errors.push("Rating must be below 5.0".to_string());
            }
        }

        if let (Some(discount), Some(price)) = (number(doc, "priceDiscount"), number(doc, "price"))
            && discount >= price
        {
            errors.push(format!(
                "Discount price ({}) should be below regular price",
                doc["priceDiscount"]
            ));
        }

        if text(doc, "summary").is_none() {
            errors.push("A tour must have a description".to_string());
        }
        if text(doc, "imageCover").is_none() {
            errors.push("A tour must have a cover image".to_string());
        }
        if is_set(doc, "secretTour") && !doc["secretTour"].is_boolean() {
            errors.push("secretTour must be a boolean".to_string());
        }

        for field in ["images", "startDates"] {
            if !is_string_list(doc.get(field), |_| true) {
                errors.push(format!("{field} must be a list of strings"));
            }
        }
        if !is_string_list(doc.get("guides"), |id| uuid::Uuid::parse_str(id).is_ok()) {
            errors.push("guides must be a list of user ids".to_string());
        }

        if let Some(start) = doc.get("startLocation").filter(|v| !v.is_null())
            && !is_point(start)
        {
            errors.push(
                "startLocation must be a GeoJSON Point with [longitude, latitude] coordinates"
                    .to_string(),
            );
        }
        match doc.get("locations") {
            Some(Value::Array(locations)) if locations.iter().all(is_point) => {}
            None | Some(Value::Null) => {}
            Some(_) => errors.push(
                "locations must be GeoJSON Points with [longitude, latitude] coordinates"
                    .to_string(),
            ),
        }

        errors
    }

    fn present(mut doc: Document) -> Document {
        if let Some(duration) = number(&doc, "duration") {
            doc.insert("durationWeeks".into(), json!(duration / 7.0));
        }
        doc
    }
}

/// `"The Forest Hiker"` -> `"the-forest-hiker"`
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// `[longitude, latitude]` of a GeoJSON point
pub fn point_coordinates(point: &Value) -> Option<(f64, f64)> {
    match point.get("coordinates")?.as_array()?.as_slice() {
        [lng, lat] => Some((lng.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

fn is_point(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("Point")
        && point_coordinates(value).is_some_and(|(lng, lat)| {
            (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat)
        })
}

fn default_point_type(point: Option<&mut Value>) {
    if let Some(Value::Object(point)) = point {
        point
            .entry("type")
            .or_insert_with(|| Value::String("Point".to_string()));
    }
}

fn is_string_list(value: Option<&Value>, valid: impl Fn(&str) -> bool) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.iter().all(|item| item.as_str().is_some_and(&valid)),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn valid_tour() -> Document {
        doc(json!({
            "name": "  The Forest Hiker ",
            "duration": "5",
            "maxGroupSize": 25,
            "difficulty": "easy",
            "price": 397,
            "summary": "Breathtaking hike through the Canadian Banff National Park",
            "imageCover": "tour-1-cover.jpg",
            "startLocation": {"coordinates": [-115.570154, 51.178456], "address": "Banff"}
        }))
    }

    #[test]
    fn test_prepare_applies_defaults() {
        let mut tour = valid_tour();
        Tour::prepare(&mut tour);

        assert_eq!(tour["name"], json!("The Forest Hiker"));
        assert_eq!(tour["slug"], json!("the-forest-hiker"));
        assert_eq!(tour["duration"], json!(5));
        assert_eq!(tour["ratingsAverage"], json!(4.5));
        assert_eq!(tour["ratingsQuantity"], json!(0));
        assert_eq!(tour["secretTour"], json!(false));
        assert_eq!(tour["startLocation"]["type"], json!("Point"));
        assert!(Tour::validate(&tour).is_empty());
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let errors = Tour::validate(&Document::new());
        assert!(errors.contains(&"A tour must have a name".to_string()));
        assert!(errors.contains(&"A tour must have a price".to_string()));
        assert!(errors.contains(&"A tour must have a duration".to_string()));
        assert!(errors.contains(&"A tour must have a difficulty".to_string()));
        assert!(errors.contains(&"A tour must have a description".to_string()));
        assert!(errors.contains(&"A tour must have a cover image".to_string()));
    }

    #[test]
    fn test_field_rules() {
        let mut tour = valid_tour();
        tour.insert("name".into(), json!("Short"));
        tour.insert("difficulty".into(), json!("extreme"));
        tour.insert("ratingsAverage".into(), json!(6));
        tour.insert("priceDiscount".into(), json!(400));
        Tour::prepare(&mut tour);

        assert_eq!(
            Tour::validate(&tour),
            vec![
                "A tour name must have more or equal then 10 characters".to_string(),
                "Difficulty is either: easy, medium, difficult".to_string(),
                "Rating must be below 5.0".to_string(),
                "Discount price (400) should be below regular price".to_string(),
            ]
        );
    }

    #[test]
    fn test_name_too_long() {
        let mut tour = valid_tour();
        tour.insert("name".into(), json!("A".repeat(41)));
        Tour::prepare(&mut tour);
        assert_eq!(
            Tour::validate(&tour),
            vec!["A tour name must have less or equal then 40 characters".to_string()]
        );
    }

    #[test]
    fn test_rating_rounded() {
        let mut tour = valid_tour();
        tour.insert("ratingsAverage".into(), json!(4.666));
        Tour::prepare(&mut tour);
        assert_eq!(tour["ratingsAverage"], json!(4.7));
    }

    #[test]
    fn test_type_errors() {
        let mut tour = valid_tour();
        tour.insert("price".into(), json!("cheap"));
        tour.insert("guides".into(), json!(["not-an-id"]));
        tour.insert("startLocation".into(), json!({"type": "Point", "coordinates": [1]}));
        Tour::prepare(&mut tour);

        let errors = Tour::validate(&tour);
        assert!(errors.contains(&"price must be a number".to_string()));
        assert!(errors.contains(&"guides must be a list of user ids".to_string()));
        assert!(errors.iter().any(|e| e.starts_with("startLocation must be")));
    }

    #[test]
    fn test_present_adds_duration_weeks() {
        let out = Tour::present(doc(json!({"duration": 14})));
        assert_eq!(out["durationWeeks"], json!(2.0));

        let out = Tour::present(doc(json!({"name": "x"})));
        assert!(out.get("durationWeeks").is_none());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("The Sea Explorer"), "the-sea-explorer");
        assert_eq!(slugify("  Snow -- Adventurer! "), "snow-adventurer");
    }
}
