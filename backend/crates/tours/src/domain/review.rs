//! Review documents
//!
//! A review belongs to one tour and one user; each user reviews a tour
//! at most once. Ratings feed the summary stored on the tour.

use kernel::id::TourId;
use query::Document;

use crate::domain::collection::Collection;
use crate::domain::document::{
    check_numbers, coerce_number, is_set, number, text, trim_field, uuid_field,
};
use crate::domain::resource::Resource;

pub struct Review;

impl Resource for Review {
    const COLLECTION: Collection = Collection::Reviews;

    fn prepare(doc: &mut Document) {
        trim_field(doc, "review");
        coerce_number(doc, "rating");
    }

    fn validate(doc: &Document) -> Vec<String> {
        let mut errors = Vec::new();

        if text(doc, "review").is_none() {
            errors.push("Review can not be empty!".to_string());
        }
        check_numbers(doc, &["rating"], &mut errors);
        if let Some(rating) = number(doc, "rating") {
            if rating < 1.0 {
                errors.push("Rating must be above 1.0".to_string());
            } else if rating > 5.0 {
                errors.push("Rating must be below 5.0".to_string());
            }
        }

        for (field, message) in [
            ("tour", "Review must belong to a tour."),
            ("user", "Review must belong to a user"),
        ] {
            if !is_set(doc, field) {
                errors.push(message.to_string());
            } else if uuid_field(doc, field).is_none() {
                errors.push(format!("{field} must be a valid id"));
            }
        }

        errors
    }

    fn rated_tour(doc: &Document) -> Option<TourId> {
        uuid_field(doc, "tour").map(TourId::from_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use uuid::Uuid;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_valid_review() {
        let tour = Uuid::new_v4();
        let mut review = doc(json!({
            "review": " Amazing! ",
            "rating": "5",
            "tour": tour.to_string(),
            "user": Uuid::new_v4().to_string(),
        }));
        Review::prepare(&mut review);

        assert!(Review::validate(&review).is_empty());
        assert_eq!(review["review"], json!("Amazing!"));
        assert_eq!(review["rating"], json!(5));
        assert_eq!(Review::rated_tour(&review), Some(TourId::from_uuid(tour)));
    }

    #[test]
    fn test_invalid_review() {
        let review = doc(json!({"review": "  ", "rating": 0, "tour": "abc"}));
        assert_eq!(
            Review::validate(&review),
            vec![
                "Review can not be empty!".to_string(),
                "Rating must be above 1.0".to_string(),
                "tour must be a valid id".to_string(),
                "Review must belong to a user".to_string(),
            ]
        );
    }
}
