//! Booking documents

use query::Document;
use serde_json::{Value, json};

use crate::domain::collection::Collection;
use crate::domain::document::{
    check_numbers, coerce_bool, coerce_number, is_set, number, set_default, uuid_field,
};
use crate::domain::resource::Resource;

pub struct Booking;

impl Resource for Booking {
    const COLLECTION: Collection = Collection::Bookings;

    fn prepare(doc: &mut Document) {
        coerce_number(doc, "price");
        coerce_bool(doc, "paid");
        set_default(doc, "paid", json!(true));
    }

    fn validate(doc: &Document) -> Vec<String> {
        let mut errors = Vec::new();

        for (field, message) in [
            ("tour", "Booking must belong to a Tour!"),
            ("user", "Booking must belong to a User!"),
        ] {
            if !is_set(doc, field) {
                errors.push(message.to_string());
            } else if uuid_field(doc, field).is_none() {
                errors.push(format!("{field} must be a valid id"));
            }
        }

        if !is_set(doc, "price") {
            errors.push("Booking must have a price.".to_string());
        }
        check_numbers(doc, &["price"], &mut errors);
        if number(doc, "price").is_some_and(|price| price < 0.0) {
            errors.push("price must not be negative".to_string());
        }
        if !doc.get("paid").is_some_and(Value::is_boolean) {
            errors.push("paid must be a boolean".to_string());
        }

        errors
    }
}
