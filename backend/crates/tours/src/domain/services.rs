//! Domain Services
//!
//! Pure aggregations over tour and review documents.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use query::Document;
use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::domain::document::{number, round_one_decimal};
use crate::domain::tour::DEFAULT_RATINGS_AVERAGE;

/// Tours rated at least this well take part in the statistics
pub const STATS_MIN_RATING: f64 = 4.5;

const PLAN_MAX_MONTHS: usize = 12;

#[derive(Debug, Default)]
struct DifficultyGroup {
    num_tours: u64,
    num_ratings: f64,
    rating_sum: f64,
    rating_count: u64,
    price_sum: f64,
    price_count: u64,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

/// Statistics per upper-cased difficulty, cheapest average price first
pub fn tour_stats<'a>(tours: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
    let mut groups: BTreeMap<String, DifficultyGroup> = BTreeMap::new();

    for tour in tours {
        let Some(rating) = number(tour, "ratingsAverage") else {
            continue;
        };
        if rating < STATS_MIN_RATING {
            continue;
        }

        let difficulty = tour
            .get("difficulty")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_uppercase();
        let group = groups.entry(difficulty).or_default();

        group.num_tours += 1;
        group.num_ratings += number(tour, "ratingsQuantity").unwrap_or(0.0);
        group.rating_sum += rating;
        group.rating_count += 1;
        if let Some(price) = number(tour, "price") {
            group.price_sum += price;
            group.price_count += 1;
            group.min_price = Some(group.min_price.map_or(price, |min| min.min(price)));
            group.max_price = Some(group.max_price.map_or(price, |max| max.max(price)));
        }
    }

    let mut stats: Vec<(Option<f64>, Document)> = groups
        .into_iter()
        .map(|(difficulty, group)| {
            let avg_price = average(group.price_sum, group.price_count);
            let stat = json!({
                "difficulty": difficulty,
                "numTours": group.num_tours,
                "numRatings": group.num_ratings,
                "avgRating": average(group.rating_sum, group.rating_count),
                "avgPrice": avg_price,
                "minPrice": group.min_price,
                "maxPrice": group.max_price,
            });
            (avg_price, into_document(stat))
        })
        .collect();

    stats.sort_by(|(a, _), (b, _)| a.unwrap_or(f64::MAX).total_cmp(&b.unwrap_or(f64::MAX)));
    stats.into_iter().map(|(_, stat)| stat).collect()
}

/// Tour starts per month of `year`, busiest month first, at most twelve
pub fn monthly_plan<'a>(tours: impl IntoIterator<Item = &'a Document>, year: i32) -> Vec<Document> {
    let mut months: BTreeMap<u32, Vec<Value>> = BTreeMap::new();

    for tour in tours {
        let name = tour.get("name").cloned().unwrap_or(Value::Null);
        let Some(Value::Array(dates)) = tour.get("startDates") else {
            continue;
        };
        for date in dates.iter().filter_map(Value::as_str).filter_map(parse_start_date) {
            if date.year() == year {
                months.entry(date.month()).or_default().push(name.clone());
            }
        }
    }

    let mut plan: Vec<(u32, Vec<Value>)> = months.into_iter().collect();
    plan.sort_by(|(_, a), (_, b)| b.len().cmp(&a.len()));
    plan.truncate(PLAN_MAX_MONTHS);

    plan.into_iter()
        .map(|(month, names)| {
            into_document(json!({
                "numTourStarts": names.len(),
                "tours": names,
                "month": month,
            }))
        })
        .collect()
}

/// `(ratingsQuantity, ratingsAverage)` of a tour from its reviews
pub fn rating_summary<'a>(reviews: impl IntoIterator<Item = &'a Document>) -> (u64, f64) {
    let mut count = 0;
    let mut sum = 0.0;
    let mut rated = 0;

    for review in reviews {
        count += 1;
        if let Some(rating) = number(review, "rating") {
            sum += rating;
            rated += 1;
        }
    }

    match average(sum, rated) {
        Some(avg) if count > 0 => (count, round_one_decimal(avg)),
        _ => (count, DEFAULT_RATINGS_AVERAGE),
    }
}

/// Start dates are stored as RFC 3339 timestamps; the seed data also uses
/// `YYYY-MM-DD,HH:MM` and plain dates.
pub fn parse_start_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d,%H:%M") {
        return Some(at.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn average(sum: f64, count: u64) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

fn into_document(value: Value) -> Document {
    match value {
        Value::Object(doc) => doc,
        _ => Document::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour(value: Value) -> Document {
        into_document(value)
    }

    #[test]
    fn test_tour_stats() {
        let tours = [
            tour(json!({"difficulty": "easy", "ratingsAverage": 4.8, "ratingsQuantity": 6, "price": 400})),
            tour(json!({"difficulty": "easy", "ratingsAverage": 4.6, "ratingsQuantity": 4, "price": 200})),
            tour(json!({"difficulty": "difficult", "ratingsAverage": 4.5, "ratingsQuantity": 1, "price": 100})),
            tour(json!({"difficulty": "medium", "ratingsAverage": 4.0, "ratingsQuantity": 9, "price": 50})),
        ];

        let stats = tour_stats(&tours);
        assert_eq!(stats.len(), 2);

        assert_eq!(stats[0]["difficulty"], json!("DIFFICULT"));
        assert_eq!(stats[0]["avgPrice"], json!(100.0));

        let easy = &stats[1];
        assert_eq!(easy["difficulty"], json!("EASY"));
        assert_eq!(easy["numTours"], json!(2));
        assert_eq!(easy["numRatings"], json!(10.0));
        assert_eq!(easy["avgPrice"], json!(300.0));
        assert_eq!(easy["minPrice"], json!(200.0));
        assert_eq!(easy["maxPrice"], json!(400.0));
        assert!((easy["avgRating"].as_f64().unwrap() - 4.7).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_plan() {
        let tours = [
            tour(json!({"name": "The Forest Hiker", "startDates": [
                "2021-04-25T09:00:00.000Z", "2021-07-20T09:00:00.000Z", "2022-07-05T09:00:00.000Z"
            ]})),
            tour(json!({"name": "The Sea Explorer", "startDates": [
                "2021-07-19,10:00", "2021-12-31"
            ]})),
            tour(json!({"name": "No Dates"})),
        ];

        let plan = monthly_plan(&tours, 2021);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0]["month"], json!(7));
        assert_eq!(plan[0]["numTourStarts"], json!(2));
        assert_eq!(plan[0]["tours"], json!(["The Forest Hiker", "The Sea Explorer"]));
        assert_eq!(plan[1]["month"], json!(4));
        assert_eq!(plan[2]["month"], json!(12));

        assert!(monthly_plan(&tours, 2019).is_empty());
    }

    #[test]
    fn test_rating_summary() {
        let reviews = [
            tour(json!({"rating": 5})),
            tour(json!({"rating": 4})),
            tour(json!({"rating": 4})),
        ];
        assert_eq!(rating_summary(&reviews), (3, 4.3));
        assert_eq!(rating_summary(std::iter::empty()), (0, DEFAULT_RATINGS_AVERAGE));
    }

    #[test]
    fn test_parse_start_date() {
        assert!(parse_start_date("2021-03-21T09:00:00.000Z").is_some());
        assert!(parse_start_date("2021-06-19,10:00").is_some());
        assert!(parse_start_date("2021-06-19").is_some());
        assert!(parse_start_date("June").is_none());
    }
}
