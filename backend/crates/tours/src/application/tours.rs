//! Tour-specific operations
//!
//! Aggregations and geo queries run over the visible tours; secret tours
//! never take part.

use kernel::id::TourId;
use query::{Document, DocumentQuery, RawQueryParams};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::application::ratings::reviews_of;
use crate::domain::collection::Collection;
use crate::domain::document::{ID, id_of};
use crate::domain::geo::{DistanceUnit, LatLng};
use crate::domain::repository::DocumentStore;
use crate::domain::resource::Resource;
use crate::domain::services::{monthly_plan, tour_stats};
use crate::domain::tour::{Tour, point_coordinates};
use crate::error::{TourError, TourResult};

/// `/top-5-cheap`: the five best rated tours, cheapest first on ties
pub fn alias_top_tours(params: RawQueryParams) -> RawQueryParams {
    params
        .set("limit", "5")
        .set("sort", "-ratingsAverage,price")
        .set("fields", "name,price,ratingsAverage,summary,difficulty")
}

/// Tour use cases beyond plain CRUD
pub struct TourService<S> {
    store: Arc<S>,
}

impl<S> TourService<S>
where
    S: DocumentStore + Send + Sync,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn stats(&self) -> TourResult<Vec<Document>> {
        let tours = self.visible_tours().await?;
        Ok(tour_stats(&tours))
    }

    pub async fn monthly_plan(&self, year: &str) -> TourResult<Vec<Document>> {
        let year: i32 = year
            .parse()
            .map_err(|_| TourError::InvalidYear(year.to_string()))?;
        let tours = self.visible_tours().await?;
        Ok(monthly_plan(&tours, year))
    }

    /// Tours starting within `distance` of `latlng`
    pub async fn within(
        &self,
        distance: &str,
        latlng: &str,
        unit: &str,
    ) -> TourResult<Vec<Document>> {
        let center: LatLng = latlng.parse()?;
        let distance: f64 = distance
            .parse()
            .ok()
            .filter(|d: &f64| d.is_finite() && *d >= 0.0)
            .ok_or(TourError::InvalidDistance)?;
        let radius = distance / DistanceUnit::parse(unit).earth_radius();

        let tours = self.visible_tours().await?;
        Ok(tours
            .into_iter()
            .filter(|tour| start_of(tour).is_some_and(|start| center.central_angle(&start) <= radius))
            .map(Tour::present)
            .collect())
    }

    /// `{id, name, distance}` of every tour with a start location, nearest first
    pub async fn distances(&self, latlng: &str, unit: &str) -> TourResult<Vec<Document>> {
        let origin: LatLng = latlng.parse()?;
        let unit = DistanceUnit::parse(unit);

        let tours = self.visible_tours().await?;
        let mut distances: Vec<(f64, Document)> = tours
            .iter()
            .filter_map(|tour| {
                let distance = origin.distance_to(&start_of(tour)?, unit);
                let mut entry = Document::new();
                entry.insert(ID.into(), tour.get(ID).cloned().unwrap_or(Value::Null));
                entry.insert("name".into(), tour.get("name").cloned().unwrap_or(Value::Null));
                entry.insert("distance".into(), json!(distance));
                Some((distance, entry))
            })
            .collect();

        distances.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        Ok(distances.into_iter().map(|(_, entry)| entry).collect())
    }

    /// The tour with its reviews embedded as `reviews`
    pub async fn with_reviews(&self, mut tour: Document) -> TourResult<Document> {
        let Some(tour_id) = id_of(&tour) else {
            return Ok(tour);
        };
        let reviews = self
            .store
            .find(
                Collection::Reviews,
                &DocumentQuery::scoped(reviews_of(TourId::from_uuid(tour_id))),
            )
            .await?;
        tour.insert(
            "reviews".into(),
            Value::Array(reviews.into_iter().map(Value::Object).collect()),
        );
        Ok(tour)
    }

    async fn visible_tours(&self) -> TourResult<Vec<Document>> {
        self.store
            .find(Collection::Tours, &DocumentQuery::scoped(Tour::scope()))
            .await
    }
}

fn start_of(tour: &Document) -> Option<LatLng> {
    let (lng, lat) = point_coordinates(tour.get("startLocation")?)?;
    Some(LatLng::new(lat, lng))
}
