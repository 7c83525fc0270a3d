//! Tour rating summary
//!
//! `ratingsQuantity` and `ratingsAverage` of a tour are derived from its
//! reviews and rewritten after every review change.

use kernel::id::TourId;
use query::{DocumentQuery, FilterSpec};
use serde_json::json;

use crate::domain::collection::Collection;
use crate::domain::repository::DocumentStore;
use crate::domain::services::rating_summary;
use crate::error::TourResult;

/// Reviews of one tour
pub fn reviews_of(tour_id: TourId) -> FilterSpec {
    FilterSpec::new().eq("tour", tour_id.to_string())
}

/// Store the summary of the reviews of `tour_id` on the tour
///
/// A tour that no longer exists is skipped.
pub async fn recalculate_ratings<S>(store: &S, tour_id: TourId) -> TourResult<()>
where
    S: DocumentStore + Send + Sync,
{
    let reviews = store
        .find(Collection::Reviews, &DocumentQuery::scoped(reviews_of(tour_id)))
        .await?;
    let (quantity, average) = rating_summary(&reviews);

    let Some(mut tour) = store.find_by_id(Collection::Tours, tour_id.into_uuid()).await? else {
        tracing::debug!(%tour_id, "Rated tour no longer exists");
        return Ok(());
    };
    tour.insert("ratingsQuantity".into(), json!(quantity));
    tour.insert("ratingsAverage".into(), json!(average));
    store.replace(Collection::Tours, tour_id.into_uuid(), &tour).await?;

    tracing::debug!(%tour_id, quantity, average, "Tour ratings recalculated");
    Ok(())
}
