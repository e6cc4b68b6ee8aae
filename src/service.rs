// Estimate service: fetches a property's availability and enhances its room types
use crate::availability::AvailabilityResponse;
use crate::client::{AvailabilityQuery, AvailabilitySource};
use crate::enhancer::enhance_pricing_estimates;
use crate::room_type::{EnhancedRoomType, RoomType};
use crate::trip::TripInfo;
use tracing::warn;

pub struct EstimateService<S: AvailabilitySource> {
    source: S,
}

impl<S: AvailabilitySource> EstimateService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Enhances `room_types` with availability for the trip.
    ///
    /// A failed fetch is treated like an absent payload: every quantity comes
    /// back as `None` rather than surfacing the error.
    pub async fn estimate(
        &self,
        property_id: &str,
        trip: &TripInfo,
        room_types: &[RoomType],
    ) -> Vec<EnhancedRoomType> {
        let query = AvailabilityQuery::for_trip(property_id, trip);

        let availability = match self.source.fetch_availability(&query).await {
            Ok(availability) => availability,
            Err(error) => {
                warn!(%property_id, %error, "availability unavailable, quantities unknown");
                AvailabilityResponse::default()
            }
        };

        enhance_pricing_estimates(trip, room_types, &availability)
    }
}
