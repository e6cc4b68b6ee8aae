// Availability enhancement: derives the bookable quantity of each room type for a stay
use crate::availability::{AvailabilityResponse, DayRecord};
use crate::room_type::{EnhancedRoomType, RoomType};
use crate::trip::{Night, TripInfo};
use std::ops::ControlFlow;
use tracing::debug;

/// Running result of the per-night reduction.
///
/// `Unknown` is terminal: once a night cannot be confirmed, no later night can
/// restore a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Estimate {
    Quantity(u32),
    Unknown,
}

impl Estimate {
    // Identity of the reduction; only meaningful once at least one night was absorbed
    const UNBOUNDED: Estimate = Estimate::Quantity(u32::MAX);

    pub fn absorb(self, night: Estimate) -> Estimate {
        match (self, night) {
            (Estimate::Quantity(current), Estimate::Quantity(quantity)) => {
                Estimate::Quantity(current.min(quantity))
            }
            _ => Estimate::Unknown,
        }
    }

    pub fn quantity(self) -> Option<u32> {
        match self {
            Estimate::Quantity(quantity) => Some(quantity),
            Estimate::Unknown => None,
        }
    }
}

// First usable record for a date; records without a decoded date and quantity are ignored
fn find_record<'a>(days: &'a [DayRecord], key: &str) -> Option<&'a DayRecord> {
    days.iter()
        .find(|day| day.date.as_deref() == Some(key) && day.quantity.is_some())
}

/// Outcome of a single night, independent of the other nights.
pub fn assess_night(days: &[DayRecord], night: &Night) -> Estimate {
    let Some(record) = find_record(days, &night.key) else {
        return Estimate::Unknown;
    };

    if night.is_first && record.no_arrival() {
        return Estimate::Unknown;
    }
    if night.is_last && record.no_departure() {
        return Estimate::Unknown;
    }

    record.quantity.map_or(Estimate::Unknown, Estimate::Quantity)
}

// A departure-day record is optional, but when present and usable it may forbid checking out
fn departure_blocked(days: &[DayRecord], departure_key: &str) -> bool {
    find_record(days, departure_key).map_or(false, DayRecord::no_departure)
}

/// Minimum quantity across the nights of the stay, or `Unknown` if any night
/// is missing or restricted.
pub fn estimate_room(trip: &TripInfo, nights: &[Night], days: &[DayRecord]) -> Estimate {
    if nights.is_empty() || departure_blocked(days, &trip.departure_key()) {
        return Estimate::Unknown;
    }

    let reduced = nights
        .iter()
        .try_fold(Estimate::UNBOUNDED, |estimate, night| {
            match estimate.absorb(assess_night(days, night)) {
                Estimate::Unknown => ControlFlow::Break(Estimate::Unknown),
                running => ControlFlow::Continue(running),
            }
        });

    match reduced {
        ControlFlow::Continue(estimate) | ControlFlow::Break(estimate) => estimate,
    }
}

pub fn enhance_pricing_estimates(
    trip: &TripInfo,
    room_types: &[RoomType],
    availability: &AvailabilityResponse,
) -> Vec<EnhancedRoomType> {
    let nights = trip.nights();

    room_types
        .iter()
        .map(|room_type| {
            let estimate = match availability.room_days(&room_type.id) {
                Some(days) => estimate_room(trip, &nights, days),
                None => Estimate::Unknown,
            };

            debug!(
                room_type = %room_type.id,
                arrival = %trip.arrival,
                departure = %trip.departure,
                ?estimate,
                "estimated room quantity"
            );

            EnhancedRoomType::new(room_type, estimate.quantity())
        })
        .collect()
}
