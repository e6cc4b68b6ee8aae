// Room availability estimates for a prospective stay

pub mod availability;
pub mod client;
pub mod enhancer;
pub mod room_type;
pub mod service;
pub mod trip;

// Re-export key types for convenience
pub use availability::{AvailabilityError, AvailabilityResponse, DayRecord, Restrictions};
pub use client::{
    ApiError, AvailabilityQuery, AvailabilitySource, ClientConfig, ClientError,
    HttpAvailabilitySource, RetryConfig,
};
pub use enhancer::{enhance_pricing_estimates, Estimate};
pub use room_type::{EnhancedRoomType, RoomType};
pub use service::EstimateService;
pub use trip::{Night, TripError, TripInfo};
