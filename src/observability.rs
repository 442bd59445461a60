use crate::engine::EngineError;
use crate::model::Allocation;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: reservation attempts. Labels: car_type, status.
pub const RESERVATIONS_TOTAL: &str = "fleetcap_reservations_total";

/// Histogram: reserve call latency in seconds. Labels: car_type.
pub const RESERVE_DURATION_SECONDS: &str = "fleetcap_reserve_duration_seconds";

/// Counter: availability queries. Labels: car_type, mode.
pub const AVAILABILITY_QUERIES_TOTAL: &str = "fleetcap_availability_queries_total";

/// Map a reserve outcome to a short status label for metrics.
pub fn reserve_status(result: &Result<Allocation, EngineError>) -> &'static str {
    match result {
        Ok(_) => "committed",
        Err(EngineError::InvalidRange { .. }) => "invalid_range",
        Err(EngineError::PastPickup { .. }) => "past_pickup",
        Err(EngineError::InvalidInput(_)) => "invalid_input",
        Err(EngineError::CapacityExceeded(_)) => "capacity_exceeded",
    }
}
