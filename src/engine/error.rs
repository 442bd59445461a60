use crate::model::{CarType, Ms};

/// All variants are recoverable by the caller; no failure path mutates
/// the allocation store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Return instant not strictly after pickup.
    InvalidRange { start: Ms, end: Ms },
    /// Pickup before the clock's "now" at evaluation time.
    PastPickup { start: Ms, now: Ms },
    /// Malformed input (blank holder).
    InvalidInput(&'static str),
    /// Every unit of the type is claimed somewhere in the window.
    CapacityExceeded(CarType),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidRange { start, end } => {
                write!(f, "return date must be after pickup date: [{start}, {end})")
            }
            EngineError::PastPickup { start, now } => {
                write!(f, "pickup date cannot be in the past: {start} < {now}")
            }
            EngineError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            EngineError::CapacityExceeded(car_type) => {
                write!(f, "no {car_type} available for the requested window")
            }
        }
    }
}

impl std::error::Error for EngineError {}
