//! Fleet capacity allocation: admit or reject time-interval reservations
//! against a fixed per-type unit count.
//!
//! The engine is the whole crate — no wire protocol, no persistence. A
//! consumer supplies an [`Inventory`] and a [`Clock`] at construction and
//! calls [`Engine::reserve`] / [`Engine::availability`].

pub mod clock;
pub mod engine;
pub mod model;
pub mod observability;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Engine, EngineError};
pub use model::{Allocation, CarType, Inventory, Ms, Span};
