mod admission;
mod availability;
mod error;

pub use availability::max_concurrent;
pub use error::EngineError;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::model::*;

pub type SharedTypeState = Arc<RwLock<TypeState>>;

/// The allocation engine: one lock-guarded `TypeState` per car type.
///
/// Admission for a type serializes on that type's write lock — the
/// count/compare/append sequence of `reserve` is indivisible per type,
/// while unrelated types proceed in parallel. Availability reads take
/// the shared side of the same lock, so they never observe a
/// half-committed append.
pub struct Engine<C: Clock = SystemClock> {
    state: DashMap<CarType, SharedTypeState>,
    inventory: Inventory,
    clock: C,
}

impl Engine<SystemClock> {
    pub fn new(inventory: Inventory) -> Self {
        Self::with_clock(inventory, SystemClock)
    }
}

impl<C: Clock> Engine<C> {
    pub fn with_clock(inventory: Inventory, clock: C) -> Self {
        let state = DashMap::new();
        // One entry per variant, created up front. The lock set is fixed
        // for the engine's lifetime and lookups never miss — types absent
        // from the inventory get a zero-capacity state.
        for car_type in CarType::ALL {
            let ts = TypeState::new(car_type, inventory.count(car_type));
            state.insert(car_type, Arc::new(RwLock::new(ts)));
        }
        Self {
            state,
            inventory,
            clock,
        }
    }

    /// Fixed unit count for a type; zero for types the inventory omits.
    pub fn capacity(&self, car_type: CarType) -> u32 {
        self.inventory.count(car_type)
    }

    pub(super) fn now_ms(&self) -> Ms {
        self.clock.now_ms()
    }

    pub(super) fn type_state(&self, car_type: CarType) -> SharedTypeState {
        self.state
            .get(&car_type)
            .map(|e| e.value().clone())
            .expect("every CarType has a state entry")
    }
}
