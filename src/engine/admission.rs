use std::time::Instant;

use ulid::Ulid;

use crate::clock::Clock;
use crate::model::*;
use crate::observability;

use super::{Engine, EngineError};

impl<C: Clock> Engine<C> {
    /// Admit or reject a reservation for one unit of `car_type` over
    /// `[start, end)`.
    ///
    /// Validation is fail-fast and ordered: inverted/zero-length range,
    /// then pickup-in-the-past (judged against a single clock read),
    /// then blank holder. Only then is the type's write lock taken and
    /// the overlap count compared to capacity.
    ///
    /// Admission is deliberately conservative: it counts every committed
    /// allocation overlapping the window, not the peak number in use at
    /// any one instant. Overlapping bookings that never overlap each
    /// other still each consume a slot. `peak_availability` exposes the
    /// stricter number; admission never uses it.
    pub async fn reserve(
        &self,
        holder: &str,
        car_type: CarType,
        start: Ms,
        end: Ms,
    ) -> Result<Allocation, EngineError> {
        let call_start = Instant::now();
        let result = self.admit(holder, car_type, start, end).await;
        metrics::histogram!(
            observability::RESERVE_DURATION_SECONDS,
            "car_type" => car_type.as_str(),
        )
        .record(call_start.elapsed().as_secs_f64());
        metrics::counter!(
            observability::RESERVATIONS_TOTAL,
            "car_type" => car_type.as_str(),
            "status" => observability::reserve_status(&result),
        )
        .increment(1);
        result
    }

    async fn admit(
        &self,
        holder: &str,
        car_type: CarType,
        start: Ms,
        end: Ms,
    ) -> Result<Allocation, EngineError> {
        if end <= start {
            return Err(EngineError::InvalidRange { start, end });
        }
        // One clock read per call; never re-sampled mid-validation.
        let now = self.now_ms();
        if start < now {
            return Err(EngineError::PastPickup { start, now });
        }
        if holder.trim().is_empty() {
            return Err(EngineError::InvalidInput("holder must not be blank"));
        }

        let span = Span::new(start, end);
        let ts = self.type_state(car_type);
        let mut guard = ts.write().await;

        let overlapping = guard.overlap_count(&span);
        if overlapping >= guard.capacity {
            tracing::debug!(
                %car_type,
                start,
                end,
                overlapping,
                capacity = guard.capacity,
                "reservation rejected: capacity exceeded"
            );
            return Err(EngineError::CapacityExceeded(car_type));
        }

        let allocation = Allocation {
            id: Ulid::new(),
            holder: holder.to_owned(),
            car_type,
            span,
        };
        tracing::debug!(
            id = %allocation.id,
            %car_type,
            start,
            end,
            overlapping,
            capacity = guard.capacity,
            "reservation committed"
        );
        guard.push_allocation(allocation.clone());
        Ok(allocation)
    }
}
