use crate::clock::Clock;
use crate::model::*;
use crate::observability;

use super::{Engine, EngineError};

impl<C: Clock> Engine<C> {
    /// Remaining units of `car_type` over `[start, end)` under the
    /// conservative any-overlap count: `capacity − overlapping`, clamped
    /// at zero. This is the number `reserve` bases admission on.
    ///
    /// Only the window shape is validated (`end > start`); past or
    /// partially-past windows get a defensive answer rather than an
    /// error. Pure read under the type's shared lock.
    pub async fn availability(
        &self,
        car_type: CarType,
        start: Ms,
        end: Ms,
    ) -> Result<u32, EngineError> {
        if end <= start {
            return Err(EngineError::InvalidRange { start, end });
        }
        metrics::counter!(
            observability::AVAILABILITY_QUERIES_TOTAL,
            "car_type" => car_type.as_str(),
            "mode" => "conservative",
        )
        .increment(1);

        let span = Span::new(start, end);
        let ts = self.type_state(car_type);
        let guard = ts.read().await;
        Ok(guard.capacity.saturating_sub(guard.overlap_count(&span)))
    }

    /// Remaining units under peak concurrent usage within the window:
    /// `capacity − max simultaneous allocations`, clamped at zero.
    ///
    /// A distinct, stricter read — it can report free units the
    /// conservative count (and therefore `reserve`) will still refuse.
    pub async fn peak_availability(
        &self,
        car_type: CarType,
        start: Ms,
        end: Ms,
    ) -> Result<u32, EngineError> {
        if end <= start {
            return Err(EngineError::InvalidRange { start, end });
        }
        metrics::counter!(
            observability::AVAILABILITY_QUERIES_TOTAL,
            "car_type" => car_type.as_str(),
            "mode" => "peak",
        )
        .increment(1);

        let span = Span::new(start, end);
        let ts = self.type_state(car_type);
        let guard = ts.read().await;
        let clamped: Vec<Span> = guard
            .overlapping(&span)
            .map(|a| {
                Span::new(
                    a.span.start.max(span.start),
                    a.span.end.min(span.end),
                )
            })
            .collect();
        Ok(guard.capacity.saturating_sub(max_concurrent(&clamped)))
    }
}

/// Sweep line: maximum number of spans covering any single instant.
/// At equal timestamps the `-1` end event sorts before the `+1` start
/// event, so touching spans never count as concurrent.
pub fn max_concurrent(spans: &[Span]) -> u32 {
    if spans.is_empty() {
        return 0;
    }

    let mut events: Vec<(Ms, i32)> = Vec::with_capacity(spans.len() * 2);
    for s in spans {
        events.push((s.start, 1));
        events.push((s.end, -1));
    }
    events.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut count: i32 = 0;
    let mut peak: i32 = 0;
    for (_, delta) in &events {
        count += delta;
        peak = peak.max(count);
    }
    peak as u32
}
