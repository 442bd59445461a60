use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only time type.
pub type Ms = i64;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    /// Half-open overlap: touching spans (one ends where the other starts)
    /// do not overlap, so back-to-back rentals never contend.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }
}

/// The fleet's fixed set of rentable classes. Fungible within a class:
/// a reservation claims one unit, never a specific vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarType {
    Sedan,
    Suv,
    Van,
}

impl CarType {
    pub const ALL: [CarType; 3] = [CarType::Sedan, CarType::Suv, CarType::Van];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarType::Sedan => "SEDAN",
            CarType::Suv => "SUV",
            CarType::Van => "VAN",
        }
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCarType(pub String);

impl fmt::Display for UnknownCarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown car type: {}", self.0)
    }
}

impl std::error::Error for UnknownCarType {}

impl FromStr for CarType {
    type Err = UnknownCarType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEDAN" => Ok(CarType::Sedan),
            "SUV" => Ok(CarType::Suv),
            "VAN" => Ok(CarType::Van),
            other => Err(UnknownCarType(other.to_owned())),
        }
    }
}

/// Capacity table: units per car type, fixed at engine construction.
/// Types without an entry have zero capacity — that's a valid table,
/// not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    counts: HashMap<CarType, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, car_type: CarType, count: u32) -> Self {
        self.counts.insert(car_type, count);
        self
    }

    pub fn count(&self, car_type: CarType) -> u32 {
        self.counts.get(&car_type).copied().unwrap_or(0)
    }

    /// Default fleet: two sedans, one SUV, three vans.
    pub fn standard() -> Self {
        Self::new()
            .with_count(CarType::Sedan, 2)
            .with_count(CarType::Suv, 1)
            .with_count(CarType::Van, 3)
    }
}

impl FromIterator<(CarType, u32)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (CarType, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// A committed claim on one unit of a car type for `[span.start, span.end)`.
/// Immutable once created; ids are never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: Ulid,
    pub holder: String,
    pub car_type: CarType,
    pub span: Span,
}

/// Per-type state: the capacity copied from the inventory plus the
/// append-only allocation list, sorted by `span.start`.
#[derive(Debug)]
pub struct TypeState {
    pub car_type: CarType,
    pub capacity: u32,
    pub allocations: Vec<Allocation>,
}

impl TypeState {
    pub fn new(car_type: CarType, capacity: u32) -> Self {
        Self {
            car_type,
            capacity,
            allocations: Vec::new(),
        }
    }

    /// Append an allocation maintaining sort order by span.start.
    pub fn push_allocation(&mut self, allocation: Allocation) {
        let pos = self
            .allocations
            .binary_search_by_key(&allocation.span.start, |a| a.span.start)
            .unwrap_or_else(|e| e);
        self.allocations.insert(pos, allocation);
    }

    /// Return only allocations whose span overlaps the query window.
    /// Uses binary search to skip allocations starting at or after `query.end`.
    pub fn overlapping(&self, query: &Span) -> impl Iterator<Item = &Allocation> {
        // Everything at index >= right_bound starts at or after query.end → can't overlap.
        let right_bound = self
            .allocations
            .partition_point(|a| a.span.start < query.end);
        self.allocations[..right_bound]
            .iter()
            .filter(move |a| a.span.end > query.start)
    }

    pub fn overlap_count(&self, query: &Span) -> u32 {
        self.overlapping(query).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(start: Ms, end: Ms) -> Allocation {
        Allocation {
            id: Ulid::new(),
            holder: "test".into(),
            car_type: CarType::Sedan,
            span: Span::new(start, end),
        }
    }

    #[test]
    fn span_basics() {
        let s = Span::new(100, 200);
        assert_eq!(s.duration_ms(), 100);
        assert!(s.contains_instant(100));
        assert!(s.contains_instant(199));
        assert!(!s.contains_instant(200)); // half-open
    }

    #[test]
    fn span_overlap() {
        let a = Span::new(100, 200);
        let b = Span::new(150, 250);
        let c = Span::new(200, 300);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
    }

    #[test]
    fn car_type_wire_spelling_roundtrip() {
        for ct in CarType::ALL {
            assert_eq!(ct.as_str().parse::<CarType>().unwrap(), ct);
        }
        assert!("TRUCK".parse::<CarType>().is_err());
        assert!("sedan".parse::<CarType>().is_err()); // spelling is exact
    }

    #[test]
    fn inventory_absent_type_is_zero() {
        let inv = Inventory::new().with_count(CarType::Sedan, 2);
        assert_eq!(inv.count(CarType::Sedan), 2);
        assert_eq!(inv.count(CarType::Van), 0);
    }

    #[test]
    fn inventory_standard_fleet() {
        let inv = Inventory::standard();
        assert_eq!(inv.count(CarType::Sedan), 2);
        assert_eq!(inv.count(CarType::Suv), 1);
        assert_eq!(inv.count(CarType::Van), 3);
    }

    #[test]
    fn allocation_ordering() {
        let mut ts = TypeState::new(CarType::Sedan, 2);
        ts.push_allocation(alloc(300, 400));
        ts.push_allocation(alloc(100, 200));
        ts.push_allocation(alloc(200, 300));
        assert_eq!(ts.allocations[0].span.start, 100);
        assert_eq!(ts.allocations[1].span.start, 200);
        assert_eq!(ts.allocations[2].span.start, 300);
    }

    #[test]
    fn overlapping_skips_past_and_future() {
        let mut ts = TypeState::new(CarType::Sedan, 2);
        ts.push_allocation(alloc(100, 200)); // ends before query
        ts.push_allocation(alloc(450, 600)); // overlapping
        ts.push_allocation(alloc(1000, 1100)); // starts after query end

        let query = Span::new(500, 800);
        let hits: Vec<_> = ts.overlapping(&query).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].span, Span::new(450, 600));
    }

    #[test]
    fn overlapping_adjacent_not_included() {
        // Allocation ending exactly at query.start is NOT overlapping (half-open)
        let mut ts = TypeState::new(CarType::Sedan, 2);
        ts.push_allocation(alloc(100, 200));
        let query = Span::new(200, 300);
        assert_eq!(ts.overlap_count(&query), 0);
    }

    #[test]
    fn overlapping_large_allocation_spanning_query() {
        let mut ts = TypeState::new(CarType::Sedan, 2);
        ts.push_allocation(alloc(0, 10000));
        let query = Span::new(500, 600);
        assert_eq!(ts.overlap_count(&query), 1);
    }

    #[test]
    fn overlapping_empty_state() {
        let ts = TypeState::new(CarType::Van, 3);
        assert_eq!(ts.overlap_count(&Span::new(0, 1000)), 0);
    }

    #[test]
    fn overlapping_single_ms_overlap() {
        // Allocation [100, 201) overlaps query [200, 300) by exactly 1ms
        let mut ts = TypeState::new(CarType::Sedan, 2);
        ts.push_allocation(alloc(100, 201));
        assert_eq!(ts.overlap_count(&Span::new(200, 300)), 1);
    }
}
