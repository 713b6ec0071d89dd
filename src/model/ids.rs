use time::OffsetDateTime;

/// Hands out note and task identifiers.
///
/// Ids are millisecond timestamps where possible, but every id is strictly
/// greater than the previous one, so bursts inside one clock tick and clocks
/// that step backwards still yield distinct, ordered ids.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start above an already-issued id, e.g. the largest one found on load.
    pub fn seeded(floor: i64) -> Self {
        Self { last: floor }
    }

    pub fn next_id(&mut self) -> i64 {
        self.next_at(now_millis())
    }

    /// Raise the floor without issuing an id.
    pub fn observe(&mut self, id: i64) {
        if id > self.last {
            self.last = id;
        }
    }

    fn next_at(&mut self, clock_ms: i64) -> i64 {
        let id = clock_ms.max(self.last.saturating_add(1));
        self.last = id;
        id
    }
}

fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_tick_ids_are_strictly_increasing() {
        let mut ids = IdGenerator::new();
        let a = ids.next_at(1_000);
        let b = ids.next_at(1_000);
        let c = ids.next_at(1_000);
        assert_eq!((a, b, c), (1_000, 1_001, 1_002));
    }

    #[test]
    fn clock_going_backwards_does_not_reuse_ids() {
        let mut ids = IdGenerator::new();
        let first = ids.next_at(5_000);
        let second = ids.next_at(4_000);
        assert!(second > first);
    }

    #[test]
    fn seeded_generator_stays_above_floor() {
        let far_future = now_millis() + 60_000;
        let mut ids = IdGenerator::seeded(far_future);
        assert_eq!(ids.next_id(), far_future + 1);
    }

    #[test]
    fn rapid_calls_never_collide() {
        let mut ids = IdGenerator::new();
        let issued: Vec<i64> = (0..10_000).map(|_| ids.next_id()).collect();
        assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
