use std::cell::Cell;

/// Counter bumped from `&self` methods (peeks, frequency lookups, snapshots).
///
/// Plain `Cell`: the owning cache is single-threaded.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct MetricsCell(Cell<u64>);

impl MetricsCell {
    #[inline]
    pub fn new() -> Self {
        Self(Cell::new(0))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.get()
    }

    #[inline]
    pub fn incr(&self) {
        self.0.set(self.0.get().saturating_add(1));
    }

    #[inline]
    pub fn reset(&self) {
        self.0.set(0);
    }
}
