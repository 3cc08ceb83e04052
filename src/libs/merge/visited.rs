use fixedbitset::FixedBitSet;

/// Growable "seen" marks keyed by dense node ids.
#[derive(Debug, Default, Clone)]
pub struct VisitedSet {
    bits: FixedBitSet,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(n),
        }
    }

    /// Make room for `id`. Existing marks are kept.
    pub fn grow_to(&mut self, id: usize) {
        if id >= self.bits.len() {
            self.bits.grow(id + 1);
        }
    }

    /// Marks `id`; returns `true` if it was not marked before.
    pub fn mark(&mut self, id: usize) -> bool {
        self.grow_to(id);
        !self.bits.put(id)
    }

    pub fn is_marked(&self, id: usize) -> bool {
        self.bits.contains(id)
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn count(&self) -> usize {
        self.bits.count_ones(..)
    }
}
