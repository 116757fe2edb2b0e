//! Fixed-capacity containers backing the pipeline state.
//!
//! `RingBuffer` is addressed by an absolute sample index; slot `index % capacity`
//! is overwritten in place, so an index that has been lapped silently reads the
//! newer sample. `BoundedLog` is append-only and saturating: once full, further
//! pushes are counted and discarded while earlier entries stay intact.

/// Circular history addressed by absolute sample index.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// `capacity` must be non-zero; `PipelineConfig::validate` guarantees it for
    /// the filter bank.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity.max(1)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot that `index` maps to; always `< capacity`.
    pub fn slot(&self, index: usize) -> usize {
        index % self.slots.len()
    }

    pub fn write(&mut self, index: usize, value: T) {
        let slot = self.slot(index);
        self.slots[slot] = value;
    }

    pub fn read(&self, index: usize) -> T {
        self.slots[self.slot(index)]
    }

    /// Reads the entry `back` positions before `index`, wrapping below slot 0.
    pub fn read_back(&self, index: usize, back: usize) -> T {
        let cap = self.slots.len();
        let slot = (self.slot(index) + cap - back % cap) % cap;
        self.slots[slot]
    }

    pub fn clear(&mut self) {
        self.slots.fill(T::default());
    }
}

/// Append-only sequence that drops pushes once `capacity` entries are held.
#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    items: Vec<T>,
    capacity: usize,
    dropped: usize,
}

impl<T: Copy> BoundedLog<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Returns `false` when the entry was dropped.
    pub fn push(&mut self, value: T) -> bool {
        if self.is_full() {
            self.dropped += 1;
            return false;
        }
        self.items.push(value);
        true
    }

    /// Number of pushes rejected since the last `clear`.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn last(&self) -> Option<T> {
        self.items.last().copied()
    }

    /// The two most recent entries, oldest first.
    pub fn last_pair(&self) -> Option<(T, T)> {
        match self.items.as_slice() {
            [.., a, b] => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.dropped = 0;
    }
}
