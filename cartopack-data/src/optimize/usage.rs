//! Saturating per-node usage counts.

use std::collections::HashMap;

use cartopack_core::Id;

const COUNTER_BITS: u64 = 2;
const COUNTER_MASK: u64 = 0b11;
const SHARED: u64 = 2;

/// Two-bit saturating counter per node id.
///
/// Counters are packed 32 to a word in a map keyed by `id >> 5`, so sparse
/// id ranges cost memory only where ids occur.
///
/// # Examples
///
/// ```
/// use cartopack_data::NodeUsageCounter;
///
/// let mut counter = NodeUsageCounter::default();
/// counter.mark(42);
/// assert!(!counter.used_at_least_twice(42));
/// counter.mark(42);
/// counter.mark(42);
/// assert!(counter.used_at_least_twice(42));
/// assert_eq!((counter.len(), counter.shared_len()), (1, 1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NodeUsageCounter {
    words: HashMap<u64, u64>,
    distinct: usize,
    shared: usize,
}

impl NodeUsageCounter {
    /// Count one more use of `id`, saturating at two.
    pub fn mark(&mut self, id: Id) {
        let shift = slot_shift(id);
        let word = self.words.entry(id >> 5).or_insert(0);
        match (*word >> shift) & COUNTER_MASK {
            0 => {
                *word |= 1 << shift;
                self.distinct += 1;
            }
            1 => {
                *word = (*word & !(COUNTER_MASK << shift)) | (SHARED << shift);
                self.shared += 1;
            }
            _ => {}
        }
    }

    /// Stored count for `id`: 0, 1 or 2 for "two or more".
    #[must_use]
    pub fn count(&self, id: Id) -> u8 {
        let stored = self
            .words
            .get(&(id >> 5))
            .map_or(0, |word| (word >> slot_shift(id)) & COUNTER_MASK);
        u8::try_from(stored).unwrap_or(u8::MAX)
    }

    /// Whether `id` was marked at least twice.
    #[must_use]
    pub fn used_at_least_twice(&self, id: Id) -> bool {
        u64::from(self.count(id)) >= SHARED
    }

    /// Number of distinct ids marked.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.distinct
    }

    /// Number of ids marked at least twice.
    #[must_use]
    pub const fn shared_len(&self) -> usize {
        self.shared
    }

    /// Whether no id was marked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.distinct == 0
    }
}

const fn slot_shift(id: Id) -> u64 {
    (id & 31) * COUNTER_BITS
}

/// Usage counts while the scan passes are running.
#[derive(Debug, Default)]
pub struct UsageScan {
    counter: NodeUsageCounter,
}

impl UsageScan {
    /// Start with every count at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more use of `id`.
    pub fn mark(&mut self, id: Id) {
        self.counter.mark(id);
    }

    /// Counts gathered so far.
    #[must_use]
    pub const fn counter(&self) -> &NodeUsageCounter {
        &self.counter
    }

    /// End scanning; the counts become read-only.
    #[must_use]
    pub fn finish(self) -> FrozenUsage {
        FrozenUsage {
            counter: self.counter,
        }
    }
}

/// Read-only usage counts required by compaction.
#[derive(Debug)]
pub struct FrozenUsage {
    counter: NodeUsageCounter,
}

impl FrozenUsage {
    /// Whether compaction keeps `id`.
    #[must_use]
    pub fn keeps(&self, id: Id) -> bool {
        id != 0 && self.counter.used_at_least_twice(id)
    }

    /// The underlying counts.
    #[must_use]
    pub const fn counter(&self) -> &NodeUsageCounter {
        &self.counter
    }
}
