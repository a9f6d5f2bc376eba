/// Process-wide unique id generators
///
/// Ids identify a logical resource (render target, texture content,
/// graphics context) independently of its native GPU handle, which the
/// driver may recycle after destruction. Ids start at 1, 0 means "none",
/// and a generator never hands out the same id twice.

use std::sync::Mutex;

pub struct UniqueIdGenerator {
    next: Mutex<u64>,
}

impl UniqueIdGenerator {
    pub const fn new() -> Self {
        Self { next: Mutex::new(1) }
    }

    /// Next id of this generator
    pub fn next_id(&self) -> u64 {
        let mut next = match self.next.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = *next;
        *next += 1;
        id
    }
}

impl Default for UniqueIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Ids of render targets
pub(crate) static RENDER_TARGET_IDS: UniqueIdGenerator = UniqueIdGenerator::new();

/// Ids of texture contents (bumped on every content change)
pub(crate) static TEXTURE_IDS: UniqueIdGenerator = UniqueIdGenerator::new();

/// Ids of graphics contexts
pub(crate) static CONTEXT_IDS: UniqueIdGenerator = UniqueIdGenerator::new();

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "unique_id_tests.rs"]
mod tests;
