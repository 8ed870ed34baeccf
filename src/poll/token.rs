//! Generation tokens for supersession of poll sessions

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues monotonically increasing generation tokens for one logical slot,
/// typically one visible job panel.
///
/// Clones share the underlying counter, so a clone issues tokens for the
/// same slot.
#[derive(Debug, Clone, Default)]
pub struct PollSlot {
    current: Arc<AtomicU64>,
}

impl PollSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token, making every previously issued token stale.
    pub fn issue(&self) -> PollToken {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        PollToken {
            generation,
            current: Arc::clone(&self.current),
        }
    }
}

/// One session's claim on a slot
///
/// The claim holds only until the slot issues a newer token; sessions check
/// before acting on fetched state and stand down once stale.
#[derive(Debug, Clone)]
pub struct PollToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl PollToken {
    /// Whether this token is still the slot's newest generation
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
