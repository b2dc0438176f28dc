//! Message-id allocation.

/// Monotonic id counter for one interface's planning pass.
///
/// Ids are handed out strictly in call order; the planner's traversal order is what makes allocation
/// deterministic.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<u32>,
}

impl IdAllocator {
    pub fn new(base: u32) -> Self {
        Self { next: Some(base) }
    }

    /// Take the next id, or `None` once the `u32` range is exhausted.
    pub fn allocate(&mut self) -> Option<u32> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// The id the next [`allocate`](Self::allocate) would return.
    pub fn peek(&self) -> Option<u32> {
        self.next
    }
}
