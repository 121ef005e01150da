//! Sparse (ring) communication topology for multi-agent debate.
//!
//! Each participant only sees its two ring neighbours, so prompt size grows
//! linearly with the ensemble size instead of quadratically.

/// Ring of `size` debate participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingTopology {
    size: usize,
}

impl RingTopology {
    /// Returns `None` for an empty ring.
    pub fn new(size: usize) -> Option<Self> {
        (size > 0).then_some(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// `(left, right)` neighbours of participant `index`.
    ///
    /// A ring of one is its own neighbour on both sides; a ring of two has
    /// each participant neighbouring the other on both sides.
    pub fn neighbors(&self, index: usize) -> (usize, usize) {
        let n = self.size;
        let i = index % n;
        ((i + n - 1) % n, (i + 1) % n)
    }
}
