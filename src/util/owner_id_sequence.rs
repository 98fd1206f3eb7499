use crate::OwnerId;

/// Owner id generator.
///
/// Hands out monotonically increasing ids starting at 1. Ids are never
/// reused, even after the owning allocation is released.
#[derive(Debug)]
pub struct OwnerIdSequence {
    next: OwnerId,
}

impl Default for OwnerIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerIdSequence {
    /// Creates a new sequence, starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next owner id.
    ///
    /// Whenever maximum value is reached, the function returns `None`.
    pub fn next(&mut self) -> Option<OwnerId> {
        let val = self.next;
        self.next = val.checked_add(1)?;
        Some(val)
    }

    /// Creates a sequence whose first id is `next`.
    pub(crate) const fn starting_at(next: OwnerId) -> Self {
        Self { next }
    }

    /// Peeks at the id the next call to [`OwnerIdSequence::next`] returns.
    pub const fn peek(&self) -> OwnerId {
        self.next
    }
}
