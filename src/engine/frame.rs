use {
    crate::OwnerId,
    serde::{Deserialize, Serialize},
};

/// Occupancy of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    /// Not held by any allocation.
    Free,
    /// Held by an allocation.
    Allocated,
}

/// One slot of simulated physical memory.
///
/// An allocated frame always carries its owner, a free frame never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Frame {
    /// Not held by any allocation.
    #[default]
    Free,
    /// Held by the allocation `owner_id`.
    Allocated {
        /// Owning allocation.
        owner_id: OwnerId,
    },
}

impl Frame {
    /// Frame status.
    pub const fn status(&self) -> FrameStatus {
        match self {
            Self::Free => FrameStatus::Free,
            Self::Allocated { .. } => FrameStatus::Allocated,
        }
    }

    /// Owner of the frame, if allocated.
    pub const fn owner_id(&self) -> Option<OwnerId> {
        match self {
            Self::Free => None,
            Self::Allocated { owner_id } => Some(*owner_id),
        }
    }

    /// Whether the frame is held by an allocation.
    pub const fn is_allocated(&self) -> bool {
        matches!(self, Self::Allocated { .. })
    }
}
