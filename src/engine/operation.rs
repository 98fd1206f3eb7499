use {
    crate::{FrameIndex, OwnerId},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// Outcome of a memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessResult {
    /// The addressed frame was allocated.
    Hit,
    /// The addressed frame was free and had to be paged in.
    Fault,
}

/// Kind of a mutating engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Memory allocation.
    Allocate,
    /// Memory deallocation.
    Deallocate,
    /// Memory access.
    Access,
}

/// A mutating operation as applied by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Operation {
    /// `size` bytes were allocated to `owner_id` in `frames`.
    Allocate {
        /// New owner.
        owner_id: OwnerId,
        /// Requested size, in bytes.
        size: usize,
        /// Frames handed to the owner, ascending.
        frames: Vec<FrameIndex>,
    },
    /// Every frame of `owner_id` was released.
    Deallocate {
        /// Released owner.
        owner_id: OwnerId,
        /// Base address of the frame the request resolved to.
        address: usize,
        /// Frames released.
        frames: Vec<FrameIndex>,
    },
    /// `address` was accessed.
    Access {
        /// Address as requested.
        address: usize,
        /// Hit or fault.
        result: AccessResult,
    },
}

impl Operation {
    /// Kind of the operation.
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Allocate { .. } => OperationKind::Allocate,
            Self::Deallocate { .. } => OperationKind::Deallocate,
            Self::Access { .. } => OperationKind::Access,
        }
    }
}

/// Entry of the operation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Wall-clock time the operation was applied.
    pub at: DateTime<Utc>,

    /// The operation.
    #[serde(flatten)]
    pub operation: Operation,
}

impl OperationRecord {
    pub(crate) fn now(operation: Operation) -> Self {
        Self {
            at: Utc::now(),
            operation,
        }
    }
}
