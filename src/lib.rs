#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(elided_lifetimes_in_paths)]

pub mod config;
mod engine;
mod error;
mod replacer;
mod session;
pub mod tutorial;
mod util;

use {
    serde::{Deserialize, Serialize},
    std::fmt,
};

pub use {
    config::{Algorithm, SimConfig, Technique},
    engine::{
        AccessResult,
        Frame,
        FrameStatus,
        MemoryEngine,
        Operation,
        OperationKind,
        OperationRecord,
        ResultsSnapshot,
        SNAPSHOT_OPERATIONS,
        StateSnapshot,
    },
    error::{SimError, SimResult},
    replacer::{FifoReplacer, LruReplacer, Replacer},
    session::{OperationOutcome, OperationRequest, OperationResult, Session, TutorialUpdate},
    util::OwnerIdSequence,
};

/// Identifier of one allocation (process or segment).
///
/// Assigned at allocation time and never reused within an engine instance.
pub type OwnerId = u64;

/// Index into the frame array.
///
/// `frame * page_size` is the base address of the frame.
pub type FrameIndex = usize;

/// Logical clock value used by access-ordered policies.
pub type Timestamp = u64;

/// A frame together with the allocation currently holding it.
///
/// Replacement policies track frames by this composite key, so that a frame
/// freed and then handed to another owner is a different entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameKey {
    /// Owning allocation.
    pub owner: OwnerId,

    /// Frame held by the owner.
    pub frame: FrameIndex,
}

impl FrameKey {
    /// Creates a new frame key.
    pub const fn new(owner: OwnerId, frame: FrameIndex) -> Self {
        Self { owner, frame }
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.owner, self.frame)
    }
}

/// Page replacement policy.
///
/// Keeps the replacement metadata of every allocated frame and selects the
/// next victim when an allocation runs short of free frames. A key is tracked
/// by the policy exactly as long as the frame is allocated to that owner.
pub trait ReplacementPolicy {
    /// Starts tracking a newly allocated frame.
    ///
    /// `now` is the logical time of the allocation.
    fn insert(&mut self, key: FrameKey, now: Timestamp);

    /// Notifies the policy that an allocated frame has been accessed.
    fn touch(&mut self, key: FrameKey, now: Timestamp);

    /// Stops tracking a frame. Returns whether the key was tracked.
    fn remove(&mut self, key: FrameKey) -> bool;

    /// Find the next frame to be evicted and stop tracking it.
    fn evict(&mut self) -> Option<FrameKey>;

    /// Peek into the next frame to be evicted.
    fn peek(&self) -> Option<FrameKey>;

    /// Whether the key is currently tracked.
    fn contains(&self, key: FrameKey) -> bool;

    /// All tracked keys, in the order they would be evicted.
    fn eviction_order(&self) -> Vec<FrameKey>;

    /// Number of tracked frames.
    fn len(&self) -> usize;

    /// Whether no frame is tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
