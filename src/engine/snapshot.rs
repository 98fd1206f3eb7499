use {
    super::{Frame, OperationRecord},
    crate::{Algorithm, FrameIndex, FrameKey, OwnerId, Technique},
    serde::Serialize,
    std::collections::BTreeMap,
};

/// Point-in-time view of the whole engine state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    /// Memory management technique.
    pub technique: Technique,
    /// Total simulated memory, in bytes.
    pub memory_size: usize,
    /// Page/frame size, in bytes.
    pub page_size: usize,
    /// Replacement algorithm.
    pub algorithm: Algorithm,
    /// Number of frames.
    pub total_frames: usize,
    /// Every frame, indexed by frame number.
    pub frames: Vec<Frame>,
    /// Frames held by each owner.
    pub page_table: BTreeMap<OwnerId, Vec<FrameIndex>>,
    /// Allocated frames in the order the replacement policy would evict them.
    pub eviction_order: Vec<FrameKey>,
    /// Page faults so far, evictions included.
    pub page_faults: u64,
    /// Memory accesses so far.
    pub memory_accesses: u64,
    /// Accesses that hit an allocated frame.
    pub page_hits: u64,
    /// The most recent operations, oldest first.
    pub last_operations: Vec<OperationRecord>,
}

/// Simulation analytics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSnapshot {
    /// Page faults so far, evictions included.
    pub page_faults: u64,
    /// Memory accesses so far.
    pub memory_accesses: u64,
    /// Accesses that hit an allocated frame.
    pub page_hits: u64,
    /// `page_hits / memory_accesses`, or 0 before the first access.
    pub hit_ratio: f64,
    /// `page_faults / memory_accesses`, or 0 before the first access.
    pub miss_ratio: f64,
    /// Fraction of frames currently allocated.
    pub memory_utilization: f64,
    /// Number of frames currently allocated.
    pub allocated_frame_count: usize,
    /// Number of frames.
    pub total_frames: usize,
}
