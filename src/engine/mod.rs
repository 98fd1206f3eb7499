//! Memory simulation engine.
//!
//! The engine owns the frame array, the page table mapping owners to their
//! frames, the replacement policy, and the counters derived analytics are
//! computed from. Every operation is a synchronous in-memory mutation; one
//! engine instance serves exactly one simulation.

mod frame;
mod operation;
mod snapshot;

use {
    crate::{
        FrameIndex,
        FrameKey,
        OwnerId,
        OwnerIdSequence,
        ReplacementPolicy,
        Replacer,
        SimConfig,
        SimError,
        SimResult,
    },
    std::collections::BTreeMap,
    tracing::{debug, error, info, warn},
};

pub use {
    frame::{Frame, FrameStatus},
    operation::{AccessResult, Operation, OperationKind, OperationRecord},
    snapshot::{ResultsSnapshot, StateSnapshot},
};

/// Number of log entries exposed by [`MemoryEngine::current_state`].
pub const SNAPSHOT_OPERATIONS: usize = 10;

/// Memory simulation engine.
#[derive(Debug)]
pub struct MemoryEngine {
    config: SimConfig,

    /// Frame array, indexed by frame number.
    frames: Vec<Frame>,

    /// Frames held by each owner, in allocation order.
    page_table: BTreeMap<OwnerId, Vec<FrameIndex>>,

    /// Replacement metadata of every allocated frame.
    replacer: Replacer,

    page_faults: u64,
    memory_accesses: u64,
    page_hits: u64,

    /// Append-only operation log.
    operations: Vec<OperationRecord>,

    ids: OwnerIdSequence,
}

impl MemoryEngine {
    /// Creates a new engine with every frame free.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let total_frames = config.total_frames();
        info!(
            technique = %config.technique,
            memory_size = config.memory_size,
            page_size = config.page_size,
            algorithm = %config.algorithm,
            total_frames,
            "memory engine initialized"
        );

        Ok(Self {
            config,
            frames: vec![Frame::Free; total_frames],
            page_table: BTreeMap::new(),
            replacer: Replacer::for_algorithm(config.algorithm),
            page_faults: 0,
            memory_accesses: 0,
            page_hits: 0,
            operations: Vec::new(),
            ids: OwnerIdSequence::new(),
        })
    }

    /// Configuration the engine was built with.
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of frames.
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// Frame array, indexed by frame number.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Frames held by each owner.
    pub const fn page_table(&self) -> &BTreeMap<OwnerId, Vec<FrameIndex>> {
        &self.page_table
    }

    /// Allocated frames in the order the replacement policy would evict them.
    pub fn eviction_order(&self) -> Vec<FrameKey> {
        self.replacer.eviction_order()
    }

    /// Full operation log, oldest first.
    pub fn operations(&self) -> &[OperationRecord] {
        &self.operations
    }

    /// Base address of the lowest allocated frame.
    pub fn first_allocated_address(&self) -> Option<usize> {
        self.first_allocated()
            .map(|(frame, _)| frame * self.config.page_size)
    }

    /// Allocates `size` bytes and returns the base address of the first
    /// (lowest) frame handed out.
    ///
    /// Frames are placed lowest address first. When there are not enough free
    /// frames, exactly the shortfall is evicted using the configured
    /// replacement algorithm. A request that cannot fit even into empty memory
    /// is rejected without touching any state.
    pub fn allocate(&mut self, size: usize) -> SimResult<usize> {
        if size == 0 {
            return Err(SimError::InvalidSize);
        }

        let page_size = self.config.page_size;
        let pages_needed = size.div_ceil(page_size);
        if pages_needed > self.frames.len() {
            return Err(SimError::Capacity {
                size,
                memory_size: self.config.memory_size,
            });
        }

        let mut free = self.free_frames();
        if free.len() < pages_needed {
            let shortfall = pages_needed - free.len();
            let evicted = self.replace_frames(shortfall);
            if evicted < shortfall {
                warn!(shortfall, evicted, "replacement freed fewer frames than needed");
            }
            free = self.free_frames();
        }
        if free.is_empty() {
            return Err(SimError::Capacity {
                size,
                memory_size: self.config.memory_size,
            });
        }

        let owner = self.ids.next().ok_or(SimError::OwnerIdsExhausted)?;
        free.truncate(pages_needed);
        let now = self.memory_accesses;
        for &frame in &free {
            self.frames[frame] = Frame::Allocated { owner_id: owner };
            self.replacer.insert(FrameKey::new(owner, frame), now);
        }
        let _ = self.page_table.insert(owner, free.clone());

        let address = free[0] * page_size;
        debug!(
            size,
            pages = pages_needed,
            owner,
            frames = ?free,
            "allocated memory"
        );
        self.record(Operation::Allocate {
            owner_id: owner,
            size,
            frames: free,
        });

        Ok(address)
    }

    /// Releases the whole allocation holding the frame at `address`.
    ///
    /// If that frame is free, the lowest allocated frame is released instead.
    pub fn deallocate(&mut self, address: usize) -> SimResult<()> {
        let frame = address / self.config.page_size;
        if frame >= self.frames.len() {
            return Err(SimError::InvalidAddress { address, frame });
        }

        let (resolved, owner) = match self.frames[frame] {
            Frame::Allocated { owner_id } => (frame, owner_id),
            Frame::Free => {
                let (fallback, owner) = self.first_allocated().ok_or(SimError::NothingAllocated)?;
                warn!(
                    address,
                    frame = fallback,
                    "no allocated memory at address, using first allocated frame instead"
                );
                (fallback, owner)
            }
        };

        let released = match self.page_table.remove(&owner) {
            Some(frames) if !frames.is_empty() => frames,
            _ => {
                warn!(
                    owner,
                    frame = resolved,
                    "owner missing from page table, freeing the addressed frame only"
                );
                vec![resolved]
            }
        };

        for &frame in &released {
            if let Some(slot) = self.frames.get_mut(frame) {
                *slot = Frame::Free;
            }
            let _ = self.replacer.remove(FrameKey::new(owner, frame));
        }

        debug!(owner, frames = ?released, "deallocated memory");
        self.record(Operation::Deallocate {
            owner_id: owner,
            address: resolved * self.config.page_size,
            frames: released,
        });

        Ok(())
    }

    /// Simulates an access to `address`, returning `true` on a page hit.
    ///
    /// Addresses beyond the end of memory are clamped to the last frame. An
    /// access to a free frame counts as a page fault and pages the frame in
    /// under a new owner. Never fails.
    pub fn access(&mut self, address: usize) -> bool {
        let last = self.frames.len() - 1;
        let mut frame = address / self.config.page_size;
        if frame > last {
            warn!(address, frame = last, "address out of bounds, clamping to last frame");
            frame = last;
        }

        self.memory_accesses += 1;
        let now = self.memory_accesses;

        match self.frames[frame] {
            Frame::Allocated { owner_id } => {
                self.page_hits += 1;
                self.replacer.touch(FrameKey::new(owner_id, frame), now);
                debug!(address, frame, owner = owner_id, "page hit");
                self.record(Operation::Access {
                    address,
                    result: AccessResult::Hit,
                });
                true
            }
            Frame::Free => {
                self.page_faults += 1;
                if let Err(err) = self.handle_page_fault(frame) {
                    error!(address, frame, %err, "error handling page fault");
                }
                debug!(address, frame, "page fault");
                self.record(Operation::Access {
                    address,
                    result: AccessResult::Fault,
                });
                false
            }
        }
    }

    /// Point-in-time view of the engine. Pure read.
    pub fn current_state(&self) -> StateSnapshot {
        let skip = self.operations.len().saturating_sub(SNAPSHOT_OPERATIONS);
        StateSnapshot {
            technique: self.config.technique,
            memory_size: self.config.memory_size,
            page_size: self.config.page_size,
            algorithm: self.config.algorithm,
            total_frames: self.frames.len(),
            frames: self.frames.clone(),
            page_table: self.page_table.clone(),
            eviction_order: self.replacer.eviction_order(),
            page_faults: self.page_faults,
            memory_accesses: self.memory_accesses,
            page_hits: self.page_hits,
            last_operations: self.operations[skip..].to_vec(),
        }
    }

    /// Simulation analytics. Pure read.
    pub fn results(&self) -> ResultsSnapshot {
        let ratio = |count: u64| {
            if self.memory_accesses == 0 {
                0.0
            } else {
                count as f64 / self.memory_accesses as f64
            }
        };
        let allocated = self.frames.iter().filter(|f| f.is_allocated()).count();
        let total = self.frames.len();

        ResultsSnapshot {
            page_faults: self.page_faults,
            memory_accesses: self.memory_accesses,
            page_hits: self.page_hits,
            hit_ratio: ratio(self.page_hits),
            miss_ratio: ratio(self.page_faults),
            memory_utilization: if total == 0 {
                0.0
            } else {
                allocated as f64 / total as f64
            },
            allocated_frame_count: allocated,
            total_frames: total,
        }
    }

    fn record(&mut self, operation: Operation) {
        self.operations.push(OperationRecord::now(operation));
    }

    fn free_frames(&self) -> Vec<FrameIndex> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_allocated())
            .map(|(i, _)| i)
            .collect()
    }

    fn first_allocated(&self) -> Option<(FrameIndex, OwnerId)> {
        self.frames
            .iter()
            .enumerate()
            .find_map(|(i, f)| f.owner_id().map(|owner| (i, owner)))
    }

    /// Evicts up to `count` frames, returning how many were actually freed.
    ///
    /// Victims come from the replacement policy. Should the policy run dry
    /// while frames are still allocated, the lowest allocated frame is
    /// evicted instead. Stops early once nothing is allocated.
    fn replace_frames(&mut self, count: usize) -> usize {
        let algorithm = self.replacer.algorithm();
        let mut evicted = 0;

        while evicted < count {
            let victim = match self.replacer.evict() {
                Some(key) => key,
                None => {
                    let Some((frame, owner)) = self.first_allocated() else {
                        warn!(%algorithm, "no allocated frames to replace");
                        break;
                    };
                    warn!(
                        %algorithm,
                        frame,
                        "replacement metadata empty, using first allocated frame"
                    );
                    FrameKey::new(owner, frame)
                }
            };

            if self.frames.get(victim.frame).and_then(Frame::owner_id) != Some(victim.owner) {
                error!(%victim, "stale replacement entry, skipping");
                continue;
            }

            self.frames[victim.frame] = Frame::Free;
            if let Some(frames) = self.page_table.get_mut(&victim.owner) {
                frames.retain(|&f| f != victim.frame);
                if frames.is_empty() {
                    let _ = self.page_table.remove(&victim.owner);
                }
            }
            self.page_faults += 1;
            evicted += 1;

            debug!(
                frame = victim.frame,
                owner = victim.owner,
                %algorithm,
                "replaced page"
            );
        }

        evicted
    }

    /// Pages a free frame in under a brand-new owner.
    fn handle_page_fault(&mut self, frame: FrameIndex) -> SimResult<()> {
        if self.frames[frame].is_allocated() {
            return Ok(());
        }

        let owner = self.ids.next().ok_or(SimError::OwnerIdsExhausted)?;
        self.frames[frame] = Frame::Allocated { owner_id: owner };
        self.page_table.entry(owner).or_default().push(frame);
        self.replacer
            .insert(FrameKey::new(owner, frame), self.memory_accesses);

        debug!(frame, owner, "handled page fault");
        Ok(())
    }
}
