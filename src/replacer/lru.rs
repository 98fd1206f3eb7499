use {
    crate::{FrameIndex, FrameKey, OwnerId, ReplacementPolicy, Timestamp},
    priority_queue::PriorityQueue,
    std::cmp::Reverse,
};

/// Least Recently Used (LRU) frame replacer.
///
/// This implementation uses a priority queue to manage the frames, ordered by
/// the logical time of the last access. Frames sharing the oldest timestamp
/// are evicted lowest frame index first (then lowest owner id), so the
/// eviction order never depends on hashing.
#[derive(Debug, Default, Clone)]
pub struct LruReplacer {
    frames: PriorityQueue<FrameKey, Reverse<(Timestamp, FrameIndex, OwnerId)>>,
}

impl LruReplacer {
    /// Creates a new LRU replacer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last access time recorded for the key.
    pub fn last_access(&self, key: FrameKey) -> Option<Timestamp> {
        self.frames.get_priority(&key).map(|Reverse((ts, ..))| *ts)
    }

    const fn priority(key: FrameKey, now: Timestamp) -> Reverse<(Timestamp, FrameIndex, OwnerId)> {
        Reverse((now, key.frame, key.owner))
    }
}

impl ReplacementPolicy for LruReplacer {
    fn insert(&mut self, key: FrameKey, now: Timestamp) {
        // If the frame is already within the queue, update its priority.
        // Otherwise, insert it. Both cases are handled by the `push` method.
        let _ = self.frames.push(key, Self::priority(key, now));
    }

    fn touch(&mut self, key: FrameKey, now: Timestamp) {
        let _ = self.frames.push(key, Self::priority(key, now));
    }

    fn remove(&mut self, key: FrameKey) -> bool {
        self.frames.remove(&key).is_some()
    }

    fn evict(&mut self) -> Option<FrameKey> {
        self.frames.pop().map(|(key, _)| key)
    }

    fn peek(&self) -> Option<FrameKey> {
        self.frames.peek().map(|(key, _)| *key)
    }

    fn contains(&self, key: FrameKey) -> bool {
        self.frames.get(&key).is_some()
    }

    fn eviction_order(&self) -> Vec<FrameKey> {
        self.frames
            .clone()
            .into_sorted_iter()
            .map(|(key, _)| key)
            .collect()
    }

    fn len(&self) -> usize {
        self.frames.len()
    }
}
