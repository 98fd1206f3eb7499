use {
    crate::{FrameKey, ReplacementPolicy, Timestamp},
    std::collections::VecDeque,
};

/// First In First Out (FIFO) frame replacer.
///
/// Frames are queued in allocation order and evicted oldest first; accesses
/// do not change the order.
#[derive(Debug, Default, Clone)]
pub struct FifoReplacer {
    queue: VecDeque<FrameKey>,
}

impl FifoReplacer {
    /// Creates a new FIFO replacer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for FifoReplacer {
    fn insert(&mut self, key: FrameKey, _now: Timestamp) {
        if !self.queue.contains(&key) {
            self.queue.push_back(key);
        }
    }

    fn touch(&mut self, _key: FrameKey, _now: Timestamp) {
        // Access order is irrelevant for FIFO.
    }

    fn remove(&mut self, key: FrameKey) -> bool {
        let before = self.queue.len();
        self.queue.retain(|k| *k != key);
        self.queue.len() != before
    }

    fn evict(&mut self) -> Option<FrameKey> {
        self.queue.pop_front()
    }

    fn peek(&self) -> Option<FrameKey> {
        self.queue.front().copied()
    }

    fn contains(&self, key: FrameKey) -> bool {
        self.queue.contains(&key)
    }

    fn eviction_order(&self) -> Vec<FrameKey> {
        self.queue.iter().copied().collect()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
