mod fifo;
mod lru;

use crate::{Algorithm, FrameKey, ReplacementPolicy, Timestamp};

pub use {fifo::FifoReplacer, lru::LruReplacer};

/// Replacement policy selected by [`Algorithm`].
#[derive(Debug, Clone)]
pub enum Replacer {
    /// FIFO replacement.
    Fifo(FifoReplacer),
    /// LRU replacement.
    Lru(LruReplacer),
}

impl Replacer {
    /// Creates an empty replacer for the given algorithm.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Fifo => Self::Fifo(FifoReplacer::new()),
            Algorithm::Lru => Self::Lru(LruReplacer::new()),
        }
    }

    /// Algorithm implemented by this replacer.
    pub const fn algorithm(&self) -> Algorithm {
        match self {
            Self::Fifo(_) => Algorithm::Fifo,
            Self::Lru(_) => Algorithm::Lru,
        }
    }

    fn policy(&self) -> &dyn ReplacementPolicy {
        match self {
            Self::Fifo(r) => r,
            Self::Lru(r) => r,
        }
    }

    fn policy_mut(&mut self) -> &mut dyn ReplacementPolicy {
        match self {
            Self::Fifo(r) => r,
            Self::Lru(r) => r,
        }
    }
}

impl ReplacementPolicy for Replacer {
    fn insert(&mut self, key: FrameKey, now: Timestamp) {
        self.policy_mut().insert(key, now);
    }

    fn touch(&mut self, key: FrameKey, now: Timestamp) {
        self.policy_mut().touch(key, now);
    }

    fn remove(&mut self, key: FrameKey) -> bool {
        self.policy_mut().remove(key)
    }

    fn evict(&mut self) -> Option<FrameKey> {
        self.policy_mut().evict()
    }

    fn peek(&self) -> Option<FrameKey> {
        self.policy().peek()
    }

    fn contains(&self, key: FrameKey) -> bool {
        self.policy().contains(key)
    }

    fn eviction_order(&self) -> Vec<FrameKey> {
        self.policy().eviction_order()
    }

    fn len(&self) -> usize {
        self.policy().len()
    }
}
