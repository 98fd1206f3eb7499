//! Simulation configuration.

use {
    crate::{SimError, SimResult},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Largest memory size a session accepts, in bytes.
pub const MAX_MEMORY_SIZE: usize = 4096;

/// Largest page size a session accepts, in bytes.
pub const MAX_PAGE_SIZE: usize = 512;

/// Size used when an allocation request carries no usable size.
pub const DEFAULT_ALLOCATION_SIZE: usize = 64;

/// Memory management technique.
///
/// Both techniques share the same frame-based bookkeeping; the distinction
/// only affects how the simulation is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technique {
    /// Fixed-size pages mapped onto frames.
    #[default]
    #[serde(alias = "Paging")]
    Paging,
    /// Segments, laid out over the same fixed-size frames.
    #[serde(alias = "Segmentation")]
    Segmentation,
}

/// Page replacement algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    /// First In First Out: evicts the frame allocated the longest time ago.
    #[default]
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
    /// Least Recently Used: evicts the frame touched the longest time ago.
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paging => f.write_str("paging"),
            Self::Segmentation => f.write_str("segmentation"),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fifo => f.write_str("FIFO"),
            Self::Lru => f.write_str("LRU"),
        }
    }
}

/// Configuration of a single simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Memory management technique.
    pub technique: Technique,

    /// Total simulated memory, in bytes.
    pub memory_size: usize,

    /// Size of a single page/frame, in bytes.
    pub page_size: usize,

    /// Replacement algorithm used under capacity pressure.
    pub algorithm: Algorithm,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            technique: Technique::Paging,
            memory_size: 1024,
            page_size: 64,
            algorithm: Algorithm::Fifo,
        }
    }
}

impl SimConfig {
    /// Creates a configuration from its parts.
    pub const fn new(
        technique: Technique,
        memory_size: usize,
        page_size: usize,
        algorithm: Algorithm,
    ) -> Self {
        Self {
            technique,
            memory_size,
            page_size,
            algorithm,
        }
    }

    /// Checks the constraints the engine relies on: positive sizes and a
    /// memory size that is an exact multiple of the page size.
    pub fn validate(&self) -> SimResult<()> {
        if self.memory_size == 0 {
            return Err(SimError::Config("memory size must be positive".into()));
        }
        if self.page_size == 0 {
            return Err(SimError::Config("page size must be positive".into()));
        }
        if self.memory_size % self.page_size != 0 {
            return Err(SimError::Config(format!(
                "memory size {} must be a multiple of page size {}",
                self.memory_size, self.page_size
            )));
        }
        Ok(())
    }

    /// Checks the bounds accepted from session clients, on top of
    /// [`SimConfig::validate`].
    pub fn validate_bounds(&self) -> SimResult<()> {
        if self.memory_size > MAX_MEMORY_SIZE {
            return Err(SimError::Config(format!(
                "memory size {} exceeds {MAX_MEMORY_SIZE}",
                self.memory_size
            )));
        }
        if self.page_size > MAX_PAGE_SIZE {
            return Err(SimError::Config(format!(
                "page size {} exceeds {MAX_PAGE_SIZE}",
                self.page_size
            )));
        }
        self.validate()
    }

    /// Number of frames the configured memory is split into.
    pub const fn total_frames(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.memory_size / self.page_size
        }
    }
}
