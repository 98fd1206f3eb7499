/// Simulation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// Construction parameters violate the engine constraints.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Allocation request of zero bytes.
    #[error("Allocation size must be positive")]
    InvalidSize,

    /// Request can never fit, even after evicting every allocated frame.
    #[error("Requested size {size} exceeds total memory size {memory_size}")]
    Capacity {
        /// Requested size in bytes.
        size: usize,
        /// Total simulated memory in bytes.
        memory_size: usize,
    },

    /// Address maps to a frame outside of the frame array.
    #[error("Invalid address: {address} (frame {frame} out of bounds)")]
    InvalidAddress {
        /// Address as given by the caller.
        address: usize,
        /// Frame the address resolves to.
        frame: usize,
    },

    /// Deallocation requested while no frame is allocated.
    #[error("No allocated memory to deallocate")]
    NothingAllocated,

    /// Owner id generator arrived at maximum value.
    #[error("Owner id sequence exhausted")]
    OwnerIdsExhausted,

    /// Operation requires a running simulation.
    #[error("No active simulation, start a simulation first")]
    NoActiveSimulation,

    /// No tutorial with the given id.
    #[error("Tutorial with ID {0} not found")]
    UnknownTutorial(String),

    /// Tutorial navigation without an active tutorial.
    #[error("No tutorial is currently active")]
    NoActiveTutorial,

    /// Stepping back from the first step.
    #[error("Already at the first step")]
    AlreadyAtFirstStep,

    /// Performed operation does not satisfy the current step.
    #[error("Complete the current step's task before proceeding")]
    StepIncomplete,
}

/// Simulation result type.
pub type SimResult<T> = Result<T, SimError>;
