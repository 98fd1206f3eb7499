//! Per-session simulation handle.
//!
//! A session owns at most one running engine and one tutorial driver. Request
//! handlers share a session by cloning the handle; distinct sessions never
//! share an engine.

use {
    crate::{
        MemoryEngine,
        ResultsSnapshot,
        SimConfig,
        SimError,
        SimResult,
        StateSnapshot,
        config::DEFAULT_ALLOCATION_SIZE,
        tutorial::{Advance, PerformedOperation, StepView, TutorialDriver, TutorialSummary},
    },
    parking_lot::RwLock,
    serde::{Deserialize, Serialize},
    std::sync::Arc,
    tracing::{debug, info, warn},
};

/// Operation requested by a session client.
///
/// Missing parameters are filled in leniently: allocations default to
/// [`DEFAULT_ALLOCATION_SIZE`] bytes, deallocations target the first
/// allocated frame, accesses target address 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum OperationRequest {
    /// Allocate `size` bytes.
    Allocate {
        /// Size in bytes.
        #[serde(default)]
        size: Option<usize>,
    },
    /// Release the allocation at `address`.
    Deallocate {
        /// Address of any frame of the allocation.
        #[serde(default)]
        address: Option<usize>,
    },
    /// Access `address`.
    Access {
        /// Address to access.
        #[serde(default)]
        address: Option<usize>,
    },
}

/// What a performed operation yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OperationResult {
    /// Memory was allocated at `address`.
    Allocated {
        /// Base address of the allocation.
        address: usize,
    },
    /// An allocation was released.
    Deallocated,
    /// Memory was accessed.
    Accessed {
        /// Whether the access was a page hit.
        hit: bool,
    },
}

/// Outcome of [`Session::perform`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationOutcome {
    /// The operation as actually performed, after defaults were applied.
    pub performed: PerformedOperation,
    /// What the operation yielded.
    pub result: OperationResult,
    /// Engine state after the operation.
    pub state: StateSnapshot,
}

/// Result of a tutorial navigation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TutorialUpdate {
    /// Now at `step`.
    Step {
        /// The step reached.
        step: StepView,
        /// State of the simulation the step started, if it started one.
        #[serde(skip_serializing_if = "Option::is_none")]
        memory_state: Option<StateSnapshot>,
    },
    /// The tutorial was completed.
    Completed {
        /// Completed tutorial id.
        tutorial: &'static str,
        /// Completion message.
        message: String,
    },
}

/// Simulation session handle.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    engine: Option<MemoryEngine>,
    tutorials: TutorialDriver,
}

impl Inner {
    fn engine_mut(&mut self) -> SimResult<&mut MemoryEngine> {
        self.engine.as_mut().ok_or(SimError::NoActiveSimulation)
    }

    fn engine(&self) -> SimResult<&MemoryEngine> {
        self.engine.as_ref().ok_or(SimError::NoActiveSimulation)
    }

    /// Starts the simulation a step asks for and wraps the step.
    fn enter_step(&mut self, step: StepView) -> SimResult<TutorialUpdate> {
        let memory_state = if step.step.config.starts_simulation() {
            let config = step.step.config.resolve();
            let engine = MemoryEngine::new(config)?;
            info!(tutorial = step.tutorial_id, step = step.step_index, ?config, "tutorial started simulation");
            let state = engine.current_state();
            self.engine = Some(engine);
            Some(state)
        } else {
            None
        };

        Ok(TutorialUpdate::Step { step, memory_state })
    }
}

impl Session {
    /// Creates a session with no running simulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new simulation, replacing any running one.
    pub fn start_simulation(&self, config: SimConfig) -> SimResult<StateSnapshot> {
        config.validate_bounds()?;
        let engine = MemoryEngine::new(config)?;
        let state = engine.current_state();
        self.inner.write().engine = Some(engine);

        info!(?config, "simulation started");
        Ok(state)
    }

    /// Whether a simulation is running.
    pub fn is_running(&self) -> bool {
        self.inner.read().engine.is_some()
    }

    /// Performs an operation on the running simulation.
    pub fn perform(&self, request: OperationRequest) -> SimResult<OperationOutcome> {
        let mut inner = self.inner.write();
        let engine = inner.engine_mut()?;

        let (performed, result) = match request {
            OperationRequest::Allocate { size } => {
                let size = match size {
                    Some(size) if size > 0 => size,
                    _ => {
                        warn!(
                            size = DEFAULT_ALLOCATION_SIZE,
                            "no usable allocation size, using default"
                        );
                        DEFAULT_ALLOCATION_SIZE
                    }
                };
                let address = engine.allocate(size)?;
                (
                    PerformedOperation::Allocate { size },
                    OperationResult::Allocated { address },
                )
            }
            OperationRequest::Deallocate { address: requested } => {
                let address = match requested {
                    Some(address) => address,
                    None => {
                        let address = engine
                            .first_allocated_address()
                            .ok_or(SimError::NothingAllocated)?;
                        warn!(address, "no deallocation address, using first allocated frame");
                        address
                    }
                };
                engine.deallocate(address)?;
                (
                    PerformedOperation::Deallocate { address: requested },
                    OperationResult::Deallocated,
                )
            }
            OperationRequest::Access { address } => {
                let address = address.unwrap_or_else(|| {
                    warn!("no access address, using 0");
                    0
                });
                let hit = engine.access(address);
                (
                    PerformedOperation::Access { address },
                    OperationResult::Accessed { hit },
                )
            }
        };

        debug!(?performed, ?result, "operation performed");
        Ok(OperationOutcome {
            performed,
            result,
            state: engine.current_state(),
        })
    }

    /// State of the running simulation.
    pub fn state(&self) -> SimResult<StateSnapshot> {
        self.inner.read().engine().map(MemoryEngine::current_state)
    }

    /// Analytics of the running simulation.
    pub fn results(&self) -> SimResult<ResultsSnapshot> {
        self.inner.read().engine().map(MemoryEngine::results)
    }

    /// Discards the running simulation, if any.
    pub fn reset(&self) {
        if self.inner.write().engine.take().is_some() {
            info!("simulation reset");
        }
    }

    /// Available tutorials with their completion status.
    pub fn tutorials(&self) -> Vec<TutorialSummary> {
        self.inner.read().tutorials.list()
    }

    /// Starts a tutorial, along with the simulation its first step asks for.
    pub fn start_tutorial(&self, id: &str) -> SimResult<TutorialUpdate> {
        let mut inner = self.inner.write();
        let step = inner.tutorials.start(id)?;
        inner.enter_step(step)
    }

    /// Advances the active tutorial.
    ///
    /// When `performed` is given, it must satisfy the current step.
    pub fn next_tutorial_step(
        &self,
        performed: Option<&PerformedOperation>,
    ) -> SimResult<TutorialUpdate> {
        let mut inner = self.inner.write();
        if performed.is_some_and(|op| !inner.tutorials.verify_step_completed(op)) {
            return Err(SimError::StepIncomplete);
        }

        match inner.tutorials.next()? {
            Advance::Step(step) => inner.enter_step(step),
            Advance::Completed { tutorial, message } => {
                Ok(TutorialUpdate::Completed { tutorial, message })
            }
        }
    }

    /// Moves the active tutorial back one step.
    pub fn previous_tutorial_step(&self) -> SimResult<TutorialUpdate> {
        let mut inner = self.inner.write();
        let step = inner.tutorials.previous()?;
        inner.enter_step(step)
    }

    /// Current step of the active tutorial.
    pub fn current_tutorial_step(&self) -> SimResult<StepView> {
        self.inner.read().tutorials.current()
    }

    /// Leaves the active tutorial. The simulation keeps running.
    pub fn end_tutorial(&self) {
        self.inner.write().tutorials.end();
    }
}
