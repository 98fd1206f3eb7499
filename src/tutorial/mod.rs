//! Guided tutorials.
//!
//! A tutorial is a static sequence of steps. A step may carry a partial
//! simulation configuration, applied when the step is reached, and an
//! expected operation that must be performed before the tutorial advances.

mod catalog;

use {
    crate::{Algorithm, SimConfig, SimError, SimResult, Technique},
    serde::{Deserialize, Serialize},
    std::collections::BTreeSet,
    tracing::info,
};

pub use catalog::builtin;

/// Operation a step waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExpectedOperation {
    /// An allocation, of exactly `size` bytes when given.
    Allocate {
        /// Required size.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<usize>,
    },
    /// Any deallocation.
    Deallocate,
    /// An access, at exactly `address` when given.
    Access {
        /// Required address.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<usize>,
    },
    /// An explicit simulation reset.
    Reset,
}

/// Operation the user actually performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PerformedOperation {
    /// Allocation of `size` bytes.
    Allocate {
        /// Allocated size.
        size: usize,
    },
    /// Deallocation.
    Deallocate {
        /// Requested address, if any.
        #[serde(default)]
        address: Option<usize>,
    },
    /// Access at `address`.
    Access {
        /// Accessed address.
        address: usize,
    },
    /// Simulation reset.
    Reset,
}

impl ExpectedOperation {
    /// Whether `performed` satisfies this expectation.
    pub fn is_satisfied_by(&self, performed: &PerformedOperation) -> bool {
        match (self, performed) {
            (Self::Reset, PerformedOperation::Reset) => true,
            (Self::Allocate { size: None }, PerformedOperation::Allocate { .. }) => true,
            (Self::Allocate { size: Some(want) }, PerformedOperation::Allocate { size }) => {
                want == size
            }
            (Self::Access { address: None }, PerformedOperation::Access { .. }) => true,
            (Self::Access { address: Some(want) }, PerformedOperation::Access { address }) => {
                want == address
            }
            (Self::Deallocate, PerformedOperation::Deallocate { .. }) => true,
            _ => false,
        }
    }
}

/// Partial simulation configuration attached to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Memory management technique.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technique: Option<Technique>,
    /// Total simulated memory, in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<usize>,
    /// Page size, in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    /// Replacement algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Algorithm>,
}

impl StepConfig {
    /// Whether a fresh simulation should be started when the step is reached.
    ///
    /// Only configurations naming a technique or a memory size describe a
    /// whole simulation; anything else is a hint for the user.
    pub const fn starts_simulation(&self) -> bool {
        self.technique.is_some() || self.memory_size.is_some()
    }

    /// Merges the configuration over [`SimConfig::default`].
    pub fn resolve(&self) -> SimConfig {
        let defaults = SimConfig::default();
        SimConfig {
            technique: self.technique.unwrap_or(defaults.technique),
            memory_size: self.memory_size.unwrap_or(defaults.memory_size),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            algorithm: self.algorithm.unwrap_or(defaults.algorithm),
        }
    }
}

/// One tutorial step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Step title.
    pub title: &'static str,
    /// Explanation shown to the user.
    pub content: &'static str,
    /// What the user is asked to do.
    pub task: &'static str,
    /// Operation gating advancement, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_operation: Option<ExpectedOperation>,
    /// Configuration applied when the step is reached.
    pub config: StepConfig,
}

/// A tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tutorial {
    /// Unique id.
    pub id: &'static str,
    /// Title.
    pub title: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Steps, in order.
    pub steps: Vec<Step>,
}

/// Tutorial listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorialSummary {
    /// Unique id.
    pub id: &'static str,
    /// Title.
    pub title: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Whether the tutorial was completed in this session.
    pub completed: bool,
}

/// The current step of the active tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// Active tutorial id.
    pub tutorial_id: &'static str,
    /// Active tutorial title.
    pub tutorial_title: &'static str,
    /// Zero-based step index.
    pub step_index: usize,
    /// Number of steps in the tutorial.
    pub total_steps: usize,
    /// The step.
    pub step: Step,
    /// Whether this is the first step.
    pub is_first_step: bool,
    /// Whether this is the last step.
    pub is_last_step: bool,
}

/// Result of advancing a tutorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Advance {
    /// Moved to another step.
    Step(StepView),
    /// The last step was left; the tutorial is completed.
    Completed {
        /// Completed tutorial id.
        tutorial: &'static str,
        /// Completion message.
        message: String,
    },
}

/// Drives the user through tutorials.
#[derive(Debug, Clone)]
pub struct TutorialDriver {
    tutorials: Vec<Tutorial>,
    /// Index of the active tutorial.
    active: Option<usize>,
    step: usize,
    completed: BTreeSet<&'static str>,
}

impl Default for TutorialDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TutorialDriver {
    /// Creates a driver over the built-in tutorials.
    pub fn new() -> Self {
        Self::with_tutorials(builtin())
    }

    /// Creates a driver over the given tutorials.
    pub fn with_tutorials(tutorials: Vec<Tutorial>) -> Self {
        Self {
            tutorials,
            active: None,
            step: 0,
            completed: BTreeSet::new(),
        }
    }

    /// Available tutorials with their completion status.
    pub fn list(&self) -> Vec<TutorialSummary> {
        self.tutorials
            .iter()
            .map(|t| TutorialSummary {
                id: t.id,
                title: t.title,
                description: t.description,
                completed: self.completed.contains(t.id),
            })
            .collect()
    }

    /// Starts the tutorial `id` from its first step.
    pub fn start(&mut self, id: &str) -> SimResult<StepView> {
        let index = self
            .tutorials
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| SimError::UnknownTutorial(id.to_owned()))?;

        self.active = Some(index);
        self.step = 0;
        info!(tutorial = id, "started tutorial");
        self.current()
    }

    /// Moves to the next step, completing the tutorial when leaving the last.
    pub fn next(&mut self) -> SimResult<Advance> {
        let tutorial = self.active_tutorial()?;
        if self.step + 1 >= tutorial.steps.len() {
            let (id, title) = (tutorial.id, tutorial.title);
            let _ = self.completed.insert(id);
            info!(tutorial = id, "completed tutorial");
            return Ok(Advance::Completed {
                tutorial: id,
                message: format!("Tutorial \"{title}\" completed!"),
            });
        }

        self.step += 1;
        self.current().map(Advance::Step)
    }

    /// Moves back one step.
    pub fn previous(&mut self) -> SimResult<StepView> {
        let _ = self.active_tutorial()?;
        if self.step == 0 {
            return Err(SimError::AlreadyAtFirstStep);
        }

        self.step -= 1;
        self.current()
    }

    /// Current step of the active tutorial.
    pub fn current(&self) -> SimResult<StepView> {
        let tutorial = self.active_tutorial()?;
        let total_steps = tutorial.steps.len();
        let step = tutorial
            .steps
            .get(self.step)
            .cloned()
            .ok_or(SimError::NoActiveTutorial)?;

        Ok(StepView {
            tutorial_id: tutorial.id,
            tutorial_title: tutorial.title,
            step_index: self.step,
            total_steps,
            step,
            is_first_step: self.step == 0,
            is_last_step: self.step + 1 == total_steps,
        })
    }

    /// Leaves the active tutorial, if any.
    pub fn end(&mut self) {
        if let Some(tutorial) = self.active.take().and_then(|i| self.tutorials.get(i)) {
            info!(tutorial = tutorial.id, "ended tutorial");
        }
        self.step = 0;
    }

    /// Whether `performed` completes the current step.
    ///
    /// Without an active tutorial nothing completes a step; a step without an
    /// expected operation is completed by anything.
    pub fn verify_step_completed(&self, performed: &PerformedOperation) -> bool {
        let Ok(tutorial) = self.active_tutorial() else {
            return false;
        };
        match tutorial
            .steps
            .get(self.step)
            .and_then(|s| s.expected_operation)
        {
            Some(expected) => expected.is_satisfied_by(performed),
            None => true,
        }
    }

    /// Whether the tutorial `id` was completed.
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.contains(id)
    }

    fn active_tutorial(&self) -> SimResult<&Tutorial> {
        self.active
            .and_then(|i| self.tutorials.get(i))
            .ok_or(SimError::NoActiveTutorial)
    }
}
