//! Workflow data model and persistence. A flow is an ordered list of steps,
//! each naming a command group, a command, and its parameters.

pub mod executor;
pub mod store;

use crate::commands::ParamBag;
use serde::{Deserialize, Serialize};

/// One step of a flow. The group stays a free string here so records with
/// an unrecognized group still load and round-trip; the executor decides
/// what to do with them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowStep {
    pub command: String,
    pub group: String,
    // The wire field name is misspelled. Existing records use it, and
    // renaming it would silently drop their parameters on load.
    #[serde(rename = "parametes", default)]
    pub parameters: ParamBag,
}

impl FlowStep {
    pub fn new(group: impl Into<String>, command: impl Into<String>, parameters: ParamBag) -> Self {
        Self {
            command: command.into(),
            group: group.into(),
            parameters,
        }
    }
}

/// A named, ordered sequence of steps. Execution order is defined by the
/// `commands` array alone; parameter map order never matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    #[serde(rename = "flowName")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "commands", default)]
    pub steps: Vec<FlowStep>,
}

impl Flow {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            steps: Vec::new(),
        }
    }

    pub fn push_step(&mut self, step: FlowStep) {
        self.steps.push(step);
    }

    /// Swap the step at `index` with its predecessor. No-op at the first
    /// step or out of range; returns whether anything moved.
    pub fn move_step_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.steps.len() {
            return false;
        }
        self.steps.swap(index, index - 1);
        true
    }

    /// Swap the step at `index` with its successor. No-op at the last step
    /// or out of range; returns whether anything moved.
    pub fn move_step_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.steps.len() {
            return false;
        }
        self.steps.swap(index, index + 1);
        true
    }

    /// Remove and return the step at `index`; `None` when out of range.
    pub fn remove_step(&mut self, index: usize) -> Option<FlowStep> {
        if index >= self.steps.len() {
            return None;
        }
        Some(self.steps.remove(index))
    }
}
