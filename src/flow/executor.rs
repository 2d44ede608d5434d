use crate::catalog::{CommandFactory, CommandGroup, CommandRegistry, FactoryError};
use crate::commands::{CommandError, Output};
use crate::context::ExecutionContext;
use crate::flow::{Flow, FlowStep};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Lifecycle of one flow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Pending,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    Failed,
    Skipped,
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// What happened to one step. A failed step carries either the unsuccessful
/// `Output` or the error that prevented one.
#[derive(Debug)]
pub struct StepOutcome {
    pub index: usize,
    pub group: String,
    pub command: String,
    pub status: StepStatus,
    pub output: Option<Output>,
    pub error: Option<StepError>,
}

/// The full record of one execution; failures are data here, not `Err`s.
#[derive(Debug)]
pub struct FlowReport {
    pub flow: String,
    pub state: ExecutionState,
    pub steps: Vec<StepOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Runs flows strictly in step order, one factory per command family.
pub struct FlowExecutor {
    wp: CommandFactory,
    git: CommandFactory,
}

impl FlowExecutor {
    pub fn new(registry: Arc<CommandRegistry>, context: Arc<ExecutionContext>) -> Self {
        Self {
            wp: CommandFactory::new(CommandGroup::Wp, registry.clone(), context.clone()),
            git: CommandFactory::new(CommandGroup::Git, registry, context),
        }
    }

    /// Execute the flow's steps in order, each awaited to completion before
    /// the next is considered. A step with an unrecognized group is skipped
    /// and execution continues; any failure halts the flow at that step,
    /// with no rollback of the steps already run.
    pub async fn execute(&self, flow: &Flow) -> FlowReport {
        let started_at = Utc::now();
        let mut state = ExecutionState::Pending;
        let mut steps = Vec::with_capacity(flow.steps.len());

        info!(flow = %flow.name, steps = flow.steps.len(), "executing flow");

        for (index, step) in flow.steps.iter().enumerate() {
            state = ExecutionState::Running;
            let outcome = self.execute_step(index, step).await;
            let failed = outcome.status == StepStatus::Failed;
            steps.push(outcome);
            if failed {
                state = ExecutionState::Aborted;
                break;
            }
        }

        if state != ExecutionState::Aborted {
            state = ExecutionState::Completed;
        }

        FlowReport {
            flow: flow.name.clone(),
            state,
            steps,
            started_at,
            finished_at: Utc::now(),
        }
    }

    async fn execute_step(&self, index: usize, step: &FlowStep) -> StepOutcome {
        // unrecognized groups skip; only failures halt
        let Some(group) = CommandGroup::parse(&step.group) else {
            warn!(
                step = index + 1,
                group = %step.group,
                command = %step.command,
                "unknown command group, skipping step"
            );
            return self.outcome(index, step, StepStatus::Skipped, None, None);
        };

        let command = match self
            .factory_for(group)
            .create(&step.command, step.parameters.clone())
        {
            Ok(command) => command,
            Err(err) => {
                warn!(step = index + 1, command = %step.command, error = %err, "failed to assemble step");
                return self.outcome(index, step, StepStatus::Failed, None, Some(err.into()));
            }
        };

        match command.execute().await {
            Ok(output) if output.successful => {
                info!(step = index + 1, command = %step.command, "step succeeded");
                self.outcome(index, step, StepStatus::Succeeded, Some(output), None)
            }
            Ok(output) => {
                warn!(
                    step = index + 1,
                    command = %step.command,
                    stderr = %output.stderr.trim(),
                    "step reported failure"
                );
                self.outcome(index, step, StepStatus::Failed, Some(output), None)
            }
            Err(err) => {
                warn!(step = index + 1, command = %step.command, error = %err, "step errored");
                self.outcome(index, step, StepStatus::Failed, None, Some(err.into()))
            }
        }
    }

    fn factory_for(&self, group: CommandGroup) -> &CommandFactory {
        match group {
            CommandGroup::Wp => &self.wp,
            CommandGroup::Git => &self.git,
        }
    }

    fn outcome(
        &self,
        index: usize,
        step: &FlowStep,
        status: StepStatus,
        output: Option<Output>,
        error: Option<StepError>,
    ) -> StepOutcome {
        StepOutcome {
            index,
            group: step.group.clone(),
            command: step.command.clone(),
            status,
            output,
            error,
        }
    }
}
