//! Sequential crew: runs each task with its agent's tool, in order.

use super::roles::Task;
use super::tools::ToolExecutor;
use crate::models::TaskOutput;
use std::time::Instant;
use tracing::{debug, error, info};

/// Outcome of a crew run.
#[derive(Debug, Clone)]
pub struct CrewOutput {
    /// One entry per task that ran, in execution order.
    pub tasks: Vec<TaskOutput>,
    /// Output of the last task that ran.
    pub result: String,
    /// Set when strict mode stopped the run; holds the failing agent's role.
    pub halted: Option<String>,
}

/// A fixed list of tasks executed one after another.
pub struct Crew {
    tasks: Vec<Task>,
    executor: ToolExecutor,
    strict: bool,
}

impl Crew {
    pub fn new(tasks: Vec<Task>, executor: ToolExecutor) -> Self {
        Self {
            tasks,
            executor,
            strict: false,
        }
    }

    /// Stop at the first failed task instead of passing its message along.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Run every task. Each task receives the previous task's output as input.
    pub async fn kickoff(&self) -> CrewOutput {
        let total = self.tasks.len();
        let mut outputs = Vec::with_capacity(total);
        let mut context = String::new();
        let mut halted = None;

        for (i, task) in self.tasks.iter().enumerate() {
            let agent = &task.agent;
            info!("[{}/{}] {}: {}", i + 1, total, agent.role, task.description);
            debug!("Using tool {}: {}", agent.tool.name(), agent.tool.description());
            debug!("Expected output: {}", task.expected_output);

            let start = Instant::now();
            let result = self.executor.execute(agent.tool, &context, agent).await;
            let elapsed = start.elapsed().as_secs_f64();

            if result.success {
                info!("{} finished in {:.1}s", agent.role, elapsed);
            } else {
                error!("{} failed after {:.1}s: {}", agent.role, elapsed, result.text());
            }

            context = result.text().to_string();
            outputs.push(TaskOutput {
                agent: agent.role.to_string(),
                tool: agent.tool.name().to_string(),
                description: task.description.to_string(),
                success: result.success,
                raw: context.clone(),
                duration_seconds: elapsed,
            });

            if !result.success && self.strict {
                halted = Some(agent.role.to_string());
                break;
            }
        }

        CrewOutput {
            tasks: outputs,
            result: context,
            halted,
        }
    }
}
