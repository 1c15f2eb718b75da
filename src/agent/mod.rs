//! Agents, their tasks, and the crew that runs them.
//!
//! Each agent owns exactly one tool. The crew runs the five tasks in order,
//! feeding each task's output to the next.

pub mod crew;
pub mod roles;
pub mod tools;

#[cfg(test)]
mod testing;

pub use crew::Crew;
pub use roles::curriculum_tasks;
pub use tools::{ToolExecutor, ToolSettings};
