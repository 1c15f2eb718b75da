//! Aggregation of raw task outputs into typed artifacts.
//!
//! Task outputs are JSON text; this module parses them back so the report
//! can render structured sections.

use crate::agent::tools::Tool;
use crate::generator::topic_seeds_from_text;
use crate::models::{Assessment, Enhancement, LessonPlan, TaskOutput, TopicSeed};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Structured results recovered from a crew run.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub topics: Vec<TopicSeed>,
    pub lesson_plans: Vec<LessonPlan>,
    pub assessments: Vec<Assessment>,
    pub enhancements: Vec<Enhancement>,
}

impl Artifacts {
    /// Total learning objectives across all extracted topics.
    pub fn objective_count(&self) -> usize {
        self.topics.iter().map(|t| t.objectives.len()).sum()
    }
}

/// Parse each successful task's output according to the tool that produced it.
pub fn collect_artifacts(tasks: &[TaskOutput]) -> Artifacts {
    let mut artifacts = Artifacts::default();

    for task in tasks.iter().filter(|t| t.success) {
        match Tool::from_name(&task.tool) {
            Some(Tool::AnalyzeTopics) => {
                // An empty topic list is a valid answer; keep it empty here
                if task.raw.trim() != "[]" {
                    artifacts.topics = topic_seeds_from_text(&task.raw);
                }
            }
            Some(Tool::PlanLessons) => artifacts.lesson_plans = parse_list(task),
            Some(Tool::DesignAssessments) => artifacts.assessments = parse_list(task),
            Some(Tool::EnhanceLessons) => artifacts.enhancements = parse_list(task),
            Some(Tool::VectorizePdf) | None => {}
        }
    }

    artifacts
}

fn parse_list<T: DeserializeOwned>(task: &TaskOutput) -> Vec<T> {
    match serde_json::from_str(&task.raw) {
        Ok(items) => items,
        Err(e) => {
            warn!("Could not parse output of {}: {}", task.tool, e);
            Vec::new()
        }
    }
}
