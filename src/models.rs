//! Data models for the lesson pipeline.
//!
//! This module contains the JSON-shaped records produced by each pipeline
//! step, plus the report structure that collects them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Topic name used when an entry carries no `topic` field.
pub const UNKNOWN_TOPIC: &str = "Unknown Topic";

/// Objective used when an entry carries no `objectives` field.
pub const DEFAULT_OBJECTIVE: &str = "Understand the topic";

/// A curriculum topic paired with its learning objectives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSeed {
    pub topic: String,
    pub objectives: Vec<String>,
}

impl TopicSeed {
    pub fn new(topic: impl Into<String>, objectives: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            objectives,
        }
    }

    /// The seed used when no topics can be recovered from the input.
    pub fn sample() -> Self {
        Self::new("Sample Topic", vec!["Sample Objective".to_string()])
    }

    /// Build a seed from a loosely-shaped JSON value.
    ///
    /// Returns `None` for anything that is not a JSON object. Scalar topics
    /// are rendered as text; a missing or null topic becomes [`UNKNOWN_TOPIC`]
    /// and missing objectives become [`DEFAULT_OBJECTIVE`].
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let topic = match obj.get("topic") {
            Some(Value::String(s)) => s.clone(),
            None | Some(Value::Null) => UNKNOWN_TOPIC.to_string(),
            Some(other) => other.to_string(),
        };

        let objectives = match obj.get("objectives").and_then(|v| v.as_array()) {
            Some(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            None => vec![DEFAULT_OBJECTIVE.to_string()],
        };

        Some(Self { topic, objectives })
    }

    /// Lowercased, hyphenated form of the topic for search URLs.
    pub fn slug(&self) -> String {
        self.topic.to_lowercase().replace(' ', "-")
    }
}

/// A timed block inside a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub duration: String,
    pub description: String,
}

/// Assessment strategies attached to a lesson plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonAssessment {
    pub formative: Vec<String>,
    pub summative: Vec<String>,
}

/// A generated lesson plan for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub topic: String,
    pub objectives: Vec<String>,
    pub duration: String,
    pub materials_needed: Vec<String>,
    pub activities: Vec<Activity>,
    pub assessment: LessonAssessment,
}

/// A single assessment question.
///
/// Serialized with a `type` tag so each question kind only carries the
/// fields it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    ShortAnswer {
        question: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sample_answer: Option<String>,
    },
    MultipleChoice {
        question: String,
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correct_answer: Option<usize>,
    },
    TrueFalse {
        question: String,
        correct_answer: bool,
    },
}

impl Question {
    pub fn text(&self) -> &str {
        match self {
            Question::ShortAnswer { question, .. }
            | Question::MultipleChoice { question, .. }
            | Question::TrueFalse { question, .. } => question,
        }
    }

    /// The serialized `type` tag of this question.
    pub fn kind(&self) -> &'static str {
        match self {
            Question::ShortAnswer { .. } => "short_answer",
            Question::MultipleChoice { .. } => "multiple_choice",
            Question::TrueFalse { .. } => "true_false",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormativeAssessment {
    pub exit_ticket: QuestionSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummativeAssessment {
    pub quiz: QuestionSet,
}

/// Formative and summative assessment content for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub topic: String,
    pub objectives: Vec<String>,
    pub formative_assessment: FormativeAssessment,
    pub summative_assessment: SummativeAssessment,
}

/// A recommended external resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub description: String,
}

/// Supplementary resources for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enhancement {
    pub topic: String,
    pub objectives: Vec<String>,
    pub videos: Vec<Resource>,
    pub articles: Vec<Resource>,
    pub interactive_resources: Vec<Resource>,
}

impl Enhancement {
    /// Total number of resources across all groups.
    pub fn resource_count(&self) -> usize {
        self.videos.len() + self.articles.len() + self.interactive_resources.len()
    }
}

/// Output of one pipeline task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Role of the agent that ran the task.
    pub agent: String,
    /// Name of the tool the agent used.
    pub tool: String,
    /// Task description.
    pub description: String,
    /// Whether the tool reported success.
    pub success: bool,
    /// Raw tool output (or the error message on failure).
    pub raw: String,
    /// Wall-clock time spent on the task.
    pub duration_seconds: f64,
}

/// Metadata about a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the curriculum PDF (or directory).
    pub curriculum: String,
    /// Directory of the persisted vector index.
    pub persist_dir: String,
    /// LLM provider name.
    pub provider: String,
    /// Chat model used for topic analysis.
    pub chat_model: String,
    /// Embedding model used for indexing.
    pub embedding_model: String,
    /// Date and time of the run.
    pub generated_at: DateTime<Utc>,
    /// Number of chunks in the index after ingestion.
    pub indexed_chunks: usize,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete result of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub tasks: Vec<TaskOutput>,
    pub topics: Vec<TopicSeed>,
    pub lesson_plans: Vec<LessonPlan>,
    pub assessments: Vec<Assessment>,
    pub enhancements: Vec<Enhancement>,
    /// Output of the final task, as printed to stdout.
    pub result: String,
}

impl Report {
    /// Number of tasks whose tool reported a failure.
    pub fn failed_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.success).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_from_full_object() {
        let value = json!({"topic": "Photosynthesis", "objectives": ["Describe light reactions"]});
        let seed = TopicSeed::from_value(&value).unwrap();
        assert_eq!(seed.topic, "Photosynthesis");
        assert_eq!(seed.objectives, vec!["Describe light reactions"]);
    }

    #[test]
    fn test_seed_defaults() {
        let seed = TopicSeed::from_value(&json!({})).unwrap();
        assert_eq!(seed.topic, UNKNOWN_TOPIC);
        assert_eq!(seed.objectives, vec![DEFAULT_OBJECTIVE]);
    }

    #[test]
    fn test_seed_scalar_topic_rendered_as_text() {
        let seed = TopicSeed::from_value(&json!({"topic": 5, "objectives": [1]})).unwrap();
        assert_eq!(seed.topic, "5");
        assert_eq!(seed.objectives, vec!["1"]);

        let seed = TopicSeed::from_value(&json!({"topic": true})).unwrap();
        assert_eq!(seed.topic, "true");

        let seed = TopicSeed::from_value(&json!({"topic": null})).unwrap();
        assert_eq!(seed.topic, UNKNOWN_TOPIC);
    }

    #[test]
    fn test_seed_rejects_non_object() {
        assert!(TopicSeed::from_value(&json!("Photosynthesis")).is_none());
        assert!(TopicSeed::from_value(&json!(42)).is_none());
    }

    #[test]
    fn test_seed_slug() {
        let seed = TopicSeed::new("Cell Division Basics", vec![]);
        assert_eq!(seed.slug(), "cell-division-basics");
    }

    #[test]
    fn test_question_serializes_with_type_tag() {
        let q = Question::TrueFalse {
            question: "Water boils at 100C at sea level.".to_string(),
            correct_answer: true,
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "true_false");
        assert_eq!(value["correct_answer"], true);

        let mc = Question::MultipleChoice {
            question: "Pick one".to_string(),
            options: vec!["a".to_string()],
            correct_answer: None,
        };
        let value = serde_json::to_value(&mc).unwrap();
        assert!(value.get("correct_answer").is_none());
    }

    #[test]
    fn test_question_kind_matches_type_tag() {
        let questions = vec![
            Question::ShortAnswer {
                question: "Why?".to_string(),
                sample_answer: None,
            },
            Question::MultipleChoice {
                question: "Which?".to_string(),
                options: vec![],
                correct_answer: Some(0),
            },
            Question::TrueFalse {
                question: "True?".to_string(),
                correct_answer: false,
            },
        ];
        for q in &questions {
            let value = serde_json::to_value(q).unwrap();
            assert_eq!(value["type"], q.kind());
        }
    }
}
