//! Agent personas and the tasks they are assigned.

use super::tools::Tool;

/// A role-labelled agent that owns exactly one tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentRole {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub tool: Tool,
}

impl AgentRole {
    /// System prompt describing this agent to a chat model.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are the {}. {}\n\nYour goal: {}",
            self.role, self.backstory, self.goal
        )
    }
}

pub const CURRICULUM_INGESTOR: AgentRole = AgentRole {
    role: "Curriculum Ingestor",
    goal: "Load and index the curriculum PDF",
    backstory: "You ingest educational curriculum documents and convert them into searchable vector embeddings.",
    tool: Tool::VectorizePdf,
};

pub const TOPIC_ANALYZER: AgentRole = AgentRole {
    role: "Topic Analyzer",
    goal: "Identify structured topics and learning objectives from the curriculum",
    backstory: "You are an expert in academic planning and curriculum design who extracts relevant topics and learning objectives from educational content.",
    tool: Tool::AnalyzeTopics,
};

pub const LESSON_PLANNER: AgentRole = AgentRole {
    role: "Lesson Planner",
    goal: "Create effective and engaging lesson plans based on curriculum topics",
    backstory: "You are an experienced educator with expertise in instructional design. You create comprehensive lesson plans that incorporate best practices in teaching and learning.",
    tool: Tool::PlanLessons,
};

pub const ASSESSMENT_DESIGNER: AgentRole = AgentRole {
    role: "Assessment Designer",
    goal: "Create effective assessments to measure student learning and progress",
    backstory: "You are an assessment specialist with expertise in creating various forms of assessment that accurately measure student understanding and progress. You design both formative and summative assessments aligned with learning objectives.",
    tool: Tool::DesignAssessments,
};

pub const LESSON_ENHANCER: AgentRole = AgentRole {
    role: "Lesson Enhancer",
    goal: "Enrich lesson plans with supplementary resources and activities",
    backstory: "You are an educational resource specialist who excels at finding and recommending high-quality supplementary materials. You have extensive knowledge of educational websites, videos, interactive tools, and hands-on activities that can enhance learning experiences.",
    tool: Tool::EnhanceLessons,
};

/// A unit of work handed to one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub description: &'static str,
    pub expected_output: &'static str,
    pub agent: AgentRole,
}

/// The five tasks in execution order.
pub fn curriculum_tasks() -> Vec<Task> {
    vec![
        Task {
            description: "Load and vectorize the curriculum file for topic analysis.",
            expected_output: "A confirmation that the curriculum has been properly indexed with details about the number of chunks created.",
            agent: CURRICULUM_INGESTOR,
        },
        Task {
            description: "Analyze the vectorized curriculum to identify key topics and learning objectives. The curriculum has already been vectorized and is stored in the vector database.",
            expected_output: "A structured JSON list of key topics and learning objectives found in the curriculum.",
            agent: TOPIC_ANALYZER,
        },
        Task {
            description: "Generate a lesson plan for each topic including time blocks and activities. Use the topics and objectives extracted from the curriculum.",
            expected_output: "Structured lesson plans for each topic.",
            agent: LESSON_PLANNER,
        },
        Task {
            description: "Generate quiz and assessment questions based on the lesson plan. Create formative and summative assessments aligned with the learning objectives.",
            expected_output: "Assessments for each lesson.",
            agent: ASSESSMENT_DESIGNER,
        },
        Task {
            description: "Recommend additional resources (videos, articles) per lesson. Find high-quality supplementary materials that enhance the learning experience.",
            expected_output: "List of external links and resources per topic.",
            agent: LESSON_ENHANCER,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_order_matches_pipeline() {
        let tools: Vec<_> = curriculum_tasks().iter().map(|t| t.agent.tool).collect();
        assert_eq!(
            tools,
            vec![
                Tool::VectorizePdf,
                Tool::AnalyzeTopics,
                Tool::PlanLessons,
                Tool::DesignAssessments,
                Tool::EnhanceLessons,
            ]
        );
    }

    #[test]
    fn test_system_prompt_includes_persona() {
        let prompt = TOPIC_ANALYZER.system_prompt();
        assert!(prompt.starts_with("You are the Topic Analyzer."));
        assert!(prompt.contains("learning objectives"));
    }
}
