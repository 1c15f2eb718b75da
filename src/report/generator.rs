//! Markdown report generation.
//!
//! This module renders a pipeline run as a Markdown document teachers can
//! read directly, or as JSON for further processing.

use crate::models::{
    Assessment, Enhancement, LessonPlan, Question, Report, ReportMetadata, Resource, TaskOutput,
    TopicSeed,
};
use anyhow::Result;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, include_raw_outputs: bool) -> String {
    let mut output = String::new();

    output.push_str("# LessonCraft Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata, report.failed_tasks()));
    output.push_str(&generate_table_of_contents(report, include_raw_outputs));
    output.push_str(&generate_pipeline_section(&report.tasks));
    output.push_str(&generate_topics_section(&report.topics));
    output.push_str(&generate_lesson_plans_section(&report.lesson_plans));
    output.push_str(&generate_assessments_section(&report.assessments));
    output.push_str(&generate_resources_section(&report.enhancements));

    if include_raw_outputs {
        output.push_str(&generate_raw_outputs_section(&report.tasks));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, failed_tasks: usize) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Curriculum:** `{}`\n", metadata.curriculum));
    section.push_str(&format!("- **Vector Store:** `{}`\n", metadata.persist_dir));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Provider:** {}\n", metadata.provider));
    section.push_str(&format!("- **Chat Model:** `{}`\n", metadata.chat_model));
    section.push_str(&format!(
        "- **Embedding Model:** `{}`\n",
        metadata.embedding_model
    ));
    section.push_str(&format!(
        "- **Indexed Chunks:** {}\n",
        metadata.indexed_chunks
    ));
    if failed_tasks > 0 {
        section.push_str(&format!("- **Failed Steps:** {}\n", failed_tasks));
    }
    section.push_str(&format!(
        "- **Run Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report, include_raw_outputs: bool) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Pipeline Steps](#pipeline-steps)\n");
    toc.push_str("- [Topics](#topics)\n");
    toc.push_str("- [Lesson Plans](#lesson-plans)\n");

    for plan in &report.lesson_plans {
        toc.push_str(&format!("  - [{}](#{})\n", plan.topic, anchor(&plan.topic)));
    }

    toc.push_str("- [Assessments](#assessments)\n");
    toc.push_str("- [Resources](#resources)\n");

    if include_raw_outputs {
        toc.push_str("- [Raw Outputs](#raw-outputs)\n");
    }

    toc.push('\n');

    toc
}

/// Generate the table of pipeline steps.
fn generate_pipeline_section(tasks: &[TaskOutput]) -> String {
    let mut section = String::new();

    section.push_str("## Pipeline Steps\n\n");

    if tasks.is_empty() {
        section.push_str("No steps were run.\n\n");
        return section;
    }

    section.push_str("| # | Agent | Tool | Status | Duration |\n");
    section.push_str("|:---:|:---|:---|:---:|:---:|\n");

    for (i, task) in tasks.iter().enumerate() {
        let status = if task.success { "✅" } else { "❌" };
        section.push_str(&format!(
            "| {} | {} | `{}` | {} | {:.1}s |\n",
            i + 1,
            task.agent,
            task.tool,
            status,
            task.duration_seconds
        ));
    }
    section.push('\n');

    let failures: Vec<_> = tasks.iter().filter(|t| !t.success).collect();
    for task in failures {
        section.push_str(&format!(
            "> ⚠️ **{}:** {}\n\n",
            task.agent,
            first_line(&task.raw)
        ));
    }

    section
}

/// Generate the topics section.
fn generate_topics_section(topics: &[TopicSeed]) -> String {
    let mut section = String::new();

    section.push_str("## Topics\n\n");

    if topics.is_empty() {
        section.push_str("No topics were extracted from the curriculum.\n\n");
        return section;
    }

    for (i, topic) in topics.iter().enumerate() {
        section.push_str(&format!("{}. **{}**\n", i + 1, topic.topic));
        for objective in &topic.objectives {
            section.push_str(&format!("   - {}\n", objective));
        }
    }
    section.push('\n');

    section
}

/// Generate the lesson plans section.
fn generate_lesson_plans_section(plans: &[LessonPlan]) -> String {
    let mut section = String::new();

    section.push_str("## Lesson Plans\n\n");

    if plans.is_empty() {
        section.push_str("No lesson plans were generated.\n\n");
        return section;
    }

    for plan in plans {
        section.push_str(&generate_lesson_plan_block(plan));
    }

    section
}

/// Generate a single lesson plan block.
fn generate_lesson_plan_block(plan: &LessonPlan) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {} {{#{}}}\n\n", plan.topic, anchor(&plan.topic)));
    block.push_str(&format!("*Duration: {}*\n\n", plan.duration));

    block.push_str("**Objectives:**\n\n");
    for objective in &plan.objectives {
        block.push_str(&format!("- {}\n", objective));
    }
    block.push('\n');

    block.push_str(&format!(
        "**Materials:** {}\n\n",
        plan.materials_needed.join(", ")
    ));

    block.push_str("| Activity | Duration | Description |\n");
    block.push_str("|:---|:---:|:---|\n");
    for activity in &plan.activities {
        block.push_str(&format!(
            "| {} | {} | {} |\n",
            activity.name,
            activity.duration,
            escape_cell(&activity.description)
        ));
    }
    block.push('\n');

    block.push_str(&format!(
        "**Formative:** {}  \n**Summative:** {}\n\n",
        plan.assessment.formative.join(", "),
        plan.assessment.summative.join(", ")
    ));

    block.push_str("---\n\n");

    block
}

/// Generate the assessments section.
fn generate_assessments_section(assessments: &[Assessment]) -> String {
    let mut section = String::new();

    section.push_str("## Assessments\n\n");

    if assessments.is_empty() {
        section.push_str("No assessments were generated.\n\n");
        return section;
    }

    for assessment in assessments {
        section.push_str(&format!("### {}\n\n", assessment.topic));

        section.push_str("#### Exit Ticket\n\n");
        section.push_str(&generate_question_list(
            &assessment.formative_assessment.exit_ticket.questions,
        ));

        section.push_str("#### Quiz\n\n");
        section.push_str(&generate_question_list(
            &assessment.summative_assessment.quiz.questions,
        ));
    }

    section
}

/// Render a numbered list of questions with their answer hints.
fn generate_question_list(questions: &[Question]) -> String {
    let mut list = String::new();

    for (i, question) in questions.iter().enumerate() {
        list.push_str(&format!(
            "{}. {} _({})_\n",
            i + 1,
            question.text(),
            question.kind().replace('_', " ")
        ));

        match question {
            Question::ShortAnswer { sample_answer, .. } => {
                if let Some(answer) = sample_answer {
                    list.push_str(&format!("   - *Sample answer:* {}\n", answer));
                }
            }
            Question::MultipleChoice {
                options,
                correct_answer,
                ..
            } => {
                for (j, option) in options.iter().enumerate() {
                    let marker = if Some(j) == *correct_answer { " ✔" } else { "" };
                    list.push_str(&format!("   - {}{}\n", option, marker));
                }
            }
            Question::TrueFalse { correct_answer, .. } => {
                let answer = if *correct_answer { "True" } else { "False" };
                list.push_str(&format!("   - *Answer:* {}\n", answer));
            }
        }
    }
    list.push('\n');

    list
}

/// Generate the resources section.
fn generate_resources_section(enhancements: &[Enhancement]) -> String {
    let mut section = String::new();

    section.push_str("## Resources\n\n");

    if enhancements.is_empty() {
        section.push_str("No resources were recommended.\n\n");
        return section;
    }

    for enhancement in enhancements {
        section.push_str(&format!("### {}\n\n", enhancement.topic));
        section.push_str(&generate_resource_group("🎬 Videos", &enhancement.videos));
        section.push_str(&generate_resource_group("📰 Articles", &enhancement.articles));
        section.push_str(&generate_resource_group(
            "🧪 Interactive",
            &enhancement.interactive_resources,
        ));
    }

    section
}

fn generate_resource_group(heading: &str, resources: &[Resource]) -> String {
    if resources.is_empty() {
        return String::new();
    }

    let mut group = format!("**{}**\n\n", heading);
    for resource in resources {
        group.push_str(&format!(
            "- [{}]({}): {}\n",
            resource.title, resource.url, resource.description
        ));
    }
    group.push('\n');

    group
}

/// Generate the raw outputs section.
fn generate_raw_outputs_section(tasks: &[TaskOutput]) -> String {
    let mut section = String::new();

    section.push_str("## Raw Outputs\n\n");

    for task in tasks {
        section.push_str(&format!(
            "<details>\n<summary>{} ({})</summary>\n\n```\n",
            task.agent, task.tool
        ));
        section.push_str(&task.raw);
        section.push_str("\n```\n</details>\n\n");
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by LessonCraft v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

fn anchor(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric(), "-")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to `path`, creating parent directories.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{design_assessment, enhance_lesson, plan_lesson};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_report() -> Report {
        let seed = TopicSeed::new("Photosynthesis", vec!["Describe the light reactions".to_string()]);

        let metadata = ReportMetadata {
            curriculum: "./data/biology.pdf".to_string(),
            persist_dir: "./data/vectorstore".to_string(),
            provider: "openai".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            generated_at: Utc::now(),
            indexed_chunks: 42,
            duration_seconds: 12.5,
        };

        Report {
            metadata,
            tasks: vec![
                TaskOutput {
                    agent: "Curriculum Ingestor".to_string(),
                    tool: "VectorizePDF".to_string(),
                    description: "Load and vectorize the curriculum file.".to_string(),
                    success: true,
                    raw: "Curriculum indexed successfully with 42 chunks".to_string(),
                    duration_seconds: 3.0,
                },
                TaskOutput {
                    agent: "Topic Analyzer".to_string(),
                    tool: "AnalyzeTopics".to_string(),
                    description: "Analyze topics.".to_string(),
                    success: false,
                    raw: "Error analyzing topics: Request timed out after 120s".to_string(),
                    duration_seconds: 120.0,
                },
            ],
            lesson_plans: vec![plan_lesson(&seed)],
            assessments: vec![design_assessment(&seed)],
            enhancements: vec![enhance_lesson(&seed)],
            topics: vec![seed],
            result: "[]".to_string(),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, false);

        assert!(markdown.contains("# LessonCraft Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Pipeline Steps"));
        assert!(markdown.contains("## Lesson Plans"));
        assert!(markdown.contains("### Photosynthesis {#photosynthesis}"));
        assert!(markdown.contains("Describe the light reactions"));
        assert!(markdown.contains("https://www.khanacademy.org/search?q=photosynthesis"));
        assert!(!markdown.contains("## Raw Outputs"));
    }

    #[test]
    fn test_generate_metadata_section() {
        let report = create_test_report();
        let section = generate_metadata_section(&report.metadata, report.failed_tasks());

        assert!(section.contains("./data/biology.pdf"));
        assert!(section.contains("gpt-3.5-turbo"));
        assert!(section.contains("42"));
        assert!(section.contains("Failed Steps:** 1"));
    }

    #[test]
    fn test_pipeline_section_flags_failures() {
        let report = create_test_report();
        let section = generate_pipeline_section(&report.tasks);

        assert!(section.contains("| 1 | Curriculum Ingestor | `VectorizePDF` | ✅ | 3.0s |"));
        assert!(section.contains("❌"));
        assert!(section.contains("Request timed out after 120s"));
    }

    #[test]
    fn test_question_list_renders_answers() {
        let questions = vec![
            Question::MultipleChoice {
                question: "Which gas is released?".to_string(),
                options: vec!["Oxygen".to_string(), "Nitrogen".to_string()],
                correct_answer: Some(0),
            },
            Question::TrueFalse {
                question: "Plants need light.".to_string(),
                correct_answer: true,
            },
        ];

        let list = generate_question_list(&questions);
        assert!(list.contains("1. Which gas is released? _(multiple choice)_"));
        assert!(list.contains("2. Plants need light. _(true false)_"));
        assert!(list.contains("   - Oxygen ✔"));
        assert!(list.contains("   - Nitrogen\n"));
        assert!(list.contains("*Answer:* True"));
    }

    #[test]
    fn test_empty_sections() {
        let mut report = create_test_report();
        report.topics.clear();
        report.lesson_plans.clear();

        let markdown = generate_markdown_report(&report, true);
        assert!(markdown.contains("No topics were extracted from the curriculum."));
        assert!(markdown.contains("No lesson plans were generated."));
        assert!(markdown.contains("## Raw Outputs"));
    }

    #[test]
    fn test_anchor() {
        assert_eq!(anchor("Cell Biology"), "cell-biology");
        assert_eq!(anchor(" Fractions & Decimals "), "fractions---decimals");
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"lesson_plans\""));
        assert!(json.contains("\"exit_ticket\""));
    }

    #[test]
    fn test_write_report_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.md");

        write_report("# Report\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report\n");
    }
}
