//! Sixty-minute lesson plan template.

use crate::models::{Activity, LessonAssessment, LessonPlan, TopicSeed};

/// (name, duration, description) for each block; `{topic}` is substituted.
const ACTIVITIES: [(&str, &str, &str); 5] = [
    (
        "Introduction",
        "10 minutes",
        "Introduce the topic of {topic} and establish learning objectives.",
    ),
    (
        "Direct Instruction",
        "20 minutes",
        "Present key concepts related to {topic}.",
    ),
    (
        "Guided Practice",
        "15 minutes",
        "Students work on exercises with teacher guidance.",
    ),
    (
        "Independent Practice",
        "10 minutes",
        "Students demonstrate understanding independently.",
    ),
    (
        "Closure",
        "5 minutes",
        "Summarize key learning and check for understanding.",
    ),
];

/// Build the lesson plan for one topic.
pub fn plan_lesson(seed: &TopicSeed) -> LessonPlan {
    let activities = ACTIVITIES
        .iter()
        .map(|(name, duration, description)| Activity {
            name: name.to_string(),
            duration: duration.to_string(),
            description: description.replace("{topic}", &seed.topic),
        })
        .collect();

    LessonPlan {
        topic: seed.topic.clone(),
        objectives: seed.objectives.clone(),
        duration: "60 minutes".to_string(),
        materials_needed: strings(&["Handouts", "Presentation slides", "Reference materials"]),
        activities,
        assessment: LessonAssessment {
            formative: strings(&[
                "Exit tickets",
                "Guided practice observations",
                "Q&A during instruction",
            ]),
            summative: strings(&["End-of-unit project", "Quiz in next class"]),
        },
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_plan_template() {
        let seed = TopicSeed::new("Plate Tectonics", vec!["Explain plate boundaries".to_string()]);
        let plan = plan_lesson(&seed);

        assert_eq!(plan.topic, "Plate Tectonics");
        assert_eq!(plan.objectives, vec!["Explain plate boundaries"]);
        assert_eq!(plan.duration, "60 minutes");
        assert_eq!(plan.materials_needed.len(), 3);
        assert_eq!(plan.activities.len(), 5);
        assert_eq!(
            plan.activities[0].description,
            "Introduce the topic of Plate Tectonics and establish learning objectives."
        );
        assert_eq!(
            plan.activities[1].description,
            "Present key concepts related to Plate Tectonics."
        );
        assert_eq!(plan.activities[4].name, "Closure");
        assert_eq!(plan.assessment.summative, vec!["End-of-unit project", "Quiz in next class"]);
    }

    #[test]
    fn test_activity_minutes_add_up_to_an_hour() {
        let plan = plan_lesson(&TopicSeed::sample());
        let total: u32 = plan
            .activities
            .iter()
            .filter_map(|a| a.duration.split_whitespace().next())
            .filter_map(|n| n.parse::<u32>().ok())
            .sum();
        assert_eq!(total, 60);
    }

    #[test]
    fn test_lesson_plan_json_shape() {
        let value = serde_json::to_value(plan_lesson(&TopicSeed::sample())).unwrap();
        assert_eq!(value["topic"], "Sample Topic");
        assert_eq!(value["activities"][2]["name"], "Guided Practice");
        assert_eq!(value["assessment"]["formative"][0], "Exit tickets");
    }
}
