//! Exit ticket and quiz template.

use crate::models::{
    Assessment, FormativeAssessment, Question, QuestionSet, SummativeAssessment, TopicSeed,
};

const CONFIDENCE_SCALE: [&str; 4] = [
    "Very confident",
    "Somewhat confident",
    "Slightly confused",
    "Very confused",
];

/// Build the formative and summative assessment for one topic.
pub fn design_assessment(seed: &TopicSeed) -> Assessment {
    let topic = &seed.topic;

    let exit_ticket = QuestionSet {
        questions: vec![
            Question::ShortAnswer {
                question: format!("What is one thing you learned about {} today?", topic),
                sample_answer: None,
            },
            Question::MultipleChoice {
                question: "How confident are you with today's material?".to_string(),
                options: CONFIDENCE_SCALE.iter().map(|s| s.to_string()).collect(),
                correct_answer: None,
            },
        ],
    };

    let quiz = QuestionSet {
        questions: vec![
            Question::MultipleChoice {
                question: format!("Which of the following best describes {}?", topic),
                options: vec![
                    format!("Correct description of {}", topic),
                    "Incorrect option 1".to_string(),
                    "Incorrect option 2".to_string(),
                    "Incorrect option 3".to_string(),
                ],
                correct_answer: Some(0),
            },
            Question::ShortAnswer {
                question: format!("Explain the importance of {}.", topic),
                sample_answer: Some(format!("{} is important because...", topic)),
            },
            Question::TrueFalse {
                question: format!("{} is a fundamental concept in this field.", topic),
                correct_answer: true,
            },
        ],
    };

    Assessment {
        topic: topic.clone(),
        objectives: seed.objectives.clone(),
        formative_assessment: FormativeAssessment { exit_ticket },
        summative_assessment: SummativeAssessment { quiz },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_ticket_mentions_topic() {
        let assessment = design_assessment(&TopicSeed::new("Photosynthesis", vec![]));
        let questions = &assessment.formative_assessment.exit_ticket.questions;

        assert_eq!(questions.len(), 2);
        assert_eq!(
            questions[0].text(),
            "What is one thing you learned about Photosynthesis today?"
        );
        match &questions[1] {
            Question::MultipleChoice { options, correct_answer, .. } => {
                assert_eq!(options.len(), 4);
                assert!(correct_answer.is_none());
            }
            other => panic!("expected multiple choice, got {other:?}"),
        }
    }

    #[test]
    fn test_quiz_template() {
        let assessment = design_assessment(&TopicSeed::new("Photosynthesis", vec![]));
        let quiz = &assessment.summative_assessment.quiz.questions;

        let kinds: Vec<_> = quiz.iter().map(Question::kind).collect();
        assert_eq!(kinds, vec!["multiple_choice", "short_answer", "true_false"]);

        match &quiz[0] {
            Question::MultipleChoice { options, correct_answer, .. } => {
                assert_eq!(options[0], "Correct description of Photosynthesis");
                assert_eq!(*correct_answer, Some(0));
            }
            other => panic!("expected multiple choice, got {other:?}"),
        }
        match &quiz[1] {
            Question::ShortAnswer { sample_answer, .. } => {
                assert_eq!(
                    sample_answer.as_deref(),
                    Some("Photosynthesis is important because...")
                );
            }
            other => panic!("expected short answer, got {other:?}"),
        }
    }

    #[test]
    fn test_assessment_json_shape() {
        let value = serde_json::to_value(design_assessment(&TopicSeed::sample())).unwrap();
        let quiz = &value["summative_assessment"]["quiz"]["questions"];
        assert_eq!(quiz[2]["type"], "true_false");
        assert_eq!(quiz[2]["correct_answer"], true);
        assert_eq!(
            value["formative_assessment"]["exit_ticket"]["questions"][0]["type"],
            "short_answer"
        );
    }
}
