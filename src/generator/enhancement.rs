//! Supplementary resource links.

use crate::models::{Enhancement, Resource, TopicSeed};

fn resource(title: String, url: String, description: String) -> Resource {
    Resource {
        title,
        url,
        description,
    }
}

/// Build search links to videos, articles, and interactive material for one topic.
pub fn enhance_lesson(seed: &TopicSeed) -> Enhancement {
    let topic = &seed.topic;
    let slug = seed.slug();

    let videos = vec![
        resource(
            format!("Introduction to {}", topic),
            format!("https://www.youtube.com/results?search_query={}+introduction", slug),
            format!("An engaging introduction to {} for beginners.", topic),
        ),
        resource(
            format!("{} Explained", topic),
            format!("https://www.khanacademy.org/search?q={}", slug),
            format!("Detailed explanation of {} with helpful visuals.", topic),
        ),
    ];

    let articles = vec![
        resource(
            format!("Understanding {}", topic),
            format!("https://www.britannica.com/search?query={}", slug),
            format!(
                "Comprehensive article about {} from Encyclopedia Britannica.",
                topic
            ),
        ),
        resource(
            format!("{} in Practice", topic),
            format!("https://scholar.google.com/scholar?q={}", slug),
            format!("Academic papers related to {} for in-depth study.", topic),
        ),
    ];

    let interactive_resources = vec![
        resource(
            format!("{} Interactive Quiz", topic),
            format!("https://quizlet.com/search?query={}&type=sets", slug),
            format!("Interactive quizzes to test knowledge of {}.", topic),
        ),
        resource(
            format!("{} Simulation", topic),
            format!("https://phet.colorado.edu/en/search?q={}", slug),
            format!("Interactive simulations related to {} concepts.", topic),
        ),
    ];

    Enhancement {
        topic: topic.clone(),
        objectives: seed.objectives.clone(),
        videos,
        articles,
        interactive_resources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_use_slug() {
        let enhancement = enhance_lesson(&TopicSeed::new("Newton's Laws of Motion", vec![]));

        assert_eq!(enhancement.resource_count(), 6);
        assert_eq!(
            enhancement.videos[0].url,
            "https://www.youtube.com/results?search_query=newton's-laws-of-motion+introduction"
        );
        assert_eq!(
            enhancement.interactive_resources[0].url,
            "https://quizlet.com/search?query=newton's-laws-of-motion&type=sets"
        );
        assert_eq!(enhancement.articles[1].title, "Newton's Laws of Motion in Practice");
    }

    #[test]
    fn test_descriptions_mention_topic() {
        let enhancement = enhance_lesson(&TopicSeed::new("Fractions", vec!["Add".to_string()]));
        assert_eq!(enhancement.objectives, vec!["Add"]);
        assert_eq!(
            enhancement.articles[0].description,
            "Comprehensive article about Fractions from Encyclopedia Britannica."
        );
        assert_eq!(
            enhancement.interactive_resources[1].url,
            "https://phet.colorado.edu/en/search?q=fractions"
        );
    }
}
