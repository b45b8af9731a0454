use rand::Rng;

use crate::models::{ContentAnalysis, Sentiment};

/// Topic labels the analyzer may assign, in selection order
pub const TOPIC_VOCABULARY: [&str; 8] = [
    "Technology",
    "Business",
    "Entertainment",
    "Education",
    "Health",
    "Sports",
    "News",
    "Music",
];

pub const MAX_TOPICS: usize = 3;

/// Sentiment score above which content reads as positive
pub const POSITIVE_THRESHOLD: f64 = 0.6;
/// Sentiment score below which content reads as negative
pub const NEGATIVE_THRESHOLD: f64 = 0.3;
/// Sentiment score below which (non-negative) content reads as mixed
pub const MIXED_THRESHOLD: f64 = 0.5;

const POSITIVE_MESSAGE: &str = "Great engagement potential for this content";
const NEGATIVE_MESSAGE: &str = "Consider revising tone for better reception";
const TAGGING_MESSAGE: &str = "Optimize tags for better discoverability";

/// Turns raw text into a [`ContentAnalysis`]
///
/// This is the seam for swapping the placeholder classifier for a real model.
#[cfg_attr(test, mockall::automock)]
pub trait ClassificationPolicy: Send + Sync {
    fn analyze(&self, text: &str) -> ContentAnalysis;
}

/// Placeholder classifier that draws every signal at random
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomClassifier;

impl ClassificationPolicy for RandomClassifier {
    fn analyze(&self, text: &str) -> ContentAnalysis {
        analyze_with(text, &mut rand::thread_rng())
    }
}

/// Runs the placeholder analysis with an explicit randomness source
///
/// Draw order: sentiment, one draw per vocabulary topic, engagement, keyword score.
pub fn analyze_with<R: Rng + ?Sized>(text: &str, rng: &mut R) -> ContentAnalysis {
    let sentiment = classify_sentiment(rng.gen::<f64>());

    let draws: Vec<f64> = TOPIC_VOCABULARY.iter().map(|_| rng.gen::<f64>()).collect();
    let topics = select_topics(&draws);

    let engagement = rng.gen_range(0.2..1.0);
    let keyword_score = rng.gen_range(0.3..1.0);

    tracing::debug!(
        text_len = text.len(),
        sentiment = %sentiment,
        topics = topics.len(),
        "Analyzed content"
    );

    ContentAnalysis {
        sentiment,
        recommendations: build_recommendations(&topics, sentiment),
        topics,
        keyword_score,
        engagement,
    }
}

/// Maps a score in [0, 1) to a sentiment
///
/// Bands: (0.6, 1) positive, [0, 0.3) negative, [0.3, 0.5) mixed, [0.5, 0.6] neutral.
pub fn classify_sentiment(score: f64) -> Sentiment {
    if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else if score < MIXED_THRESHOLD {
        Sentiment::Mixed
    } else {
        Sentiment::Neutral
    }
}

/// Keeps each vocabulary label whose draw exceeds 0.5, capped at three
///
/// `draws` pairs positionally with [`TOPIC_VOCABULARY`]; missing draws count as rejections.
pub fn select_topics(draws: &[f64]) -> Vec<String> {
    TOPIC_VOCABULARY
        .iter()
        .zip(draws)
        .filter(|(_, draw)| **draw > 0.5)
        .map(|(topic, _)| topic.to_string())
        .take(MAX_TOPICS)
        .collect()
}

/// Human-readable advice derived from the classification
pub fn build_recommendations(topics: &[String], sentiment: Sentiment) -> Vec<String> {
    let mut recommendations = Vec::new();

    match sentiment {
        Sentiment::Positive => recommendations.push(POSITIVE_MESSAGE.to_string()),
        Sentiment::Negative => recommendations.push(NEGATIVE_MESSAGE.to_string()),
        Sentiment::Neutral | Sentiment::Mixed => {}
    }

    if let Some(topic) = topics.first() {
        recommendations.push(format!("Focus on {} trend for better reach", topic));
    }

    recommendations.push(TAGGING_MESSAGE.to_string());
    recommendations
}
