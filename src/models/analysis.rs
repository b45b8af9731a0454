use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Four-way sentiment classification of a piece of content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Mixed => "mixed",
        };
        f.write_str(label)
    }
}

/// Result of analyzing an item's text. Always replaced wholesale on re-analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalysis {
    pub sentiment: Sentiment,
    /// At most three labels from the topic vocabulary
    pub topics: Vec<String>,
    /// In [0.3, 1.0)
    pub keyword_score: f64,
    /// In [0.2, 1.0)
    pub engagement: f64,
    pub recommendations: Vec<String>,
}
