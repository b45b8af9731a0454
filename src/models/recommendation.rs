use serde::{Deserialize, Serialize};

use super::ContentItem;

/// Interest signal for one user. Supplied by the caller, not history-aware.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInterestProfile {
    pub user_id: String,
    pub interests: Vec<String>,
}

impl UserInterestProfile {
    pub fn new(user_id: impl Into<String>, interests: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            interests,
        }
    }
}

/// A content item together with its recommendation score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: ContentItem,
    pub recommendation_score: f64,
}
