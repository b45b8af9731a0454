mod analysis;
mod content;
mod recommendation;
mod stats;
mod user;

pub use analysis::{ContentAnalysis, Sentiment};
pub use content::{
    ContentItem, ContentType, ContentUpdate, LikeResponse, NewContent, SearchPage, SearchQuery,
    MAX_DURATION_SECS,
};
pub use recommendation::{ScoredItem, UserInterestProfile};
pub use stats::{
    CategoryBreakdown, ContentStats, ContentTotals, PlatformStats, TopContent, TypeBreakdown,
};
pub use user::{
    AuthResponse, NewUser, SigninRequest, SignupRequest, Theme, User, UserPreferences,
    UserProfile, UserSummary,
};

use serde::{Deserialize, Serialize};

/// Success envelope used by the analytics and system endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }
}
