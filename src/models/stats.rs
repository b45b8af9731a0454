use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContentType;

/// Aggregate counters over the whole catalogue
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentTotals {
    pub count: u64,
    pub views: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_content: u64,
    pub total_users: u64,
    pub total_views: u64,
    pub total_likes: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub count: u64,
    pub total_views: u64,
    pub total_likes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: u64,
    pub total_views: u64,
}

/// Condensed view of a popular item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopContent {
    pub id: Uuid,
    pub title: String,
    pub views: u64,
    pub likes: u64,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub by_type: Vec<TypeBreakdown>,
    pub by_category: Vec<CategoryBreakdown>,
    pub top_content: Vec<TopContent>,
}
