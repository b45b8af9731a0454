use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;
use validator::Validate;

use super::ContentAnalysis;

/// Longest duration, in seconds, that fits the storage column
pub const MAX_DURATION_SECS: u32 = i32::MAX as u32;

/// Kind of media an item points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Video,
    Article,
    Podcast,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Image,
        ContentType::Video,
        ContentType::Article,
        ContentType::Podcast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Article => "article",
            ContentType::Podcast => "podcast",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media item as stored and served to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Duration in seconds for playable media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub views: u64,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<ContentAnalysis>,
}

impl ContentItem {
    /// Builds a fresh item from a creation request
    pub fn from_new(new: NewContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            content_type: new.content_type,
            url: new.url,
            thumbnail: new.thumbnail,
            duration: new.duration,
            category: new.category,
            tags: new.tags,
            views: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
            ai_analysis: None,
        }
    }

    /// Text handed to the content analyzer
    pub fn analysis_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    /// Applies the fields present in `update`, leaving the rest untouched
    pub fn apply(&mut self, update: ContentUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(content_type) = update.content_type {
            self.content_type = content_type;
        }
        if let Some(url) = update.url {
            self.url = url;
        }
        if let Some(thumbnail) = update.thumbnail {
            self.thumbnail = Some(thumbnail);
        }
        if let Some(duration) = update.duration {
            self.duration = Some(duration);
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    /// Case-insensitive match of any query word against title and description
    pub fn matches_text(&self, query: &str) -> bool {
        let haystack = format!("{} {}", self.title, self.description).to_lowercase();
        let words: Vec<&str> = haystack
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        query
            .to_lowercase()
            .split_whitespace()
            .any(|term| words.contains(&term))
    }
}

/// Request body for creating a media item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    #[validate(length(min = 5, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[validate(url)]
    pub url: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[validate(range(max = 2_147_483_647))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl NewContent {
    /// Trims free-text fields before validation
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.category = self.category.trim().to_string();
        self
    }
}

/// Partial update of a media item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    #[validate(length(min = 5, max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[validate(range(max = 2_147_483_647))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl ContentUpdate {
    /// Trims the free-text fields that are present
    pub fn normalized(mut self) -> Self {
        let trim = |value: Option<String>| value.map(|v| v.trim().to_string());
        self.title = trim(self.title);
        self.description = trim(self.description);
        self.category = trim(self.category);
        self
    }
}

/// Query string for content search
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SearchQuery {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, 100)
    }

    pub fn offset(&self) -> u32 {
        (self.page() - 1) * self.limit()
    }

    /// Trimmed text query, `None` when blank
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Trimmed category filter, `None` when blank
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Whether an item passes every filter in this query
    pub fn matches(&self, item: &ContentItem) -> bool {
        self.text().map_or(true, |q| item.matches_text(q))
            && self.category().map_or(true, |c| item.category == c)
            && self.content_type.map_or(true, |t| item.content_type == t)
    }
}

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchPage {
    pub results: Vec<ContentItem>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Response body of the like endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikeResponse {
    pub success: bool,
    pub likes: u64,
}
