//! Storage abstractions for content and accounts
//!
//! Route handlers and services only ever see these traits, so the PostgreSQL
//! implementation can be swapped for the in-memory one in tests and demos.

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        ContentAnalysis, ContentItem, ContentStats, ContentTotals, ContentUpdate, NewContent,
        NewUser, SearchPage, SearchQuery, User,
    },
};

/// Number of items reported in the "top content" breakdown
pub const TOP_CONTENT_LIMIT: usize = 10;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Full corpus in creation order
    async fn list_all(&self) -> AppResult<Vec<ContentItem>>;

    /// Most viewed items, likes breaking ties
    async fn trending(&self, limit: u32) -> AppResult<Vec<ContentItem>>;

    /// Filtered, paginated search
    async fn search(&self, query: &SearchQuery) -> AppResult<SearchPage>;

    /// Newest items of one category
    async fn by_category(&self, category: &str, limit: u32) -> AppResult<Vec<ContentItem>>;

    async fn find(&self, id: Uuid) -> AppResult<Option<ContentItem>>;

    /// Atomically increments the view counter and returns the updated item
    async fn record_view(&self, id: Uuid) -> AppResult<Option<ContentItem>>;

    /// Atomically increments the like counter and returns the new count
    async fn record_like(&self, id: Uuid) -> AppResult<Option<u64>>;

    async fn create(&self, new: NewContent) -> AppResult<ContentItem>;

    async fn update(&self, id: Uuid, update: ContentUpdate) -> AppResult<Option<ContentItem>>;

    /// Replaces any stored analysis. Returns false when the item does not exist.
    async fn save_analysis(&self, id: Uuid, analysis: &ContentAnalysis) -> AppResult<bool>;

    async fn totals(&self) -> AppResult<ContentTotals>;

    async fn breakdown(&self) -> AppResult<ContentStats>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new account. Fails with `Conflict` on a duplicate email or username.
    async fn create(&self, new: NewUser) -> AppResult<User>;

    async fn find(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn count(&self) -> AppResult<u64>;
}
