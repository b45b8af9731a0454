use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{ContentStore, UserStore, TOP_CONTENT_LIMIT};
use crate::{
    error::{AppError, AppResult},
    models::{
        CategoryBreakdown, ContentAnalysis, ContentItem, ContentStats, ContentTotals,
        ContentType, ContentUpdate, NewContent, NewUser, SearchPage, SearchQuery, TopContent,
        TypeBreakdown, User,
    },
};

/// Content store backed by a vector in insertion order
///
/// Counter increments happen under the write lock, so concurrent views never
/// under-count.
#[derive(Default)]
pub struct MemoryContentStore {
    items: RwLock<Vec<ContentItem>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_popularity(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.views.cmp(&a.views).then(b.likes.cmp(&a.likes)));
}

#[async_trait::async_trait]
impl ContentStore for MemoryContentStore {
    async fn list_all(&self) -> AppResult<Vec<ContentItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn trending(&self, limit: u32) -> AppResult<Vec<ContentItem>> {
        let mut items = self.items.read().await.clone();
        by_popularity(&mut items);
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<SearchPage> {
        let items = self.items.read().await;
        let matching: Vec<&ContentItem> = items.iter().filter(|i| query.matches(i)).collect();

        let results = matching
            .iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .map(|i| (*i).clone())
            .collect();

        Ok(SearchPage {
            results,
            total: matching.len() as u64,
            page: query.page(),
            limit: query.limit(),
        })
    }

    async fn by_category(&self, category: &str, limit: u32) -> AppResult<Vec<ContentItem>> {
        let mut items: Vec<ContentItem> = self
            .items
            .read()
            .await
            .iter()
            .filter(|i| i.category == category)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        Ok(self.items.read().await.iter().find(|i| i.id == id).cloned())
    }

    async fn record_view(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        let mut items = self.items.write().await;
        Ok(items.iter_mut().find(|i| i.id == id).map(|item| {
            item.views += 1;
            item.clone()
        }))
    }

    async fn record_like(&self, id: Uuid) -> AppResult<Option<u64>> {
        let mut items = self.items.write().await;
        Ok(items.iter_mut().find(|i| i.id == id).map(|item| {
            item.likes += 1;
            item.likes
        }))
    }

    async fn create(&self, new: NewContent) -> AppResult<ContentItem> {
        let item = ContentItem::from_new(new);
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, update: ContentUpdate) -> AppResult<Option<ContentItem>> {
        let mut items = self.items.write().await;
        Ok(items.iter_mut().find(|i| i.id == id).map(|item| {
            item.apply(update);
            item.clone()
        }))
    }

    async fn save_analysis(&self, id: Uuid, analysis: &ContentAnalysis) -> AppResult<bool> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.ai_analysis = Some(analysis.clone());
                item.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn totals(&self) -> AppResult<ContentTotals> {
        let items = self.items.read().await;
        Ok(items.iter().fold(ContentTotals::default(), |acc, item| ContentTotals {
            count: acc.count + 1,
            views: acc.views + item.views,
            likes: acc.likes + item.likes,
        }))
    }

    async fn breakdown(&self) -> AppResult<ContentStats> {
        let items = self.items.read().await;

        let mut types: HashMap<ContentType, TypeBreakdown> = HashMap::new();
        let mut categories: HashMap<String, CategoryBreakdown> = HashMap::new();

        for item in items.iter() {
            let entry = types.entry(item.content_type).or_insert(TypeBreakdown {
                content_type: item.content_type,
                count: 0,
                total_views: 0,
                total_likes: 0,
            });
            entry.count += 1;
            entry.total_views += item.views;
            entry.total_likes += item.likes;

            let entry = categories
                .entry(item.category.clone())
                .or_insert_with(|| CategoryBreakdown {
                    category: item.category.clone(),
                    count: 0,
                    total_views: 0,
                });
            entry.count += 1;
            entry.total_views += item.views;
        }

        let mut by_type: Vec<TypeBreakdown> = types.into_values().collect();
        by_type.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.content_type.as_str().cmp(b.content_type.as_str()))
        });

        let mut by_category: Vec<CategoryBreakdown> = categories.into_values().collect();
        by_category.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

        let mut popular = items.clone();
        popular.sort_by(|a, b| b.views.cmp(&a.views));
        let top_content = popular
            .into_iter()
            .take(TOP_CONTENT_LIMIT)
            .map(|i| TopContent {
                id: i.id,
                title: i.title,
                views: i.views,
                likes: i.likes,
                content_type: i.content_type,
                category: i.category,
            })
            .collect();

        Ok(ContentStats {
            by_type,
            by_category,
            top_content,
        })
    }
}

/// Account store keyed by user id
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.email == new.email || u.username == new.username)
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let user = User::from_new(new);
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }
}
