use chrono::{DateTime, Utc};
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::store::{ContentStore, TOP_CONTENT_LIMIT},
    error::{AppError, AppResult},
    models::{
        CategoryBreakdown, ContentAnalysis, ContentItem, ContentStats, ContentTotals,
        ContentType, ContentUpdate, NewContent, SearchPage, SearchQuery, TopContent,
        TypeBreakdown, MAX_DURATION_SECS,
    },
};

const COLUMNS: &str = "id, title, description, content_type, url, thumbnail, duration, \
                       category, tags, views, likes, ai_analysis, created_at, updated_at";

/// Row shape of the `media_items` table
#[derive(sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    title: String,
    description: String,
    content_type: String,
    url: String,
    thumbnail: Option<String>,
    duration: Option<i32>,
    category: String,
    tags: Vec<String>,
    views: i64,
    likes: i64,
    ai_analysis: Option<Json<ContentAnalysis>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Converts a duration to the signed column type, refusing values that would wrap
fn duration_column(duration: Option<u32>) -> AppResult<Option<i32>> {
    duration
        .map(|d| {
            i32::try_from(d).map_err(|_| {
                AppError::InvalidInput(format!(
                    "Duration must be at most {} seconds",
                    MAX_DURATION_SECS
                ))
            })
        })
        .transpose()
}

fn parse_type(value: &str) -> AppResult<ContentType> {
    ContentType::parse(value)
        .ok_or_else(|| AppError::Internal(format!("Unknown content type in database: {}", value)))
}

impl TryFrom<ContentRow> for ContentItem {
    type Error = AppError;

    fn try_from(row: ContentRow) -> AppResult<Self> {
        Ok(ContentItem {
            id: row.id,
            title: row.title,
            description: row.description,
            content_type: parse_type(&row.content_type)?,
            url: row.url,
            thumbnail: row.thumbnail,
            duration: row.duration.map(|d| d.max(0) as u32),
            category: row.category,
            tags: row.tags,
            views: row.views.max(0) as u64,
            likes: row.likes.max(0) as u64,
            created_at: row.created_at,
            updated_at: row.updated_at,
            ai_analysis: row.ai_analysis.map(|Json(a)| a),
        })
    }
}

fn into_items(rows: Vec<ContentRow>) -> AppResult<Vec<ContentItem>> {
    rows.into_iter().map(ContentItem::try_from).collect()
}

/// Appends the WHERE clause shared by the search count and page queries
fn push_search_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SearchQuery) {
    builder.push(" WHERE TRUE");

    if let Some(text) = query.text() {
        // Any query word equal to a word of the title or description
        builder.push(
            " AND regexp_split_to_array(lower(title || ' ' || description), '[^[:alnum:]]+') \
             && regexp_split_to_array(lower(",
        );
        builder.push_bind(text.to_string());
        builder.push("), '\\s+')");
    }

    if let Some(category) = query.category() {
        builder.push(" AND category = ");
        builder.push_bind(category.to_string());
    }

    if let Some(content_type) = query.content_type {
        builder.push(" AND content_type = ");
        builder.push_bind(content_type.as_str());
    }
}

/// Content store backed by PostgreSQL
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContentStore for PgContentStore {
    async fn list_all(&self) -> AppResult<Vec<ContentItem>> {
        let sql = format!("SELECT {} FROM media_items ORDER BY created_at, id", COLUMNS);
        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        into_items(rows)
    }

    async fn trending(&self, limit: u32) -> AppResult<Vec<ContentItem>> {
        let sql = format!(
            "SELECT {} FROM media_items ORDER BY views DESC, likes DESC, created_at LIMIT $1",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        into_items(rows)
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<SearchPage> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM media_items");
        push_search_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM media_items", COLUMNS));
        push_search_filters(&mut select, query);
        select.push(" ORDER BY created_at, id LIMIT ");
        select.push_bind(i64::from(query.limit()));
        select.push(" OFFSET ");
        select.push_bind(i64::from(query.offset()));

        let rows = select
            .build_query_as::<ContentRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(SearchPage {
            results: into_items(rows)?,
            total: total.max(0) as u64,
            page: query.page(),
            limit: query.limit(),
        })
    }

    async fn by_category(&self, category: &str, limit: u32) -> AppResult<Vec<ContentItem>> {
        let sql = format!(
            "SELECT {} FROM media_items WHERE category = $1 ORDER BY created_at DESC LIMIT $2",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(category)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        into_items(rows)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        let sql = format!("SELECT {} FROM media_items WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ContentItem::try_from).transpose()
    }

    async fn record_view(&self, id: Uuid) -> AppResult<Option<ContentItem>> {
        // Single-statement increment: concurrent readers never lose a view
        let sql = format!(
            "UPDATE media_items SET views = views + 1 WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ContentItem::try_from).transpose()
    }

    async fn record_like(&self, id: Uuid) -> AppResult<Option<u64>> {
        let likes: Option<i64> =
            sqlx::query_scalar("UPDATE media_items SET likes = likes + 1 WHERE id = $1 RETURNING likes")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(likes.map(|l| l.max(0) as u64))
    }

    async fn create(&self, new: NewContent) -> AppResult<ContentItem> {
        let item = ContentItem::from_new(new);
        let duration = duration_column(item.duration)?;
        let sql = format!(
            "INSERT INTO media_items ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {}",
            COLUMNS, COLUMNS
        );
        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.content_type.as_str())
            .bind(&item.url)
            .bind(&item.thumbnail)
            .bind(duration)
            .bind(&item.category)
            .bind(&item.tags)
            .bind(item.views as i64)
            .bind(item.likes as i64)
            .bind(item.ai_analysis.as_ref().map(Json))
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(content_id = %item.id, "Inserted media item");
        ContentItem::try_from(row)
    }

    async fn update(&self, id: Uuid, update: ContentUpdate) -> AppResult<Option<ContentItem>> {
        let duration = duration_column(update.duration)?;
        let sql = format!(
            "UPDATE media_items SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                content_type = COALESCE($4, content_type), \
                url = COALESCE($5, url), \
                thumbnail = COALESCE($6, thumbnail), \
                duration = COALESCE($7, duration), \
                category = COALESCE($8, category), \
                tags = COALESCE($9, tags), \
                updated_at = now() \
             WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .bind(update.title)
            .bind(update.description)
            .bind(update.content_type.map(|t| t.as_str()))
            .bind(update.url)
            .bind(update.thumbnail)
            .bind(duration)
            .bind(update.category)
            .bind(update.tags)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ContentItem::try_from).transpose()
    }

    async fn save_analysis(&self, id: Uuid, analysis: &ContentAnalysis) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE media_items SET ai_analysis = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(Json(analysis))
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn totals(&self) -> AppResult<ContentTotals> {
        let (count, views, likes): (i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(views), 0)::BIGINT, COALESCE(SUM(likes), 0)::BIGINT \
             FROM media_items",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ContentTotals {
            count: count.max(0) as u64,
            views: views.max(0) as u64,
            likes: likes.max(0) as u64,
        })
    }

    async fn breakdown(&self) -> AppResult<ContentStats> {
        let type_rows: Vec<(String, i64, i64, i64)> = sqlx::query_as(
            "SELECT content_type, COUNT(*) AS count, \
                    COALESCE(SUM(views), 0)::BIGINT, COALESCE(SUM(likes), 0)::BIGINT \
             FROM media_items GROUP BY content_type ORDER BY count DESC, content_type",
        )
        .fetch_all(&self.pool)
        .await?;

        let category_rows: Vec<(String, i64, i64)> = sqlx::query_as(
            "SELECT category, COUNT(*) AS count, COALESCE(SUM(views), 0)::BIGINT \
             FROM media_items GROUP BY category ORDER BY count DESC, category",
        )
        .fetch_all(&self.pool)
        .await?;

        let top_rows: Vec<(Uuid, String, i64, i64, String, String)> = sqlx::query_as(
            "SELECT id, title, views, likes, content_type, category \
             FROM media_items ORDER BY views DESC, created_at LIMIT $1",
        )
        .bind(TOP_CONTENT_LIMIT as i64)
        .fetch_all(&self.pool)
        .await?;

        let by_type = type_rows
            .into_iter()
            .map(|(content_type, count, views, likes)| {
                Ok(TypeBreakdown {
                    content_type: parse_type(&content_type)?,
                    count: count.max(0) as u64,
                    total_views: views.max(0) as u64,
                    total_likes: likes.max(0) as u64,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let by_category = category_rows
            .into_iter()
            .map(|(category, count, views)| CategoryBreakdown {
                category,
                count: count.max(0) as u64,
                total_views: views.max(0) as u64,
            })
            .collect();

        let top_content = top_rows
            .into_iter()
            .map(|(id, title, views, likes, content_type, category)| {
                Ok(TopContent {
                    id,
                    title,
                    views: views.max(0) as u64,
                    likes: likes.max(0) as u64,
                    content_type: parse_type(&content_type)?,
                    category,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(ContentStats {
            by_type,
            by_category,
            top_content,
        })
    }
}
