use uuid::Uuid;
use validator::Validate;

use super::recommendations::{recommend_for_profile, score_item};
use crate::{
    cached,
    db::CacheKey,
    error::{AppError, AppResult},
    models::{
        ContentAnalysis, ContentItem, ContentUpdate, LikeResponse, NewContent, ScoredItem,
        SearchPage, SearchQuery, UserInterestProfile,
    },
    services::auth::AuthClaims,
    state::AppState,
};

pub const DEFAULT_TRENDING_LIMIT: u32 = 10;
pub const DEFAULT_CATEGORY_LIMIT: u32 = 10;
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 5;

/// Seconds a trending list stays cached
pub const TRENDING_TTL_SECS: u64 = 60;

/// Resolves an optional list limit. Zero counts as unset.
///
/// Lists are not capped: a caller asking for more than the corpus holds
/// simply gets the whole corpus back.
fn list_limit(limit: Option<u32>, default: u32) -> u32 {
    limit.filter(|l| *l > 0).unwrap_or(default)
}

fn not_found() -> AppError {
    AppError::NotFound("Content not found".to_string())
}

pub async fn trending(state: &AppState, limit: Option<u32>) -> AppResult<Vec<ContentItem>> {
    let limit = list_limit(limit, DEFAULT_TRENDING_LIMIT);
    cached!(
        state.cache.as_ref(),
        CacheKey::Trending(limit),
        TRENDING_TTL_SECS,
        state.content.trending(limit)
    )
}

pub async fn search(state: &AppState, query: SearchQuery) -> AppResult<SearchPage> {
    query.validate()?;
    state.content.search(&query).await
}

pub async fn by_category(
    state: &AppState,
    category: &str,
    limit: Option<u32>,
) -> AppResult<Vec<ContentItem>> {
    let limit = list_limit(limit, DEFAULT_CATEGORY_LIMIT);
    state.content.by_category(category, limit).await
}

/// Ranked recommendations for a caller
///
/// Signed-in users are scored against the configured interest labels over the
/// whole corpus. Anonymous callers get the trending list, scored on
/// popularity alone so both paths return the same shape.
pub async fn recommendations(
    state: &AppState,
    caller: Option<&AuthClaims>,
    limit: Option<u32>,
) -> AppResult<Vec<ScoredItem>> {
    let limit = list_limit(limit, DEFAULT_RECOMMENDATION_LIMIT);

    match caller {
        Some(claims) => {
            let profile =
                UserInterestProfile::new(claims.sub.to_string(), state.default_interests.clone());
            let corpus = state.content.list_all().await?;
            Ok(recommend_for_profile(&profile, &corpus, limit as usize))
        }
        None => {
            let popular = state.content.trending(limit).await?;
            Ok(popular
                .into_iter()
                .map(|item| {
                    let recommendation_score = score_item(&item, &[]);
                    ScoredItem {
                        item,
                        recommendation_score,
                    }
                })
                .collect())
        }
    }
}

/// Fetches an item, counting the read as a view
pub async fn view(state: &AppState, id: Uuid) -> AppResult<ContentItem> {
    state.content.record_view(id).await?.ok_or_else(not_found)
}

/// Runs the classifier over an item and stores the result on it
pub async fn analyze(state: &AppState, id: Uuid) -> AppResult<ContentAnalysis> {
    let item = state.content.find(id).await?.ok_or_else(not_found)?;

    let analysis = state.classifier.analyze(&item.analysis_text());

    if !state.content.save_analysis(id, &analysis).await? {
        return Err(not_found());
    }

    tracing::info!(
        content_id = %id,
        sentiment = %analysis.sentiment,
        topics = analysis.topics.len(),
        "Content analyzed"
    );

    Ok(analysis)
}

pub async fn like(state: &AppState, id: Uuid) -> AppResult<LikeResponse> {
    let likes = state.content.record_like(id).await?.ok_or_else(not_found)?;
    Ok(LikeResponse {
        success: true,
        likes,
    })
}

pub async fn create(state: &AppState, new: NewContent) -> AppResult<ContentItem> {
    let new = new.normalized();
    new.validate()?;

    let item = state.content.create(new).await?;
    tracing::info!(content_id = %item.id, "Content created");
    Ok(item)
}

pub async fn update(state: &AppState, id: Uuid, update: ContentUpdate) -> AppResult<ContentItem> {
    let update = update.normalized();
    update.validate()?;
    state
        .content
        .update(id, update)
        .await?
        .ok_or_else(not_found)
}
