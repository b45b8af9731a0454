use chrono::Utc;

use crate::{
    cached,
    db::CacheKey,
    error::AppResult,
    models::{ContentStats, PlatformStats},
    state::AppState,
};

/// Seconds platform and content statistics stay cached
pub const STATS_TTL_SECS: u64 = 30;

pub async fn platform_stats(state: &AppState) -> AppResult<PlatformStats> {
    cached!(state.cache.as_ref(), CacheKey::PlatformStats, STATS_TTL_SECS, async {
        let totals = state.content.totals().await?;
        let total_users = state.users.count().await?;

        Ok(PlatformStats {
            total_content: totals.count,
            total_users,
            total_views: totals.views,
            total_likes: totals.likes,
            timestamp: Utc::now(),
        })
    })
}

pub async fn content_stats(state: &AppState) -> AppResult<ContentStats> {
    cached!(
        state.cache.as_ref(),
        CacheKey::ContentStats,
        STATS_TTL_SECS,
        state.content.breakdown()
    )
}
