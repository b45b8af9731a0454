/// Read-through caching over an optional [`Cache`](crate::db::Cache).
///
/// With no cache configured the block simply runs. Otherwise a hit is returned
/// as-is; on a miss (or a failed cache read, which is logged) the block runs
/// and its value is queued for a background write.
///
/// # Arguments
/// * `$cache`: an `Option<&Cache>`
/// * `$key`: the [`CacheKey`](crate::db::CacheKey) to read and write
/// * `$ttl`: time-to-live in seconds
/// * `$block`: a future producing `AppResult<T>`, awaited on a miss
///
/// # Example
/// ```rust,ignore
/// let trending = cached!(state.cache.as_ref(), CacheKey::Trending(10), 60, async {
///     state.content.trending(10).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache {
            Some(cache) => match cache.get_from_cache(&key).await {
                Ok(Some(hit)) => Ok(hit),
                result => {
                    if let Err(e) = result {
                        tracing::warn!(error = %e, key = %key, "Cache read failed");
                    }
                    match $block.await {
                        Ok(value) => {
                            cache.set_in_background(&key, &value, $ttl);
                            Ok(value)
                        }
                        Err(e) => Err(e),
                    }
                }
            },
            None => $block.await,
        }
    }};
}
