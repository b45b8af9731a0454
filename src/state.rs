use std::sync::Arc;
use std::time::Instant;

use crate::{
    config::Config,
    db::{Cache, ContentStore, UserStore},
    services::{ClassificationPolicy, RandomClassifier, TokenService},
};

/// Shared application state handed to every handler
pub struct AppState {
    pub content: Arc<dyn ContentStore>,
    pub users: Arc<dyn UserStore>,
    pub classifier: Arc<dyn ClassificationPolicy>,
    pub tokens: TokenService,
    pub cache: Option<Cache>,
    /// Interest labels assumed for every authenticated user
    pub default_interests: Vec<String>,
    pub started_at: Instant,
}

impl AppState {
    /// Builds state around the given stores, without a cache and with the
    /// random classifier
    pub fn new(
        config: &Config,
        content: Arc<dyn ContentStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            content,
            users,
            classifier: Arc::new(RandomClassifier),
            tokens: TokenService::new(&config.jwt_secret, config.jwt_ttl_days),
            cache: None,
            default_interests: config.default_interests.clone(),
            started_at: Instant::now(),
        }
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ClassificationPolicy>) -> Self {
        self.classifier = classifier;
        self
    }
}
