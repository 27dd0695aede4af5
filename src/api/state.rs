use std::sync::Arc;

use crate::{
    config::Config,
    feed::{FeedController, FeedSettings},
    services::{InMemoryAuth, RecommendationBackend, RecommendationClient, RouteLog, User},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: FeedController,
    pub auth: InMemoryAuth,
    pub routes: RouteLog,
}

impl AppState {
    /// Wires a feed controller around `backend` and a demo session store
    pub fn new(
        backend: Arc<dyn RecommendationBackend>,
        auth: InMemoryAuth,
        settings: FeedSettings,
    ) -> Self {
        let routes = RouteLog::new();
        let controller = FeedController::new(
            backend,
            Arc::new(auth.clone()),
            Arc::new(routes.clone()),
            settings,
        );

        Self {
            controller,
            auth,
            routes,
        }
    }

    /// State backed by the HTTP recommendation client described by `config`
    pub fn from_config(config: &Config) -> Self {
        let auth = match &config.session_user_id {
            Some(user_id) => InMemoryAuth::with_user(User::new(user_id.clone())),
            None => InMemoryAuth::new(),
        };

        Self::new(
            Arc::new(RecommendationClient::from_config(config)),
            auth,
            FeedSettings::from_config(config),
        )
    }
}
