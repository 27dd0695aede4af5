use crate::models::{RecommendationPage, VideoRecord};

pub mod auth;
pub mod fallback;
pub mod identity;
pub mod navigation;
pub mod recommendation_client;

pub use auth::{AuthEvent, AuthProvider, InMemoryAuth, Subscription, User};
pub use identity::resolve_external_id;
pub use navigation::{Navigator, Route, RouteLog};
pub use recommendation_client::RecommendationClient;

/// Best-effort access to the recommendation backend
///
/// Implementations never fail: an unreachable or misbehaving backend yields an
/// empty page, `false` or an empty history, so callers always have something
/// to render.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationBackend: Send + Sync {
    /// Fetch a page of recommendations, related to `seed_video_id` when given
    async fn recommended_videos(
        &self,
        seed_video_id: Option<String>,
        limit: u32,
        page: u32,
    ) -> RecommendationPage;

    /// Record that `user_id` watched `video`
    async fn track_view(&self, user_id: &str, video: &VideoRecord) -> bool;

    /// Fetch the most recent videos watched by `user_id`
    async fn watch_history(&self, user_id: &str, limit: u32) -> Vec<VideoRecord>;
}
