/// Client for the recommendation backend
///
/// Endpoints (relative to the configured base URL):
/// 1. Recommendations: GET /api/recommendations?video_id=&limit=&page=
/// 2. View tracking: POST /api/track-view with `{user_id, video}`
/// 3. Watch history: GET /api/watch-history?user_id=&limit=
///
/// The backend is a non-critical dependency. Every public method swallows
/// failures after logging them and returns a value the feed can render.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Pagination, RecommendationPage, VideoRecord, WatchHistoryEntry},
    services::RecommendationBackend,
};

/// Watch history entries requested when no limit is configured
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

const RECOMMENDATIONS_PATH: &str = "/api/recommendations";
const TRACK_VIEW_PATH: &str = "/api/track-view";
const WATCH_HISTORY_PATH: &str = "/api/watch-history";

#[derive(Serialize)]
struct TrackViewRequest<'a> {
    user_id: &'a str,
    video: &'a VideoRecord,
}

#[derive(Clone)]
pub struct RecommendationClient {
    http_client: HttpClient,
    api_url: String,
    /// Applies to the recommendation request only
    timeout: Duration,
}

impl RecommendationClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        let api_url: String = api_url.into();
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.recommendation_api_url.clone(), config.request_timeout())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Recommendations related to `seed_video_id`, or general ones without a seed
    ///
    /// Never fails; any error yields an empty first page.
    pub async fn get_recommended_videos(
        &self,
        seed_video_id: Option<&str>,
        limit: u32,
        page: u32,
    ) -> RecommendationPage {
        match self.fetch_recommendations(seed_video_id, limit, page).await {
            Ok(recommendations) => {
                tracing::info!(
                    seed_video_id = ?seed_video_id,
                    results = recommendations.results.len(),
                    page = recommendations.pagination.page,
                    "Recommendations fetched"
                );
                recommendations
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    seed_video_id = ?seed_video_id,
                    "Error fetching recommendations"
                );
                RecommendationPage::empty(limit)
            }
        }
    }

    /// Returns `true` when the backend accepted the view
    pub async fn track_video_view(&self, user_id: &str, video: &VideoRecord) -> bool {
        match self.post_view(user_id, video).await {
            Ok(()) => {
                tracing::debug!(user_id = %user_id, video_id = ?video.id, "Video view tracked");
                true
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    user_id = %user_id,
                    "Error tracking video view"
                );
                false
            }
        }
    }

    /// Most recent videos watched by `user_id`; empty on any failure
    pub async fn get_user_watch_history(&self, user_id: &str, limit: u32) -> Vec<VideoRecord> {
        match self.fetch_watch_history(user_id, limit).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    user_id = %user_id,
                    "Error fetching watch history"
                );
                Vec::new()
            }
        }
    }

    /// Watch history with the owning user and the recorded view time attached
    pub async fn get_watch_history_entries(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Vec<WatchHistoryEntry> {
        self.get_user_watch_history(user_id, limit)
            .await
            .into_iter()
            .map(|video| WatchHistoryEntry::from_record(user_id, video))
            .collect()
    }

    async fn fetch_recommendations(
        &self,
        seed_video_id: Option<&str>,
        limit: u32,
        page: u32,
    ) -> AppResult<RecommendationPage> {
        let url = format!("{}{}", self.api_url, RECOMMENDATIONS_PATH);

        let mut query: Vec<(&str, String)> = Vec::with_capacity(3);
        if let Some(video_id) = seed_video_id.filter(|id| !id.is_empty()) {
            query.push(("video_id", video_id.to_string()));
        }
        query.push(("limit", limit.to_string()));
        query.push(("page", page.to_string()));

        // Dropping the future on timeout cancels the in-flight request
        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::NonSuccessStatus { status, body });
        }

        let body: Value = response.json().await?;
        normalize_recommendations(body, limit)
    }

    async fn post_view(&self, user_id: &str, video: &VideoRecord) -> AppResult<()> {
        let url = format!("{}{}", self.api_url, TRACK_VIEW_PATH);

        let response = self
            .http_client
            .post(&url)
            .json(&TrackViewRequest { user_id, video })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::NonSuccessStatus { status, body });
        }

        Ok(())
    }

    async fn fetch_watch_history(&self, user_id: &str, limit: u32) -> AppResult<Vec<VideoRecord>> {
        let url = format!("{}{}", self.api_url, WATCH_HISTORY_PATH);

        let response = self
            .http_client
            .get(&url)
            .query(&[("user_id", user_id.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::NonSuccessStatus { status, body });
        }

        let response_text = response.text().await?;
        let body: Value = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(response = %response_text, "Unreadable watch history response");
            AppError::from(e)
        })?;

        match body {
            Value::Array(items) => Ok(video_records(items)),
            other => Err(AppError::MalformedResponse(format!(
                "expected a list of watched videos, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Brings a recommendations body into page shape
///
/// An object with a `results` array is kept as the page, along with any other
/// keys it carries. Pagination fields that are missing or unreadable are
/// derived from the request. A bare array becomes the first page. Anything
/// else is malformed. Individual records that cannot be read are skipped.
pub fn normalize_recommendations(body: Value, limit: u32) -> AppResult<RecommendationPage> {
    match body {
        Value::Object(mut object) if object.get("results").is_some_and(Value::is_array) => {
            let results = match object.remove("results") {
                Some(Value::Array(items)) => video_records(items),
                _ => Vec::new(),
            };

            let fields = match object.remove("pagination") {
                Some(Value::Null) | None => PaginationFields::default(),
                Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "Unreadable pagination, deriving it");
                    PaginationFields::default()
                }),
            };
            let pagination = Pagination {
                page: fields.page.unwrap_or(1),
                limit: fields.limit.unwrap_or(limit),
                total_results: fields.total_results.unwrap_or(results.len() as u64),
            };

            Ok(RecommendationPage {
                results,
                pagination,
                extra: object,
            })
        }
        Value::Array(items) => Ok(RecommendationPage::first_page(video_records(items), limit)),
        other => Err(AppError::MalformedResponse(format!(
            "expected a results object or a list, got {}",
            json_kind(&other)
        ))),
    }
}

/// Pagination as the backend may send it, every field optional
#[derive(Debug, Default, Deserialize)]
struct PaginationFields {
    #[serde(default, deserialize_with = "lenient_count")]
    page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    limit: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    total_results: Option<u64>,
}

/// A non-negative count sent as a number or a numeric string
fn lenient_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(count.and_then(|n| T::try_from(n).ok()))
}

/// Reads each record on its own so one bad entry does not cost the rest
fn video_records(items: Vec<Value>) -> Vec<VideoRecord> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<VideoRecord>(item) {
            Ok(video) => Some(video),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable video record");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[async_trait::async_trait]
impl RecommendationBackend for RecommendationClient {
    async fn recommended_videos(
        &self,
        seed_video_id: Option<String>,
        limit: u32,
        page: u32,
    ) -> RecommendationPage {
        self.get_recommended_videos(seed_video_id.as_deref(), limit, page)
            .await
    }

    async fn track_view(&self, user_id: &str, video: &VideoRecord) -> bool {
        self.track_video_view(user_id, video).await
    }

    async fn watch_history(&self, user_id: &str, limit: u32) -> Vec<VideoRecord> {
        self.get_user_watch_history(user_id, limit).await
    }
}
