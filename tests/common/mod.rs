#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::Query,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

pub type Seen<T> = Arc<Mutex<Vec<T>>>;

/// Serves `router` on an ephemeral local port and returns its base URL
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", address)
}

/// A base URL nothing is listening on
pub async fn unreachable_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", address)
}

/// Backend that answers every endpoint the way the demo recommendation
/// server does, recording what it was asked
#[derive(Clone, Default)]
pub struct HappyBackend {
    pub recommendation_queries: Seen<HashMap<String, String>>,
    pub tracked_views: Seen<Value>,
    pub history_queries: Seen<HashMap<String, String>>,
}

impl HappyBackend {
    pub fn router(&self) -> Router {
        let recommendation_queries = self.recommendation_queries.clone();
        let tracked_views = self.tracked_views.clone();
        let history_queries = self.history_queries.clone();

        Router::new()
            .route(
                "/api/recommendations",
                get(move |Query(params): Query<HashMap<String, String>>| {
                    let seen = recommendation_queries.clone();
                    async move {
                        let page: u32 = params
                            .get("page")
                            .and_then(|p| p.parse().ok())
                            .unwrap_or(1);
                        seen.lock().unwrap().push(params);
                        Json(json!({
                            "results": [
                                {
                                    "id": "TcMBFSGVi1c",
                                    "title": "Related One",
                                    "link": "https://www.youtube.com/watch?v=TcMBFSGVi1c",
                                    "thumbnail": "https://img.youtube.com/vi/TcMBFSGVi1c/mqdefault.jpg",
                                    "channel": "YouTube Creator",
                                    "views": "42K views",
                                    "timestamp": "3 days ago"
                                },
                                {
                                    "id": "8jPQjjsBbIc",
                                    "title": "Related Two",
                                    "channel": "Supabase"
                                }
                            ],
                            "pagination": { "page": page, "limit": 8, "total_results": 2 }
                        }))
                    }
                }),
            )
            .route(
                "/api/track-view",
                post(move |Json(body): Json<Value>| {
                    let seen = tracked_views.clone();
                    async move {
                        seen.lock().unwrap().push(body);
                        Json(json!({ "success": true }))
                    }
                }),
            )
            .route(
                "/api/watch-history",
                get(move |Query(params): Query<HashMap<String, String>>| {
                    let seen = history_queries.clone();
                    async move {
                        seen.lock().unwrap().push(params);
                        Json(json!([
                            {
                                "id": "dQw4w9WgXcQ",
                                "title": "Watched",
                                "watched_at": "2024-03-05T14:07:09.123456"
                            }
                        ]))
                    }
                }),
            )
    }
}

/// Backend that fails every call with a server error
pub fn failing_router() -> Router {
    async fn boom() -> (StatusCode, Json<Value>) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "boom" })),
        )
    }

    Router::new()
        .route("/api/recommendations", get(boom))
        .route("/api/track-view", post(boom))
        .route("/api/watch-history", get(boom))
}
