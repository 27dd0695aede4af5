use std::sync::{Arc, Mutex};

use serde::Serialize;

/// Client-side routes the feed can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    #[serde(rename = "/signin")]
    SignIn,
    #[serde(rename = "/home")]
    Home,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/signin",
            Route::Home => "/home",
        }
    }
}

/// Receives navigation intents
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that remembers every intent
///
/// The HTTP layer reports the latest one so the renderer can follow it.
#[derive(Clone, Default)]
pub struct RouteLog {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RouteLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Route> {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .copied()
    }

    pub fn history(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Navigator for RouteLog {
    fn navigate(&self, route: Route) {
        tracing::info!(route = route.path(), "Navigating");
        self.routes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(route);
    }
}
