use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::sync::{mpsc, RwLock};

use crate::{
    config::Config,
    feed::{
        player::PlayerEvent,
        state::{FeedEvent, FeedState},
    },
    models::{VideoRecord, WatchHistoryEntry},
    services::{
        identity::resolve_external_id, recommendation_client::DEFAULT_HISTORY_LIMIT, AuthEvent,
        AuthProvider, Navigator, RecommendationBackend, Route, Subscription, User,
    },
};

/// Knobs of the feed behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSettings {
    pub page_size: u32,
    pub history_limit: u32,
    /// Cosmetic delay between a click/back and the selection change
    pub transition_delay: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: 8,
            history_limit: DEFAULT_HISTORY_LIMIT,
            transition_delay: Duration::from_millis(300),
        }
    }
}

impl FeedSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.feed_page_size,
            history_limit: config.history_limit,
            transition_delay: config.transition_delay(),
        }
    }
}

/// Drives [`FeedState`] from auth notifications and user intents
///
/// All mutations go through [`FeedState::apply`] under the state lock, one
/// event at a time. Backend calls run without the lock held.
#[derive(Clone)]
pub struct FeedController {
    state: Arc<RwLock<FeedState>>,
    backend: Arc<dyn RecommendationBackend>,
    auth: Arc<dyn AuthProvider>,
    navigator: Arc<dyn Navigator>,
    settings: FeedSettings,
    subscription: Arc<Mutex<Option<Subscription>>>,
}

impl FeedController {
    pub fn new(
        backend: Arc<dyn RecommendationBackend>,
        auth: Arc<dyn AuthProvider>,
        navigator: Arc<dyn Navigator>,
        settings: FeedSettings,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(FeedState::new())),
            backend,
            auth,
            navigator,
            settings,
            subscription: Arc::new(Mutex::new(None)),
        }
    }

    /// A copy of the current state
    pub async fn snapshot(&self) -> FeedState {
        self.state.read().await.clone()
    }

    /// Subscribe to auth notifications and load the feed for the current user
    ///
    /// Without a session the feed is reset and the user is sent to sign in.
    pub async fn mount(&self) {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let subscription = self.auth.subscribe(Box::new(move |event| {
            if event_tx.send(event).is_err() {
                tracing::debug!("Auth event arrived after the feed stopped listening");
            }
        }));

        if let Some(previous) = self.lock_subscription().replace(subscription) {
            previous.cancel();
        }

        // Ends once the subscription is cancelled and the sender is dropped
        let controller = self.clone();
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                controller.handle_auth_event(event).await;
            }
        });

        match self.auth.current_user().await {
            Some(user) => self.load_user_data(user).await,
            None => {
                tracing::info!("No active session, redirecting to sign in");
                self.apply(FeedEvent::SessionMissing).await;
                self.navigator.navigate(Route::SignIn);
            }
        }
    }

    /// Stop listening for auth notifications
    ///
    /// The subscription is cancelled on the first call only.
    pub fn unmount(&self) {
        if let Some(subscription) = self.lock_subscription().take() {
            subscription.cancel();
            tracing::info!("Feed unmounted");
        }
    }

    /// Show `video` after the transition delay and refresh the feed around it
    pub async fn select_video(&self, video: VideoRecord) {
        let (transition, user) = {
            let mut state = self.state.write().await;
            state.apply(FeedEvent::TransitionStarted);
            (state.transition_generation(), state.user.clone())
        };

        self.spawn_transition(FeedEvent::VideoSelected {
            transition,
            video: video.clone(),
        });

        if let Some(user) = user {
            self.spawn_refresh(user, video);
        }
    }

    /// Return to the grid after the transition delay
    pub async fn go_back(&self) {
        let transition = {
            let mut state = self.state.write().await;
            state.apply(FeedEvent::TransitionStarted);
            state.transition_generation()
        };

        self.spawn_transition(FeedEvent::SelectionCleared { transition });
    }

    pub async fn player_event(&self, event: PlayerEvent) {
        self.apply(FeedEvent::Player(event)).await;
    }

    /// Ask the identity provider to end the session
    ///
    /// The reset and redirect follow from the resulting sign-out notification.
    pub async fn sign_out(&self) -> crate::error::AppResult<()> {
        self.auth.sign_out().await
    }

    async fn handle_auth_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedOut => {
                self.apply(FeedEvent::SignedOut).await;
                self.navigator.navigate(Route::SignIn);
            }
            AuthEvent::SignedIn(user) => {
                let current = self.state.read().await.user.as_ref().map(|u| u.id.clone());
                if current.as_deref() == Some(user.id.as_str()) {
                    return;
                }
                self.navigator.navigate(Route::Home);
                self.load_user_data(user).await;
            }
        }
    }

    /// First page of general recommendations and the watch history, fetched
    /// concurrently
    async fn load_user_data(&self, user: User) {
        let (recommendations_generation, history_generation) = {
            let mut state = self.state.write().await;
            state.apply(FeedEvent::SessionStarted(user.clone()));
            (state.recommendations_generation(), state.history_generation())
        };

        tracing::info!(user_id = %user.id, "Loading feed");

        let backend = self.backend.clone();
        let user_id = user.id.clone();
        let history_limit = self.settings.history_limit;
        let history_task =
            tokio::spawn(async move { backend.watch_history(&user_id, history_limit).await });

        let backend = self.backend.clone();
        let page_size = self.settings.page_size;
        let recommendations_task =
            tokio::spawn(async move { backend.recommended_videos(None, page_size, 1).await });

        let (history, recommendations) = tokio::join!(history_task, recommendations_task);

        let history_event = match history {
            Ok(records) => FeedEvent::HistoryLoaded {
                generation: history_generation,
                entries: history_entries(&user.id, records),
            },
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                FeedEvent::HistoryFailed {
                    generation: history_generation,
                }
            }
        };

        let recommendations_event = match recommendations {
            Ok(page) => FeedEvent::RecommendationsLoaded {
                generation: recommendations_generation,
                page,
            },
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                FeedEvent::RecommendationsFailed {
                    generation: recommendations_generation,
                }
            }
        };

        let mut state = self.state.write().await;
        state.apply(history_event);
        state.apply(recommendations_event);
        tracing::info!(
            user_id = %user.id,
            recommendations = state.recommendations.videos.len(),
            history = state.history.entries.len(),
            "Feed loaded"
        );
    }

    fn spawn_transition(&self, event: FeedEvent) {
        let state = self.state.clone();
        let delay = self.settings.transition_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.write().await.apply(event);
        });
    }

    /// Runs [`Self::refresh_after_view`] in the background; a panic there
    /// leaves the fallback feed on screen
    fn spawn_refresh(&self, user: User, video: VideoRecord) {
        let controller = self.clone();
        let task = tokio::spawn(async move { controller.refresh_after_view(&user, &video).await });

        let controller = self.clone();
        tokio::spawn(async move {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Refresh after video selection failed");
                controller.recover().await;
            }
        });
    }

    /// Track the view, then refresh history, then ask for recommendations
    /// seeded by the selected video
    async fn refresh_after_view(&self, user: &User, video: &VideoRecord) {
        if !self.backend.track_view(&user.id, video).await {
            tracing::warn!(user_id = %user.id, video_id = ?video.id, "View was not recorded");
        }

        let history_generation = {
            let mut state = self.state.write().await;
            state.apply(FeedEvent::HistoryRequested);
            state.history_generation()
        };
        let records = self
            .backend
            .watch_history(&user.id, self.settings.history_limit)
            .await;
        self.apply(FeedEvent::HistoryLoaded {
            generation: history_generation,
            entries: history_entries(&user.id, records),
        })
        .await;

        let seed = resolve_external_id(video);
        if seed.is_none() {
            tracing::debug!(video_id = ?video.id, "No external id, requesting general recommendations");
        }

        let recommendations_generation = {
            let mut state = self.state.write().await;
            state.apply(FeedEvent::RecommendationsRequested);
            state.recommendations_generation()
        };
        let page = self
            .backend
            .recommended_videos(seed, self.settings.page_size, 1)
            .await;
        self.apply(FeedEvent::RecommendationsLoaded {
            generation: recommendations_generation,
            page,
        })
        .await;
    }

    async fn recover(&self) {
        let mut state = self.state.write().await;
        if state.recommendations.loading {
            let generation = state.recommendations_generation();
            state.apply(FeedEvent::RecommendationsFailed { generation });
        }
        if state.history.loading {
            let generation = state.history_generation();
            state.apply(FeedEvent::HistoryFailed { generation });
        }
    }

    async fn apply(&self, event: FeedEvent) {
        self.state.write().await.apply(event);
    }

    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn history_entries(user_id: &str, records: Vec<VideoRecord>) -> Vec<WatchHistoryEntry> {
    records
        .into_iter()
        .map(|video| WatchHistoryEntry::from_record(user_id, video))
        .collect()
}
