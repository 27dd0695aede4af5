use serde::Serialize;

use crate::{
    feed::player::{PlayerEvent, PlayerStatus},
    models::{RecommendationPage, VideoRecord, WatchHistoryEntry},
    services::{fallback::fallback_feed, User},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready,
    SignedOut,
}

/// Where the videos of the recommendations panel came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    Backend,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsPanel {
    pub videos: Vec<VideoRecord>,
    pub loading: bool,
    pub source: FeedSource,
    #[serde(skip)]
    generation: u64,
}

impl Default for RecommendationsPanel {
    fn default() -> Self {
        Self {
            videos: Vec::new(),
            loading: false,
            source: FeedSource::Fallback,
            generation: 0,
        }
    }
}

impl RecommendationsPanel {
    fn begin(&mut self) -> u64 {
        self.loading = true;
        self.generation += 1;
        self.generation
    }

    fn show_fallback(&mut self) {
        self.videos = fallback_feed();
        self.source = FeedSource::Fallback;
        self.loading = false;
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryPanel {
    pub entries: Vec<WatchHistoryEntry>,
    pub loading: bool,
    #[serde(skip)]
    generation: u64,
}

impl HistoryPanel {
    fn begin(&mut self) -> u64 {
        self.loading = true;
        self.generation += 1;
        self.generation
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "video", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Selected(VideoRecord),
}

impl Selection {
    pub fn video(&self) -> Option<&VideoRecord> {
        match self {
            Selection::Selected(video) => Some(video),
            Selection::None => None,
        }
    }
}

/// Everything that changes the feed
///
/// Completion events carry the generation handed out when the matching
/// request or transition started; an event from a superseded generation is
/// dropped.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    SessionStarted(User),
    SessionMissing,
    SignedOut,
    RecommendationsRequested,
    RecommendationsLoaded {
        generation: u64,
        page: RecommendationPage,
    },
    RecommendationsFailed {
        generation: u64,
    },
    HistoryRequested,
    HistoryLoaded {
        generation: u64,
        entries: Vec<WatchHistoryEntry>,
    },
    HistoryFailed {
        generation: u64,
    },
    TransitionStarted,
    VideoSelected {
        transition: u64,
        video: VideoRecord,
    },
    SelectionCleared {
        transition: u64,
    },
    Player(PlayerEvent),
}

/// View state of the feed page
#[derive(Debug, Clone, Serialize)]
pub struct FeedState {
    pub phase: Phase,
    pub user: Option<User>,
    pub recommendations: RecommendationsPanel,
    pub history: HistoryPanel,
    pub selection: Selection,
    /// Set between a click/back and the moment the selection changes
    pub transitioning: bool,
    pub player: PlayerStatus,
    #[serde(skip)]
    transition: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
            user: None,
            recommendations: RecommendationsPanel::default(),
            history: HistoryPanel::default(),
            selection: Selection::None,
            transitioning: false,
            player: PlayerStatus::default(),
            transition: 0,
        }
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommendations_generation(&self) -> u64 {
        self.recommendations.generation
    }

    pub fn history_generation(&self) -> u64 {
        self.history.generation
    }

    pub fn transition_generation(&self) -> u64 {
        self.transition
    }

    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::SessionStarted(user) => {
                self.phase = Phase::Loading;
                self.user = Some(user);
                self.selection = Selection::None;
                self.recommendations.begin();
                self.history.begin();
                self.history.entries.clear();
            }
            FeedEvent::SessionMissing | FeedEvent::SignedOut => self.reset(),
            FeedEvent::RecommendationsRequested => {
                self.recommendations.begin();
            }
            FeedEvent::RecommendationsLoaded { generation, page } => {
                if !self.accepts_recommendations(generation) {
                    return;
                }
                if page.is_empty() {
                    tracing::info!("No recommendations returned, showing fallback feed");
                    self.recommendations.show_fallback();
                } else {
                    self.recommendations.videos = page.results;
                    self.recommendations.source = FeedSource::Backend;
                    self.recommendations.loading = false;
                }
                self.settle();
            }
            FeedEvent::RecommendationsFailed { generation } => {
                if !self.accepts_recommendations(generation) {
                    return;
                }
                self.recommendations.show_fallback();
                self.settle();
            }
            FeedEvent::HistoryRequested => {
                self.history.begin();
            }
            FeedEvent::HistoryLoaded {
                generation,
                entries,
            } => {
                if !self.accepts_history(generation) {
                    return;
                }
                self.history.entries = entries;
                self.history.loading = false;
                self.settle();
            }
            FeedEvent::HistoryFailed { generation } => {
                if !self.accepts_history(generation) {
                    return;
                }
                self.history.loading = false;
                self.settle();
            }
            FeedEvent::TransitionStarted => {
                self.transitioning = true;
                self.transition += 1;
            }
            FeedEvent::VideoSelected { transition, video } => {
                if transition != self.transition {
                    return;
                }
                self.selection = Selection::Selected(video);
                self.transitioning = false;
                self.player = PlayerStatus::default();
            }
            FeedEvent::SelectionCleared { transition } => {
                if transition != self.transition {
                    return;
                }
                self.selection = Selection::None;
                self.transitioning = false;
                self.player = PlayerStatus::default();
            }
            FeedEvent::Player(event) => {
                if self.selection.video().is_some() {
                    self.player.apply(event);
                }
            }
        }
    }

    /// Back to an empty signed-out feed; generations keep counting so that
    /// requests still in flight are dropped when they land
    fn reset(&mut self) {
        let recommendations_generation = self.recommendations.generation + 1;
        let history_generation = self.history.generation + 1;
        let transition = self.transition + 1;

        *self = FeedState {
            phase: Phase::SignedOut,
            transition,
            ..FeedState::default()
        };
        self.recommendations.generation = recommendations_generation;
        self.history.generation = history_generation;
    }

    fn accepts_recommendations(&self, generation: u64) -> bool {
        let current = self.user.is_some() && generation == self.recommendations.generation;
        if !current {
            tracing::debug!(
                generation = generation,
                current = self.recommendations.generation,
                "Dropping superseded recommendations"
            );
        }
        current
    }

    fn accepts_history(&self, generation: u64) -> bool {
        let current = self.user.is_some() && generation == self.history.generation;
        if !current {
            tracing::debug!(
                generation = generation,
                current = self.history.generation,
                "Dropping superseded watch history"
            );
        }
        current
    }

    fn settle(&mut self) {
        if self.phase == Phase::Loading && !self.recommendations.loading && !self.history.loading {
            self.phase = Phase::Ready;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VideoId;

    fn video(id: &str) -> VideoRecord {
        VideoRecord {
            id: Some(VideoId::from(id)),
            title: Some(format!("Video {}", id)),
            ..Default::default()
        }
    }

    fn started() -> FeedState {
        let mut state = FeedState::new();
        state.apply(FeedEvent::SessionStarted(User::new("user-1")));
        state
    }

    #[test]
    fn test_session_start_enters_loading_with_both_panels_busy() {
        let state = started();
        assert_eq!(state.phase, Phase::Loading);
        assert!(state.recommendations.loading);
        assert!(state.history.loading);
    }

    #[test]
    fn test_ready_only_after_both_panels_complete() {
        let mut state = started();
        let recs = state.recommendations_generation();
        let history = state.history_generation();

        state.apply(FeedEvent::RecommendationsLoaded {
            generation: recs,
            page: RecommendationPage::first_page(vec![video("aaaaaaaaaaa")], 8),
        });
        assert_eq!(state.phase, Phase::Loading);

        state.apply(FeedEvent::HistoryLoaded {
            generation: history,
            entries: Vec::new(),
        });
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.recommendations.source, FeedSource::Backend);
        assert_eq!(state.recommendations.videos.len(), 1);
    }

    #[test]
    fn test_empty_page_shows_fallback_feed() {
        let mut state = started();
        let generation = state.recommendations_generation();
        state.apply(FeedEvent::RecommendationsLoaded {
            generation,
            page: RecommendationPage::empty(8),
        });

        assert_eq!(state.recommendations.source, FeedSource::Fallback);
        assert_eq!(state.recommendations.videos, fallback_feed());
        assert!(!state.recommendations.loading);
    }

    #[test]
    fn test_failure_shows_fallback_and_clears_history_flag() {
        let mut state = started();
        let recs = state.recommendations_generation();
        let history = state.history_generation();

        state.apply(FeedEvent::RecommendationsFailed { generation: recs });
        state.apply(FeedEvent::HistoryFailed { generation: history });

        assert_eq!(state.recommendations.source, FeedSource::Fallback);
        assert!(!state.history.loading);
        assert_eq!(state.phase, Phase::Ready);
    }

    #[test]
    fn test_superseded_recommendations_are_dropped() {
        let mut state = started();
        let first = state.recommendations_generation();
        state.apply(FeedEvent::RecommendationsRequested);
        let second = state.recommendations_generation();

        state.apply(FeedEvent::RecommendationsLoaded {
            generation: second,
            page: RecommendationPage::first_page(vec![video("newerrrrrrr")], 8),
        });
        state.apply(FeedEvent::RecommendationsLoaded {
            generation: first,
            page: RecommendationPage::first_page(vec![video("olderrrrrrr")], 8),
        });

        assert_eq!(state.recommendations.videos, vec![video("newerrrrrrr")]);
    }

    #[test]
    fn test_only_latest_transition_lands() {
        let mut state = started();
        state.apply(FeedEvent::TransitionStarted);
        let first = state.transition_generation();
        state.apply(FeedEvent::TransitionStarted);
        let second = state.transition_generation();

        state.apply(FeedEvent::VideoSelected {
            transition: first,
            video: video("firstclick1"),
        });
        assert_eq!(state.selection, Selection::None);
        assert!(state.transitioning);

        state.apply(FeedEvent::VideoSelected {
            transition: second,
            video: video("secondclick"),
        });
        assert_eq!(state.selection.video(), Some(&video("secondclick")));
        assert!(!state.transitioning);
    }

    #[test]
    fn test_selection_cleared_resets_player() {
        let mut state = started();
        state.apply(FeedEvent::TransitionStarted);
        let transition = state.transition_generation();
        state.apply(FeedEvent::VideoSelected {
            transition,
            video: video("dQw4w9WgXcQ"),
        });
        state.apply(FeedEvent::Player(PlayerEvent::Error(2)));
        assert!(state.player.error);

        state.apply(FeedEvent::TransitionStarted);
        let transition = state.transition_generation();
        state.apply(FeedEvent::SelectionCleared { transition });

        assert_eq!(state.selection, Selection::None);
        assert_eq!(state.player, PlayerStatus::default());
    }

    #[test]
    fn test_player_events_ignored_without_selection() {
        let mut state = started();
        state.apply(FeedEvent::Player(PlayerEvent::Error(2)));
        assert!(!state.player.error);
    }

    #[test]
    fn test_sign_out_resets_and_drops_late_results() {
        let mut state = started();
        let generation = state.recommendations_generation();
        state.apply(FeedEvent::SignedOut);

        assert_eq!(state.phase, Phase::SignedOut);
        assert_eq!(state.user, None);

        state.apply(FeedEvent::RecommendationsLoaded {
            generation,
            page: RecommendationPage::first_page(vec![video("lateeeeeeee")], 8),
        });
        assert!(state.recommendations.videos.is_empty());
    }

    #[test]
    fn test_serialized_state_hides_generations() {
        let state = started();
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["phase"], "loading");
        assert_eq!(value["selection"]["state"], "none");
        assert!(value["recommendations"].get("generation").is_none());
        assert!(value.get("transition").is_none());
    }
}
