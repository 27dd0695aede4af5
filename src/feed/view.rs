use serde::Serialize;

use crate::{
    feed::{
        player::{PlayerEmbed, PlayerStatus},
        state::{FeedSource, FeedState, Phase},
        thumbnail::thumbnail_candidates,
    },
    models::{VideoId, VideoRecord},
    services::{fallback::fallback_feed, identity::resolve_external_id, Route},
};

/// Cards shown under the player and in the recently watched row
pub const SIDE_ROW_LEN: usize = 4;

/// A video with every display field resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoCard {
    pub id: Option<VideoId>,
    pub title: String,
    pub channel: String,
    pub views: String,
    pub timestamp: String,
    /// Try in order, moving on when an image fails to load
    pub thumbnails: Vec<String>,
}

impl From<&VideoRecord> for VideoCard {
    fn from(video: &VideoRecord) -> Self {
        Self {
            id: video.id.clone(),
            title: video.display_title().to_string(),
            channel: video.display_channel().to_string(),
            views: video.display_views().to_string(),
            timestamp: video.display_timestamp().to_string(),
            thumbnails: thumbnail_candidates(video),
        }
    }
}

/// What the feed page renders for a given state
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum FeedView {
    Loading,
    Redirect {
        to: Route,
    },
    Grid {
        recommendations: Vec<VideoCard>,
        recommendations_loading: bool,
        source: FeedSource,
        recently_watched: Vec<VideoCard>,
        history_loading: bool,
    },
    Watching {
        video: VideoCard,
        /// `None` when no external id can be derived for the video
        embed: Option<PlayerEmbed>,
        player: PlayerStatus,
        more: Vec<VideoCard>,
        recommendations_loading: bool,
    },
}

impl FeedState {
    pub fn view(&self) -> FeedView {
        match self.phase {
            Phase::Uninitialized => return FeedView::Loading,
            Phase::SignedOut => return FeedView::Redirect { to: Route::SignIn },
            Phase::Loading | Phase::Ready => {}
        }

        if let Some(video) = self.selection.video() {
            return FeedView::Watching {
                video: VideoCard::from(video),
                embed: resolve_external_id(video).map(|id| PlayerEmbed::new(&id)),
                player: self.player,
                more: self
                    .recommendations
                    .videos
                    .iter()
                    .take(SIDE_ROW_LEN)
                    .map(VideoCard::from)
                    .collect(),
                recommendations_loading: self.recommendations.loading,
            };
        }

        let (recommendations, source) = if self.recommendations.videos.is_empty() {
            (cards(&fallback_feed()), FeedSource::Fallback)
        } else {
            (cards(&self.recommendations.videos), self.recommendations.source)
        };

        FeedView::Grid {
            recommendations,
            recommendations_loading: self.recommendations.loading,
            source,
            recently_watched: self
                .history
                .entries
                .iter()
                .take(SIDE_ROW_LEN)
                .map(|entry| VideoCard::from(&entry.video))
                .collect(),
            history_loading: self.history.loading,
        }
    }
}

fn cards(videos: &[VideoRecord]) -> Vec<VideoCard> {
    videos.iter().map(VideoCard::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        feed::state::FeedEvent,
        models::{RecommendationPage, WatchHistoryEntry},
        services::User,
    };
    use serde_json::json;

    fn video(value: serde_json::Value) -> VideoRecord {
        serde_json::from_value(value).unwrap()
    }

    fn ready_with(videos: Vec<VideoRecord>, history: Vec<VideoRecord>) -> FeedState {
        let mut state = FeedState::new();
        state.apply(FeedEvent::SessionStarted(User::new("user-1")));
        let recs = state.recommendations_generation();
        let hist = state.history_generation();
        state.apply(FeedEvent::RecommendationsLoaded {
            generation: recs,
            page: RecommendationPage::first_page(videos, 8),
        });
        state.apply(FeedEvent::HistoryLoaded {
            generation: hist,
            entries: history
                .into_iter()
                .map(|v| WatchHistoryEntry::from_record("user-1", v))
                .collect(),
        });
        state
    }

    #[test]
    fn test_uninitialized_renders_loading() {
        assert!(matches!(FeedState::new().view(), FeedView::Loading));
    }

    #[test]
    fn test_signed_out_redirects_to_signin() {
        let mut state = FeedState::new();
        state.apply(FeedEvent::SessionMissing);
        assert!(matches!(
            state.view(),
            FeedView::Redirect { to: Route::SignIn }
        ));
    }

    #[test]
    fn test_grid_while_loading_shows_fallback_cards() {
        let mut state = FeedState::new();
        state.apply(FeedEvent::SessionStarted(User::new("user-1")));

        match state.view() {
            FeedView::Grid {
                recommendations,
                recommendations_loading,
                source,
                ..
            } => {
                assert_eq!(recommendations.len(), 8);
                assert!(recommendations_loading);
                assert_eq!(source, FeedSource::Fallback);
            }
            other => panic!("expected grid, got {:?}", other),
        }
    }

    #[test]
    fn test_grid_limits_recently_watched_row() {
        let history: Vec<VideoRecord> = (0..6)
            .map(|i| video(json!({ "id": format!("history{:04}", i) })))
            .collect();
        let state = ready_with(vec![video(json!({ "id": "aaaaaaaaaaa" }))], history);

        match state.view() {
            FeedView::Grid {
                recommendations,
                recently_watched,
                source,
                ..
            } => {
                assert_eq!(recommendations.len(), 1);
                assert_eq!(source, FeedSource::Backend);
                assert_eq!(recently_watched.len(), SIDE_ROW_LEN);
            }
            other => panic!("expected grid, got {:?}", other),
        }
    }

    #[test]
    fn test_watching_embeds_resolved_id_and_limits_more_row() {
        let recs: Vec<VideoRecord> = (0..8)
            .map(|i| video(json!({ "id": format!("related{:04}", i) })))
            .collect();
        let mut state = ready_with(recs, Vec::new());
        state.apply(FeedEvent::TransitionStarted);
        let transition = state.transition_generation();
        state.apply(FeedEvent::VideoSelected {
            transition,
            video: video(json!({ "id": 3, "title": "Sample" })),
        });

        match state.view() {
            FeedView::Watching {
                video, embed, more, ..
            } => {
                assert_eq!(video.title, "Sample");
                assert_eq!(embed.unwrap().video_id, "TcMBFSGVi1c");
                assert_eq!(more.len(), SIDE_ROW_LEN);
            }
            other => panic!("expected watching, got {:?}", other),
        }
    }

    #[test]
    fn test_card_fills_missing_fields() {
        let card = VideoCard::from(&video(json!({ "id": "dQw4w9WgXcQ" })));
        assert_eq!(card.title, "Untitled Video");
        assert_eq!(card.channel, "Unknown Channel");
        assert_eq!(card.views, "0 views");
        assert_eq!(card.timestamp, "Unknown time");
        assert_eq!(card.thumbnails.len(), 3);
    }

    #[test]
    fn test_view_serializes_with_screen_tag() {
        let mut state = FeedState::new();
        state.apply(FeedEvent::SessionMissing);
        let value = serde_json::to_value(state.view()).unwrap();
        assert_eq!(value, json!({ "screen": "redirect", "to": "/signin" }));
    }
}
