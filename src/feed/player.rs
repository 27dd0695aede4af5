use reqwest::Url;
use serde::{Deserialize, Serialize};

const EMBED_BASE_URL: &str = "https://www.youtube.com/embed/";

/// Player state codes reported by the embed
const STATE_PLAYING: i32 = 1;
const STATE_PAUSED: i32 = 2;
const STATE_BUFFERING: i32 = 3;

/// What the renderer needs to embed a player for the selected video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerEmbed {
    pub video_id: String,
    pub url: String,
}

impl PlayerEmbed {
    pub fn new(video_id: &str) -> Self {
        let url = Url::parse(EMBED_BASE_URL)
            .and_then(|base| base.join(video_id))
            .map(|mut url| {
                url.query_pairs_mut()
                    .append_pair("autoplay", "1")
                    .append_pair("modestbranding", "1")
                    .append_pair("rel", "0");
                url.to_string()
            })
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, video_id = %video_id, "Could not build embed URL");
                format!("{}{}", EMBED_BASE_URL, video_id)
            });

        Self {
            video_id: video_id.to_string(),
            url,
        }
    }
}

/// Notifications emitted by the embedded player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "code", rename_all = "snake_case")]
pub enum PlayerEvent {
    Ready,
    StateChange(i32),
    Error(i32),
}

/// Local loading/error display of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerStatus {
    pub loading: bool,
    pub error: bool,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self {
            loading: true,
            error: false,
        }
    }
}

impl PlayerStatus {
    pub fn apply(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Ready => self.loading = false,
            PlayerEvent::StateChange(STATE_BUFFERING) => self.loading = true,
            PlayerEvent::StateChange(STATE_PLAYING | STATE_PAUSED) => self.loading = false,
            PlayerEvent::StateChange(_) => {}
            PlayerEvent::Error(code) => {
                tracing::warn!(code = code, "Player reported an error");
                self.error = true;
                self.loading = false;
            }
        }
    }
}
