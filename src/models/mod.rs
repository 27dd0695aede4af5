use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt::Display;

mod watch_history;

pub use watch_history::WatchHistoryEntry;

pub const DEFAULT_TITLE: &str = "Untitled Video";
pub const DEFAULT_THUMBNAIL: &str = "https://i.imgur.com/8TePgDQ.jpg";
pub const DEFAULT_CHANNEL: &str = "Unknown Channel";
pub const DEFAULT_VIEWS: &str = "0 views";
pub const DEFAULT_TIMESTAMP: &str = "Unknown time";

/// Identifier of a video record as the backend sends it
///
/// Sample videos carry small numeric ids, backend results carry the external
/// (YouTube) id as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VideoId {
    Number(Number),
    Text(String),
}

impl VideoId {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            VideoId::Text(id) => Some(id),
            VideoId::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            VideoId::Number(n) => Some(n),
            VideoId::Text(_) => None,
        }
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoId::Number(n) => write!(f, "{}", n),
            VideoId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for VideoId {
    fn from(n: i64) -> Self {
        VideoId::Number(n.into())
    }
}

impl From<&str> for VideoId {
    fn from(id: &str) -> Self {
        VideoId::Text(id.to_string())
    }
}

/// A video as exchanged with the recommendation backend
///
/// Every attribute is optional; the `display_*` accessors resolve missing
/// values to a renderable default. Fields this type does not know about are
/// kept in `extra` so the record is posted back to the backend unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<VideoId>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub channel: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub channel_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub views: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads any JSON scalar as text; arrays and objects count as missing
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<VideoId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => Some(VideoId::Text(id)),
        Value::Number(n) => Some(VideoId::Number(n)),
        _ => None,
    })
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl VideoRecord {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title).unwrap_or(DEFAULT_TITLE)
    }

    pub fn display_thumbnail(&self) -> &str {
        non_empty(&self.thumbnail).unwrap_or(DEFAULT_THUMBNAIL)
    }

    /// `channel_name` wins over `channel`
    pub fn display_channel(&self) -> &str {
        non_empty(&self.channel_name)
            .or_else(|| non_empty(&self.channel))
            .unwrap_or(DEFAULT_CHANNEL)
    }

    pub fn display_views(&self) -> &str {
        non_empty(&self.views).unwrap_or(DEFAULT_VIEWS)
    }

    pub fn display_timestamp(&self) -> &str {
        non_empty(&self.timestamp).unwrap_or(DEFAULT_TIMESTAMP)
    }

    /// The id as a string when it looks like a full external id
    pub fn external_like_id(&self) -> Option<&str> {
        self.id
            .as_ref()
            .and_then(VideoId::as_text)
            .filter(|id| id.chars().count() >= 11)
    }
}

/// Pagination metadata of a recommendation page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_results: u64,
}

/// One page of recommendations
///
/// `results` is always present, even when the request failed. Any other
/// top-level keys the backend sent are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPage {
    pub results: Vec<VideoRecord>,
    pub pagination: Pagination,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecommendationPage {
    /// The value returned for any failed request
    pub fn empty(limit: u32) -> Self {
        Self {
            results: Vec::new(),
            pagination: Pagination {
                page: 1,
                limit,
                total_results: 0,
            },
            extra: Map::new(),
        }
    }

    /// Wraps a bare list of videos as the first page
    pub fn first_page(results: Vec<VideoRecord>, limit: u32) -> Self {
        let total_results = results.len() as u64;
        Self {
            results,
            pagination: Pagination {
                page: 1,
                limit,
                total_results,
            },
            extra: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
