use std::sync::LazyLock;

use regex::Regex;

use crate::models::VideoRecord;

/// External id used for numeric ids missing from [`SAMPLE_VIDEO_IDS`]
pub const DEFAULT_EXTERNAL_ID: &str = "dQw4w9WgXcQ";

/// External ids standing in for the numeric ids of the sample feed
const SAMPLE_VIDEO_IDS: [(i64, &str); 8] = [
    (1, "dQw4w9WgXcQ"),
    (2, "jNQXAC9IVRw"),
    (3, "TcMBFSGVi1c"),
    (4, "8jPQjjsBbIc"),
    (5, "c0bsKc4tiuY"),
    (6, "TNhaISOUy6Q"),
    (7, "K74l26pE4YA"),
    (8, "zuRd_Eneuk8"),
];

static WATCH_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([^&?#\s]+)").expect("valid link pattern")
});

/// Canonical external video id for `video`, if one can be derived
///
/// Tried in order: a string id of at least 11 characters, an id extracted from
/// a watch or short link, then the sample table for numeric ids (with a fixed
/// default on a miss). `None` means the caller should ask for general
/// recommendations.
pub fn resolve_external_id(video: &VideoRecord) -> Option<String> {
    if let Some(id) = video.external_like_id() {
        return Some(id.to_string());
    }

    if let Some(id) = video.link.as_deref().and_then(id_from_link) {
        return Some(id.to_string());
    }

    let number = video.id.as_ref()?.as_number()?;
    let external_id = number
        .as_i64()
        .and_then(sample_external_id)
        .unwrap_or(DEFAULT_EXTERNAL_ID);

    Some(external_id.to_string())
}

fn id_from_link(link: &str) -> Option<&str> {
    WATCH_LINK
        .captures(link)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

fn sample_external_id(id: i64) -> Option<&'static str> {
    SAMPLE_VIDEO_IDS
        .iter()
        .find(|(sample_id, _)| *sample_id == id)
        .map(|(_, external_id)| *external_id)
}
