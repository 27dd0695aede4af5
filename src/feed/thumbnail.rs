use crate::models::{VideoRecord, DEFAULT_THUMBNAIL};

const YTIMG_BASE_URL: &str = "https://i.ytimg.com/vi";

/// Thumbnail URLs a renderer tries in order, moving on each time an image
/// fails to load
///
/// Order: the record's own thumbnail, the platform's hq and mq stills when the
/// id is a full external id, then the default image. The list always ends with
/// the default image and holds no duplicates.
pub fn thumbnail_candidates(video: &VideoRecord) -> Vec<String> {
    let mut candidates: Vec<String> = video
        .thumbnail
        .iter()
        .filter(|url| !url.is_empty())
        .cloned()
        .collect();

    if let Some(id) = video.external_like_id() {
        candidates.push(format!("{}/{}/hqdefault.jpg", YTIMG_BASE_URL, id));
        candidates.push(format!("{}/{}/mqdefault.jpg", YTIMG_BASE_URL, id));
    }
    candidates.push(DEFAULT_THUMBNAIL.to_string());

    let mut seen = Vec::with_capacity(candidates.len());
    candidates.retain(|url| {
        if seen.contains(url) {
            false
        } else {
            seen.push(url.clone());
            true
        }
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn video(value: serde_json::Value) -> VideoRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_external_id_gets_platform_stills() {
        let v = video(json!({
            "id": "dQw4w9WgXcQ",
            "thumbnail": "https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg"
        }));

        assert_eq!(
            thumbnail_candidates(&v),
            vec![
                "https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg".to_string(),
                "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string(),
                "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg".to_string(),
                DEFAULT_THUMBNAIL.to_string(),
            ]
        );
    }

    #[test]
    fn test_sample_video_goes_straight_to_default() {
        let v = video(json!({ "id": 2, "thumbnail": "https://i.imgur.com/JR0SMXw.jpg" }));
        assert_eq!(
            thumbnail_candidates(&v),
            vec![
                "https://i.imgur.com/JR0SMXw.jpg".to_string(),
                DEFAULT_THUMBNAIL.to_string()
            ]
        );
    }

    #[test]
    fn test_missing_thumbnail_is_not_tried_twice() {
        let v = video(json!({ "id": 1 }));
        assert_eq!(thumbnail_candidates(&v), vec![DEFAULT_THUMBNAIL.to_string()]);
    }

    #[test]
    fn test_external_id_without_thumbnail_ends_at_default() {
        let v = video(json!({ "id": "dQw4w9WgXcQ" }));
        assert_eq!(
            thumbnail_candidates(&v),
            vec![
                "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string(),
                "https://i.ytimg.com/vi/dQw4w9WgXcQ/mqdefault.jpg".to_string(),
                DEFAULT_THUMBNAIL.to_string(),
            ]
        );
    }
}
