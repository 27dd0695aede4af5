use crate::models::{VideoId, VideoRecord};

struct SampleVideo {
    id: i64,
    title: &'static str,
    thumbnail: &'static str,
    channel: &'static str,
    views: &'static str,
    timestamp: &'static str,
}

const SAMPLE_VIDEOS: [SampleVideo; 8] = [
    SampleVideo {
        id: 1,
        title: "How to Build a React App in 10 Minutes",
        thumbnail: "https://i.imgur.com/8TePgDQ.jpg",
        channel: "CodeMaster",
        views: "120K views",
        timestamp: "2 days ago",
    },
    SampleVideo {
        id: 2,
        title: "Learn Tailwind CSS - Full Course for Beginners",
        thumbnail: "https://i.imgur.com/JR0SMXw.jpg",
        channel: "CSS Wizards",
        views: "85K views",
        timestamp: "1 week ago",
    },
    SampleVideo {
        id: 3,
        title: "JavaScript ES6 Features You Need to Know",
        thumbnail: "https://i.imgur.com/QNaImSS.jpg",
        channel: "JS Enthusiast",
        views: "230K views",
        timestamp: "3 weeks ago",
    },
    SampleVideo {
        id: 4,
        title: "Building a Full-Stack App with Supabase",
        thumbnail: "https://i.imgur.com/7YT3Nkl.jpg",
        channel: "Supabase Official",
        views: "45K views",
        timestamp: "5 days ago",
    },
    SampleVideo {
        id: 5,
        title: "UI/UX Design Principles for Developers",
        thumbnail: "https://i.imgur.com/KLDBTvv.jpg",
        channel: "Design Matters",
        views: "78K views",
        timestamp: "2 weeks ago",
    },
    SampleVideo {
        id: 6,
        title: "Advanced React Hooks Tutorial",
        thumbnail: "https://i.imgur.com/9YQjlfi.jpg",
        channel: "React Masters",
        views: "112K views",
        timestamp: "4 days ago",
    },
    SampleVideo {
        id: 7,
        title: "Building Responsive Layouts with Flexbox",
        thumbnail: "https://i.imgur.com/VXmFJDr.jpg",
        channel: "CSS Wizards",
        views: "67K views",
        timestamp: "1 month ago",
    },
    SampleVideo {
        id: 8,
        title: "State Management in React Applications",
        thumbnail: "https://i.imgur.com/QNaImSS.jpg",
        channel: "React Masters",
        views: "95K views",
        timestamp: "2 weeks ago",
    },
];

/// The static sample feed shown when the backend has nothing to offer
pub fn fallback_feed() -> Vec<VideoRecord> {
    SAMPLE_VIDEOS
        .iter()
        .map(|sample| VideoRecord {
            id: Some(VideoId::from(sample.id)),
            title: Some(sample.title.to_string()),
            thumbnail: Some(sample.thumbnail.to_string()),
            channel: Some(sample.channel.to_string()),
            views: Some(sample.views.to_string()),
            timestamp: Some(sample.timestamp.to_string()),
            ..Default::default()
        })
        .collect()
}
