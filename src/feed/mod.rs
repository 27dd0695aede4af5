//! The feed page: its state, the controller that drives it and what it renders

pub mod controller;
pub mod player;
pub mod state;
pub mod thumbnail;
pub mod view;

pub use controller::{FeedController, FeedSettings};
pub use player::{PlayerEmbed, PlayerEvent, PlayerStatus};
pub use state::{FeedEvent, FeedSource, FeedState, Phase, Selection};
pub use thumbnail::thumbnail_candidates;
pub use view::{FeedView, VideoCard};
