pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod middleware;
pub mod models;
pub mod services;
