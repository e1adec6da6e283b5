pub mod animation;
pub mod app;
pub mod app_state;
pub mod config;
pub mod error;
pub mod landing;
pub mod render;
pub mod scene;
