mod app;
mod config;
mod effects;
mod render;

pub use app::App;
pub use config::{ClientConfig, TOKEN_ENV};
