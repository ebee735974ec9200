pub mod adapters;
pub mod application;
pub mod domain;
pub mod services;

pub use adapters::{router::create_router, staging::StagingArea, state::AppState};
pub use domain::config::settings::Settings;
