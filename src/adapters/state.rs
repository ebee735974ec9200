use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    adapters::staging::StagingArea, application::services::DriveService,
    domain::config::settings::Settings,
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub settings: Arc<Settings>,
    /// Authenticated provider client, created once at startup.
    pub drive: Arc<dyn DriveService>,
    pub staging: StagingArea,
}

impl AppState {
    pub fn new(settings: Settings, drive: Arc<dyn DriveService>, staging: StagingArea) -> Self {
        Self {
            settings: Arc::new(settings),
            drive,
            staging,
        }
    }

    pub fn share_email(&self) -> &str {
        &self.settings.share_email
    }
}
