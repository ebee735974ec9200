mod error;
mod google_drive;

pub use error::StorageError;
pub use google_drive::GDriveService;

use std::{path::Path, sync::Arc};

use crate::application::services::DriveService;

/// Builds the provider client from a service-account key file.
pub fn create_drive_service(credentials_file: &Path) -> Result<Arc<dyn DriveService>, StorageError> {
    let credentials = std::fs::read_to_string(credentials_file).map_err(|e| {
        StorageError::InvalidCredentials(format!(
            "Cannot read {}: {}",
            credentials_file.display(),
            e
        ))
    })?;

    let service = GDriveService::new(&credentials)?;
    tracing::info!(
        "Authenticating to Google Drive as {}",
        service.client_email()
    );

    Ok(Arc::new(service))
}
