use tracing::{info, warn};

use crate::{
    application::services::drive_service::DriveService,
    domain::models::permission::{PermissionGrant, Role},
};

/// Grants `email` writer access on a freshly created resource.
///
/// Failures are logged and swallowed; the surrounding operation proceeds as
/// if sharing succeeded.
pub async fn share_with_owner(drive: &dyn DriveService, resource_id: &str, email: &str) {
    let grant = PermissionGrant::user(email, Role::Writer);

    match drive.create_permission(resource_id, &grant).await {
        Ok(_) => info!("Shared {} with {}", resource_id, email),
        Err(e) => warn!("Error sharing {} with {}: {}", resource_id, email, e),
    }
}
