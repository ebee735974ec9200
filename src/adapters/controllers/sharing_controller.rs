use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::{
    adapters::{
        dto::{
            params::{ShareParams, SharingLinkParams},
            sharing_dto::{PermissionResponse, SharingLinkResponse},
        },
        state::AppState,
    },
    application::error::{ApplicationError, ResultExt},
    domain::models::permission::{PermissionGrant, Role},
};

fn parse_role(role: Option<String>) -> Result<Role, ApplicationError> {
    match role {
        Some(role) => role
            .parse::<Role>()
            .map_err(|e| ApplicationError::BadRequest(e.to_string())),
        None => Ok(Role::Reader),
    }
}

pub struct SharingController;

impl SharingController {
    /// POST /share-file?fileId&email&role
    /// Role defaults to `reader`; the recipient is notified by email.
    pub async fn share_file(
        State(app_state): State<AppState>,
        Query(params): Query<ShareParams>,
    ) -> Result<Json<PermissionResponse>, ApplicationError> {
        let (file_id, email, role) = params.require()?;
        let role = parse_role(role)?;

        let grant = PermissionGrant::user(email.clone(), role).with_notification();
        let permission = app_state
            .drive
            .create_permission(&file_id, &grant)
            .await
            .context("Failed to share file")?;

        info!("Shared {} with {} as {}", file_id, email, role);

        Ok(Json(PermissionResponse {
            success: true,
            message: format!("File shared with {} successfully", email),
            permission,
        }))
    }

    /// POST /create-sharing-link?fileId&role
    /// Grants anyone with the link `role`, then returns the file's view link.
    pub async fn create_sharing_link(
        State(app_state): State<AppState>,
        Query(params): Query<SharingLinkParams>,
    ) -> Result<Json<SharingLinkResponse>, ApplicationError> {
        const ACTION: &str = "Failed to create sharing link";

        let (file_id, role) = params.require()?;
        let role = parse_role(role)?;
        let drive = app_state.drive.as_ref();

        let permission = drive
            .create_permission(&file_id, &PermissionGrant::anyone(role))
            .await
            .context(ACTION)?;

        let file = drive
            .get_file(&file_id, "webViewLink")
            .await
            .context(ACTION)?;

        Ok(Json(SharingLinkResponse {
            success: true,
            message: "Sharing link created successfully".to_string(),
            link: file.web_view_link,
            permission_id: permission.id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_reader() {
        assert_eq!(parse_role(None).unwrap(), Role::Reader);
        assert_eq!(parse_role(Some("writer".into())).unwrap(), Role::Writer);
    }

    #[test]
    fn unknown_role_is_bad_request() {
        let err = parse_role(Some("admin".into())).unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(ref m) if m == "Invalid role 'admin'"));
    }
}
