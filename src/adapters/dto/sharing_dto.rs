use serde::Serialize;

use crate::domain::models::permission::Permission;

#[derive(Debug, Serialize)]
pub struct PermissionResponse {
    pub success: bool,
    pub message: String,
    pub permission: Permission,
}

#[derive(Debug, Serialize)]
pub struct SharingLinkResponse {
    pub success: bool,
    pub message: String,
    pub link: Option<String>,
    #[serde(rename = "permissionId")]
    pub permission_id: String,
}

#[derive(Debug, Serialize)]
pub struct TrashFolderResponse {
    pub success: bool,
    #[serde(rename = "folderId")]
    pub folder_id: String,
    pub message: String,
}
