use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::{
    adapters::{
        dto::{
            file_dto::FolderResponse,
            params::{CreateFolderParams, FolderColorParams},
            sharing_dto::TrashFolderResponse,
        },
        state::AppState,
    },
    application::{
        error::{ApplicationError, ResultExt},
        services::{folders::resolve_folder, sharing::share_with_owner, FileUpdate},
    },
    domain::models::file::COLOR_LABEL_PROPERTY,
};

const TRASH_FOLDER_NAME: &str = "Trash";

pub struct FolderController;

impl FolderController {
    /// POST /create-folder?folderName
    /// Always creates a new folder, even if one with the same name exists.
    pub async fn create_folder(
        State(app_state): State<AppState>,
        Query(params): Query<CreateFolderParams>,
    ) -> Result<Json<FolderResponse>, ApplicationError> {
        let folder_name = params.require()?;
        let drive = app_state.drive.as_ref();

        let folder = drive
            .create_folder(&folder_name, "id,name,webViewLink")
            .await
            .context("Failed to create folder")?;
        info!("Created folder '{}' with ID: {}", folder_name, folder.id);

        share_with_owner(drive, &folder.id, app_state.share_email()).await;

        Ok(Json(FolderResponse {
            success: true,
            message: "Folder created successfully".to_string(),
            folder,
        }))
    }

    /// POST /ensure-trash-folder
    /// The folder is shared only when this call creates it.
    pub async fn ensure_trash_folder(
        State(app_state): State<AppState>,
    ) -> Result<Json<TrashFolderResponse>, ApplicationError> {
        let drive = app_state.drive.as_ref();

        let folder = resolve_folder(drive, TRASH_FOLDER_NAME)
            .await
            .context("Failed to ensure Trash folder")?;

        if folder.created {
            share_with_owner(drive, &folder.id, app_state.share_email()).await;
        }

        Ok(Json(TrashFolderResponse {
            success: true,
            folder_id: folder.id,
            message: "Trash folder ensured".to_string(),
        }))
    }

    /// POST /update-folder-color?folderId&color
    pub async fn update_folder_color(
        State(app_state): State<AppState>,
        Query(params): Query<FolderColorParams>,
    ) -> Result<Json<FolderResponse>, ApplicationError> {
        let (folder_id, color) = params.require()?;

        let folder = app_state
            .drive
            .update_file(
                &folder_id,
                color
                    .map(|color| FileUpdate::property(COLOR_LABEL_PROPERTY, color))
                    .unwrap_or_default(),
            )
            .await
            .context("Failed to update folder color")?;

        Ok(Json(FolderResponse {
            success: true,
            message: "Folder color updated successfully".to_string(),
            folder,
        }))
    }
}
