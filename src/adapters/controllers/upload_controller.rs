use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use tracing::{info, warn};

use crate::{
    adapters::{
        dto::upload_dto::{UploadResponse, UploadResult},
        staging::StagingArea,
        state::AppState,
    },
    application::{
        error::{ApplicationError, ResultExt},
        services::{folders::resolve_folder, sharing::share_with_owner},
    },
    domain::models::upload::StagedUpload,
};

pub const DEFAULT_FOLDER_NAME: &str = "Uploads";
const UPLOAD_ACTION: &str = "Failed to upload to Google Drive";
const UPLOAD_FIELDS: &str = "id,name,webViewLink,mimeType,createdTime,size";

pub struct UploadController;

impl UploadController {
    /// POST /upload-to-drive
    /// Multipart: `files` (repeated), optional `folderName`
    pub async fn upload_to_drive(
        State(app_state): State<AppState>,
        mut multipart: Multipart,
    ) -> Result<Json<UploadResponse>, ApplicationError> {
        let mut staged: Vec<StagedUpload> = Vec::new();

        let result = Self::stage_and_forward(&app_state, &mut multipart, &mut staged).await;

        // Anything still on disk was not forwarded because of an earlier failure.
        for upload in &staged {
            app_state.staging.discard(upload).await;
        }

        result
    }

    async fn stage_and_forward(
        app_state: &AppState,
        multipart: &mut Multipart,
        staged: &mut Vec<StagedUpload>,
    ) -> Result<Json<UploadResponse>, ApplicationError> {
        let mut folder_name: Option<String> = None;

        while let Some(mut field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            ApplicationError::BadRequest("Invalid request format".to_string())
        })? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "files" => {
                    if let Some(upload) = Self::stage_field(&app_state.staging, &mut field).await? {
                        staged.push(upload);
                    }
                }
                "folderName" => {
                    folder_name = Some(field.text().await.map_err(|e| {
                        warn!("Invalid folderName field: {}", e);
                        ApplicationError::BadRequest("Invalid request data".to_string())
                    })?);
                }
                _ => {}
            }
        }

        if staged.is_empty() {
            return Err(ApplicationError::BadRequest("No files uploaded".to_string()));
        }

        let folder_name = folder_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string());

        let drive = app_state.drive.as_ref();
        let share_email = app_state.share_email();

        let folder = resolve_folder(drive, &folder_name)
            .await
            .context(UPLOAD_ACTION)?;
        info!("Using folder: {} with ID: {}", folder_name, folder.id);

        share_with_owner(drive, &folder.id, share_email).await;

        let mut results = Vec::with_capacity(staged.len());
        for upload in staged.iter() {
            info!("Uploading file: {}", upload.original_name);

            let file = drive
                .upload_file(upload, &folder.id, UPLOAD_FIELDS)
                .await
                .context(UPLOAD_ACTION)?;
            info!("File uploaded with ID: {}", file.id);

            share_with_owner(drive, &file.id, share_email).await;
            app_state.staging.discard(upload).await;

            results.push(UploadResult::new(upload, file));
        }

        Ok(Json(UploadResponse {
            success: true,
            message: format!(
                "Successfully uploaded {} file(s) to Google Drive folder \"{}\"",
                results.len(),
                folder_name
            ),
            results,
            note: format!(
                "Files have been shared with {} and should appear in your \"Shared with me\" section.",
                share_email
            ),
        }))
    }

    /// Streams one file part to the staging area. Parts without a file name
    /// (an empty file input) are skipped.
    async fn stage_field(
        staging: &StagingArea,
        field: &mut Field<'_>,
    ) -> Result<Option<StagedUpload>, ApplicationError> {
        let original_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };

        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&original_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        let mut writer = staging.begin(&original_name, &mime_type).await?;

        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = writer.write(&chunk).await {
                        writer.abort(staging).await;
                        return Err(e);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Cannot read file bytes for {}: {}", original_name, e);
                    writer.abort(staging).await;
                    return Err(ApplicationError::BadRequest(
                        "Invalid file data".to_string(),
                    ));
                }
            }
        }

        writer.finish().await.map(Some)
    }
}
