use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures_util::TryStreamExt;
use tracing::{error, info, warn};

use crate::{
    adapters::{
        dto::{
            file_dto::{FileDetails, FileDetailsResponse, FileResponse, MessageResponse},
            params::{FileColorParams, FileIdParams, MoveParams, PropertyParams, RenameParams},
        },
        state::AppState,
    },
    application::{
        error::{ApplicationError, ResultExt},
        services::{folders::find_folder, FileUpdate},
    },
    domain::models::file::COLOR_LABEL_PROPERTY,
};

const DETAIL_FIELDS: &str = "id,name,mimeType,size,createdTime,modifiedTime,webViewLink,owners,parents,description,properties,capabilities";
const DEFAULT_LOCATION: &str = "My Drive";

pub struct FileController;

impl FileController {
    /// GET /file/{file_id}
    /// Streams the raw content with the provider-reported content type.
    pub async fn get_file_content(
        State(app_state): State<AppState>,
        Path(file_id): Path<String>,
    ) -> Result<Response, ApplicationError> {
        const ACTION: &str = "Failed to get file";

        let metadata = app_state
            .drive
            .get_file(&file_id, "id,name,mimeType")
            .await
            .context(ACTION)?;

        let content = app_state.drive.download(&file_id).await.context(ACTION)?;

        let stream_file_id = file_id.clone();
        let body = Body::from_stream(content.inspect_err(move |e| {
            error!("Error downloading file {}: {}", stream_file_id, e);
        }));

        let mime_type = metadata
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_name = metadata.name.unwrap_or(file_id);

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime_type)
            .header(header::CONTENT_DISPOSITION, inline_disposition(&file_name))
            .body(body)
            .map_err(|e| ApplicationError::InternalError(e.to_string()).context(ACTION))
    }

    /// GET /file-details?fileId
    pub async fn get_file_details(
        State(app_state): State<AppState>,
        Query(params): Query<FileIdParams>,
    ) -> Result<Json<FileDetailsResponse>, ApplicationError> {
        const ACTION: &str = "Failed to get file details";

        let file_id = params.require()?;
        let drive = app_state.drive.as_ref();

        let file = drive.get_file(&file_id, DETAIL_FIELDS).await.context(ACTION)?;

        let mut location = DEFAULT_LOCATION.to_string();
        if let Some(parent_id) = file.first_parent() {
            match drive.get_file(parent_id, "name").await {
                Ok(parent) => {
                    if let Some(name) = parent.name {
                        location = name;
                    }
                }
                Err(e) => warn!("Error getting parent folder {}: {}", parent_id, e),
            }
        }

        Ok(Json(FileDetailsResponse {
            success: true,
            file_details: FileDetails::new(file, location),
        }))
    }

    /// POST /rename-file?fileId&newName
    pub async fn rename_file(
        State(app_state): State<AppState>,
        Query(params): Query<RenameParams>,
    ) -> Result<Json<FileResponse>, ApplicationError> {
        let (file_id, new_name) = params.require()?;

        let file = app_state
            .drive
            .update_file(&file_id, FileUpdate::rename(new_name))
            .await
            .context("Failed to rename file")?;

        Ok(Json(FileResponse {
            success: true,
            message: "File renamed successfully".to_string(),
            file,
        }))
    }

    /// POST /move-file?fileId&targetFolder
    ///
    /// `targetFolder` is a folder name; it must already exist.
    pub async fn move_file(
        State(app_state): State<AppState>,
        Query(params): Query<MoveParams>,
    ) -> Result<Json<FileResponse>, ApplicationError> {
        const ACTION: &str = "Failed to move file";

        let (file_id, target_folder) = params.require()?;
        let drive = app_state.drive.as_ref();

        let target_id = find_folder(drive, &target_folder)
            .await
            .context(ACTION)?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Target folder '{}' not found", target_folder))
            })?;

        let current = drive.get_file(&file_id, "parents").await.context(ACTION)?;
        let previous_parents: Vec<String> = current
            .parents
            .unwrap_or_default()
            .into_iter()
            .filter(|parent| *parent != target_id)
            .collect();

        let file = drive
            .update_file(
                &file_id,
                FileUpdate::move_to(target_id, previous_parents).with_fields("id, name, parents"),
            )
            .await
            .context(ACTION)?;

        info!("Moved {} to folder {}", file_id, target_folder);

        Ok(Json(FileResponse {
            success: true,
            message: format!("File moved to {} successfully", target_folder),
            file,
        }))
    }

    /// POST /trash-file?fileId
    /// Soft delete: the file goes to the provider's trash.
    pub async fn trash_file(
        State(app_state): State<AppState>,
        Query(params): Query<FileIdParams>,
    ) -> Result<Json<MessageResponse>, ApplicationError> {
        let file_id = params.require()?;

        app_state
            .drive
            .update_file(&file_id, FileUpdate::trash())
            .await
            .context("Failed to trash file")?;

        Ok(Json(MessageResponse {
            success: true,
            message: "File moved to trash successfully".to_string(),
        }))
    }

    /// POST /update-file-color?fileId&color
    /// `none` clears the label; without a color nothing changes.
    pub async fn update_file_color(
        State(app_state): State<AppState>,
        Query(params): Query<FileColorParams>,
    ) -> Result<Json<FileResponse>, ApplicationError> {
        let (file_id, color) = params.require()?;

        let file = app_state
            .drive
            .update_file(
                &file_id,
                color
                    .map(|color| FileUpdate::property(COLOR_LABEL_PROPERTY, color))
                    .unwrap_or_default(),
            )
            .await
            .context("Failed to update color")?;

        Ok(Json(FileResponse {
            success: true,
            message: "File color updated successfully".to_string(),
            file,
        }))
    }

    /// POST /update-file-properties?fileId&property&value
    /// Without a value the patch is empty and the file comes back unchanged.
    pub async fn update_file_properties(
        State(app_state): State<AppState>,
        Query(params): Query<PropertyParams>,
    ) -> Result<Json<FileResponse>, ApplicationError> {
        let (file_id, property, value) = params.require()?;

        let file = app_state
            .drive
            .update_file(
                &file_id,
                value
                    .map(|value| FileUpdate::property(property.clone(), Some(value)))
                    .unwrap_or_default(),
            )
            .await
            .context("Failed to update property")?;

        Ok(Json(FileResponse {
            success: true,
            message: format!("File property {} updated successfully", property),
            file,
        }))
    }
}

/// `inline; filename="..."` with characters that are not valid in a quoted
/// header value replaced.
fn inline_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("inline; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_keeps_plain_names() {
        assert_eq!(
            inline_disposition("report 2024.pdf"),
            "inline; filename=\"report 2024.pdf\""
        );
    }

    #[test]
    fn disposition_replaces_quotes_and_non_ascii() {
        assert_eq!(
            inline_disposition("say \"hi\"\n.txt"),
            "inline; filename=\"say _hi__.txt\""
        );
        assert_eq!(inline_disposition("café.png"), "inline; filename=\"caf_.png\"");
    }
}
