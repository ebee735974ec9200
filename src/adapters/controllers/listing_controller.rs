use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, Utc};
use tracing::info;

use crate::{
    adapters::{
        controllers::upload_controller::DEFAULT_FOLDER_NAME,
        dto::{
            file_dto::{FileEntry, FileListResponse, FolderEntry, FolderListResponse},
            params::ListFilesParams,
        },
        state::AppState,
    },
    application::{
        error::{ApplicationError, ResultExt},
        services::{folders::resolve_folder, ListRequest},
    },
    domain::models::query::{FileQuery, Predicate},
};

const LISTING_FIELDS: &str =
    "files(id, name, mimeType, webViewLink, createdTime, size, thumbnailLink, properties)";
const DATED_LISTING_FIELDS: &str = "files(id, name, mimeType, webViewLink, createdTime, modifiedTime, size, thumbnailLink, properties)";
const FOLDER_FIELDS: &str = "files(id, name, properties)";

const RECENT_WINDOW_DAYS: i64 = 7;
const RECENT_PAGE_SIZE: u32 = 100;

pub struct ListingController;

impl ListingController {
    /// GET /list-drive-files?folderName&property&value
    ///
    /// The folder is created when it does not exist yet.
    pub async fn list_drive_files(
        State(app_state): State<AppState>,
        Query(params): Query<ListFilesParams>,
    ) -> Result<Json<FileListResponse>, ApplicationError> {
        const ACTION: &str = "Failed to list files";

        let folder_name = params
            .folder_name()
            .unwrap_or_else(|| DEFAULT_FOLDER_NAME.to_string());
        let drive = app_state.drive.as_ref();

        let folder = resolve_folder(drive, &folder_name).await.context(ACTION)?;

        let mut query = FileQuery::new()
            .and(Predicate::InParent(folder.id))
            .and(Predicate::Trashed(false));
        if let Some((key, value)) = params.property_filter() {
            query = query.and(Predicate::PropertyEquals { key, value });
        }

        let files = drive
            .list_files(ListRequest::new(query, LISTING_FIELDS).order_by("createdTime desc"))
            .await
            .context(ACTION)?;

        info!("Listed {} file(s) in folder {}", files.len(), folder_name);

        Ok(Json(FileListResponse {
            success: true,
            folder_name: Some(folder_name),
            files: files.into_iter().map(FileEntry::by_created).collect(),
        }))
    }

    /// GET /list-drive-folders
    pub async fn list_drive_folders(
        State(app_state): State<AppState>,
    ) -> Result<Json<FolderListResponse>, ApplicationError> {
        let query = FileQuery::new()
            .and(Predicate::FoldersOnly)
            .and(Predicate::Trashed(false));

        let folders = app_state
            .drive
            .list_files(ListRequest::new(query, FOLDER_FIELDS).order_by("name"))
            .await
            .context("Failed to list folders")?;

        Ok(Json(FolderListResponse {
            success: true,
            folders: folders.into_iter().map(FolderEntry::from).collect(),
        }))
    }

    /// GET /list-recent-files
    /// Files modified within the last seven days, newest first.
    pub async fn list_recent_files(
        State(app_state): State<AppState>,
    ) -> Result<Json<FileListResponse>, ApplicationError> {
        let threshold = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let query = FileQuery::new()
            .and(Predicate::ModifiedAfter(threshold))
            .and(Predicate::Trashed(false));

        let files = app_state
            .drive
            .list_files(
                ListRequest::new(query, DATED_LISTING_FIELDS)
                    .order_by("modifiedTime desc")
                    .page_size(RECENT_PAGE_SIZE),
            )
            .await
            .context("Failed to list recent files")?;

        Ok(Json(FileListResponse {
            success: true,
            folder_name: None,
            files: files.into_iter().map(FileEntry::by_modified).collect(),
        }))
    }

    /// GET /list-trashed-files
    pub async fn list_trashed_files(
        State(app_state): State<AppState>,
    ) -> Result<Json<FileListResponse>, ApplicationError> {
        let query = FileQuery::new().and(Predicate::Trashed(true));

        let files = app_state
            .drive
            .list_files(ListRequest::new(query, DATED_LISTING_FIELDS).order_by("modifiedTime desc"))
            .await
            .context("Failed to list trashed files")?;

        Ok(Json(FileListResponse {
            success: true,
            folder_name: None,
            files: files.into_iter().map(FileEntry::by_modified).collect(),
        }))
    }
}
