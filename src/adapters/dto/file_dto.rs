use serde::Serialize;

use crate::domain::{
    format::{format_date, format_size_field},
    models::file::DriveFile,
};

/// A listed file: the provider record plus display fields.
#[derive(Debug, Serialize)]
pub struct FileEntry {
    #[serde(flatten)]
    pub file: DriveFile,
    #[serde(rename = "formattedSize")]
    pub formatted_size: String,
    #[serde(rename = "formattedDate")]
    pub formatted_date: Option<String>,
    #[serde(rename = "colorLabel")]
    pub color_label: Option<String>,
}

impl FileEntry {
    /// Dated by creation time.
    pub fn by_created(file: DriveFile) -> Self {
        let date = file.created_time;
        Self::with_date(file, date)
    }

    /// Dated by modification time, falling back to creation time.
    pub fn by_modified(file: DriveFile) -> Self {
        let date = file.modified_time.or(file.created_time);
        Self::with_date(file, date)
    }

    fn with_date(file: DriveFile, date: Option<chrono::DateTime<chrono::Utc>>) -> Self {
        Self {
            formatted_size: format_size_field(file.size.as_deref()),
            formatted_date: date.as_ref().map(format_date),
            color_label: file.color_label().map(str::to_string),
            file,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FolderEntry {
    #[serde(flatten)]
    pub folder: DriveFile,
    #[serde(rename = "colorLabel")]
    pub color_label: Option<String>,
}

impl From<DriveFile> for FolderEntry {
    fn from(folder: DriveFile) -> Self {
        Self {
            color_label: folder.color_label().map(str::to_string),
            folder,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileDetails {
    #[serde(flatten)]
    pub file: DriveFile,
    #[serde(rename = "formattedSize")]
    pub formatted_size: String,
    #[serde(rename = "formattedCreatedDate")]
    pub formatted_created_date: Option<String>,
    #[serde(rename = "formattedModifiedDate")]
    pub formatted_modified_date: Option<String>,
    pub location: String,
    pub owner: String,
}

impl FileDetails {
    pub fn new(file: DriveFile, location: String) -> Self {
        Self {
            formatted_size: format_size_field(file.size.as_deref()),
            formatted_created_date: file.created_time.as_ref().map(format_date),
            formatted_modified_date: file.modified_time.as_ref().map(format_date),
            owner: file.first_owner_name().unwrap_or("Unknown").to_string(),
            location,
            file,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub success: bool,
    #[serde(rename = "folderName", skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Serialize)]
pub struct FolderListResponse {
    pub success: bool,
    pub folders: Vec<FolderEntry>,
}

#[derive(Debug, Serialize)]
pub struct FileDetailsResponse {
    pub success: bool,
    #[serde(rename = "fileDetails")]
    pub file_details: FileDetails,
}

#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub success: bool,
    pub message: String,
    pub file: DriveFile,
}

#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub success: bool,
    pub message: String,
    pub folder: DriveFile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
