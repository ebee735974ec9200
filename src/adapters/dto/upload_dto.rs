use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::{
    file::{serialize_provider_time, DriveFile},
    upload::StagedUpload,
};

#[derive(Debug, Serialize)]
pub struct UploadResult {
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(rename = "driveId")]
    pub drive_id: String,
    #[serde(rename = "driveLink")]
    pub drive_link: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    #[serde(rename = "createdTime", serialize_with = "serialize_provider_time")]
    pub created_time: Option<DateTime<Utc>>,
    pub size: String,
}

impl UploadResult {
    pub fn new(upload: &StagedUpload, file: DriveFile) -> Self {
        Self {
            original_name: upload.original_name.clone(),
            drive_id: file.id,
            drive_link: file.web_view_link,
            mime_type: file.mime_type,
            created_time: file.created_time,
            size: file.size.unwrap_or_else(|| "0".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<UploadResult>,
    pub note: String,
}
