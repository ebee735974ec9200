use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tokio::{fs, io::AsyncWriteExt};
use tracing::warn;

use crate::{application::error::ApplicationError, domain::models::upload::StagedUpload};

const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Local directory holding multipart file parts until they are forwarded.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub async fn create(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<unix-millis>-<sanitized name>`, or `<unix-millis>-<n>-<sanitized name>`
    /// when an earlier part already took that name.
    fn staged_path(&self, timestamp: i64, file_name: &str, attempt: u32) -> PathBuf {
        let name = if attempt == 0 {
            format!("{}-{}", timestamp, file_name)
        } else {
            format!("{}-{}-{}", timestamp, attempt, file_name)
        };
        self.dir.join(name)
    }

    /// Opens a fresh staging file. Existing files are never reused, so parts
    /// sharing a name within one request each get their own path.
    pub async fn begin(
        &self,
        original_name: &str,
        mime_type: &str,
    ) -> Result<StagingWriter, ApplicationError> {
        let timestamp = Utc::now().timestamp_millis();
        let file_name = sanitize_file_name(original_name);

        let mut attempt = 0;
        let (path, file) = loop {
            let path = self.staged_path(timestamp, &file_name, attempt);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                    attempt += 1;
                }
                Err(e) => {
                    return Err(ApplicationError::InternalError(format!(
                        "Cannot stage upload {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        };

        Ok(StagingWriter {
            file,
            upload: StagedUpload {
                path,
                original_name: original_name.to_string(),
                mime_type: mime_type.to_string(),
                size: 0,
            },
        })
    }

    /// Removes a staged file. Already-removed files are ignored; other
    /// failures are only logged.
    pub async fn discard(&self, upload: &StagedUpload) {
        match fs::remove_file(&upload.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove staged upload {}: {}",
                upload.path.display(),
                e
            ),
        }
    }
}

pub struct StagingWriter {
    file: fs::File,
    upload: StagedUpload,
}

impl StagingWriter {
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), ApplicationError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| ApplicationError::InternalError(format!("Cannot stage upload: {}", e)))?;
        self.upload.size += chunk.len() as u64;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<StagedUpload, ApplicationError> {
        self.file
            .flush()
            .await
            .map_err(|e| ApplicationError::InternalError(format!("Cannot stage upload: {}", e)))?;
        Ok(self.upload)
    }

    /// Drops the partially written file.
    pub async fn abort(self, staging: &StagingArea) {
        let upload = self.upload;
        drop(self.file);
        staging.discard(&upload).await;
    }
}

fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}
