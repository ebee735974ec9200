use std::path::PathBuf;

/// A multipart file part written to the staging directory, awaiting forwarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedUpload {
    pub path: PathBuf,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
}
