use serde::Deserialize;

use crate::application::error::ApplicationError;

/// Empty strings count as missing, the same as an absent parameter.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require(value: Option<String>, message: &str) -> Result<String, ApplicationError> {
    present(value).ok_or_else(|| ApplicationError::BadRequest(message.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub struct FileIdParams {
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
}

impl FileIdParams {
    pub fn require(self) -> Result<String, ApplicationError> {
        require(self.file_id, "File ID is required")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFilesParams {
    #[serde(rename = "folderName")]
    pub folder_name: Option<String>,
    pub property: Option<String>,
    pub value: Option<String>,
}

impl ListFilesParams {
    pub fn folder_name(&self) -> Option<String> {
        present(self.folder_name.clone())
    }

    /// The property filter applies only when both key and value are given.
    pub fn property_filter(&self) -> Option<(String, String)> {
        match (present(self.property.clone()), present(self.value.clone())) {
            (Some(key), Some(value)) => Some((key, value)),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameParams {
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    #[serde(rename = "newName")]
    pub new_name: Option<String>,
}

impl RenameParams {
    pub fn require(self) -> Result<(String, String), ApplicationError> {
        const MESSAGE: &str = "File ID and new name are required";
        Ok((require(self.file_id, MESSAGE)?, require(self.new_name, MESSAGE)?))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MoveParams {
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    #[serde(rename = "targetFolder")]
    pub target_folder: Option<String>,
}

impl MoveParams {
    pub fn require(self) -> Result<(String, String), ApplicationError> {
        const MESSAGE: &str = "File ID and target folder are required";
        Ok((
            require(self.file_id, MESSAGE)?,
            require(self.target_folder, MESSAGE)?,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ShareParams {
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl ShareParams {
    pub fn require(self) -> Result<(String, String, Option<String>), ApplicationError> {
        const MESSAGE: &str = "File ID and email are required";
        Ok((
            require(self.file_id, MESSAGE)?,
            require(self.email, MESSAGE)?,
            present(self.role),
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SharingLinkParams {
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    pub role: Option<String>,
}

impl SharingLinkParams {
    pub fn require(self) -> Result<(String, Option<String>), ApplicationError> {
        Ok((
            require(self.file_id, "File ID is required")?,
            present(self.role),
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FileColorParams {
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    pub color: Option<String>,
}

impl FileColorParams {
    pub fn require(self) -> Result<(String, Option<Option<String>>), ApplicationError> {
        Ok((
            require(self.file_id, "File ID is required")?,
            color_value(self.color),
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FolderColorParams {
    #[serde(rename = "folderId")]
    pub folder_id: Option<String>,
    pub color: Option<String>,
}

impl FolderColorParams {
    pub fn require(self) -> Result<(String, Option<Option<String>>), ApplicationError> {
        Ok((
            require(self.folder_id, "Folder ID is required")?,
            color_value(self.color),
        ))
    }
}

/// `None` leaves the label untouched, `Some(None)` (the literal `none`)
/// clears it.
fn color_value(color: Option<String>) -> Option<Option<String>> {
    present(color).map(|c| if c == "none" { None } else { Some(c) })
}

#[derive(Debug, Default, Deserialize)]
pub struct PropertyParams {
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    pub property: Option<String>,
    pub value: Option<String>,
}

impl PropertyParams {
    pub fn require(self) -> Result<(String, String, Option<String>), ApplicationError> {
        const MESSAGE: &str = "File ID and property are required";
        Ok((
            require(self.file_id, MESSAGE)?,
            require(self.property, MESSAGE)?,
            self.value,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateFolderParams {
    #[serde(rename = "folderName")]
    pub folder_name: Option<String>,
}

impl CreateFolderParams {
    pub fn require(self) -> Result<String, ApplicationError> {
        require(self.folder_name, "Folder name is required")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_missing() {
        let params = RenameParams {
            file_id: Some("abc".into()),
            new_name: Some("  ".into()),
        };
        let err = params.require().unwrap_err();
        assert_eq!(err.to_string(), "File ID and new name are required");
    }

    #[test]
    fn none_color_clears_label() {
        let params = FileColorParams {
            file_id: Some("abc".into()),
            color: Some("none".into()),
        };
        assert_eq!(params.require().unwrap(), ("abc".to_string(), Some(None)));

        let params = FileColorParams {
            file_id: Some("abc".into()),
            color: Some("blue".into()),
        };
        assert_eq!(
            params.require().unwrap(),
            ("abc".to_string(), Some(Some("blue".to_string())))
        );
    }

    #[test]
    fn absent_color_leaves_label_alone() {
        let params = FolderColorParams {
            folder_id: Some("abc".into()),
            color: None,
        };
        assert_eq!(params.require().unwrap(), ("abc".to_string(), None));
    }

    #[test]
    fn property_filter_needs_key_and_value() {
        let params = ListFilesParams {
            folder_name: None,
            property: Some("colorLabel".into()),
            value: None,
        };
        assert_eq!(params.property_filter(), None);

        let params = ListFilesParams {
            folder_name: None,
            property: Some("colorLabel".into()),
            value: Some("red".into()),
        };
        assert_eq!(
            params.property_filter(),
            Some(("colorLabel".to_string(), "red".to_string()))
        );
    }
}
