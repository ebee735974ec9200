use tracing::info;

use crate::{
    application::{
        error::ApplicationError,
        services::drive_service::{DriveService, ListRequest},
    },
    domain::models::query::FileQuery,
};

const FOLDER_LOOKUP_FIELDS: &str = "files(id, name)";

/// Id of the first non-trashed folder named exactly `name`, if any.
///
/// Names are not unique on the provider side; when several folders share a
/// name the provider's first result wins.
pub async fn find_folder(
    drive: &dyn DriveService,
    name: &str,
) -> Result<Option<String>, ApplicationError> {
    let folders = drive
        .list_files(ListRequest::new(
            FileQuery::folder_named(name),
            FOLDER_LOOKUP_FIELDS,
        ))
        .await?;

    Ok(folders
        .into_iter()
        .map(|folder| folder.id)
        .find(|id| !id.is_empty()))
}

/// Looks a folder up by name, creating it when absent.
///
/// Two concurrent calls for a new name can both miss and both create.
pub async fn resolve_folder(
    drive: &dyn DriveService,
    name: &str,
) -> Result<FolderResolution, ApplicationError> {
    if let Some(id) = find_folder(drive, name).await? {
        return Ok(FolderResolution { id, created: false });
    }

    let folder = drive.create_folder(name, "id").await?;
    info!("Created folder '{}' with ID: {}", name, folder.id);

    Ok(FolderResolution {
        id: folder.id,
        created: true,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderResolution {
    pub id: String,
    pub created: bool,
}
