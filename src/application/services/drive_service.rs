use std::{collections::BTreeMap, pin::Pin};

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;

use crate::{
    application::error::ApplicationError,
    domain::models::{
        file::DriveFile,
        permission::{Permission, PermissionGrant},
        query::FileQuery,
        upload::StagedUpload,
    },
};

/// Raw file content as it arrives from the provider.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<Bytes, ApplicationError>> + Send>>;

#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub query: FileQuery,
    /// Field projection, e.g. `files(id, name)`.
    pub fields: &'static str,
    pub order_by: Option<&'static str>,
    pub page_size: Option<u32>,
}

impl ListRequest {
    pub fn new(query: FileQuery, fields: &'static str) -> Self {
        Self {
            query,
            fields,
            order_by: None,
            page_size: None,
        }
    }

    pub fn order_by(mut self, order_by: &'static str) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// A metadata patch. Unset fields are left untouched by the provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileUpdate {
    pub name: Option<String>,
    pub trashed: Option<bool>,
    /// A `None` value removes the key.
    pub properties: BTreeMap<String, Option<String>>,
    pub add_parents: Vec<String>,
    pub remove_parents: Vec<String>,
    pub fields: Option<&'static str>,
}

impl FileUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn trash() -> Self {
        Self {
            trashed: Some(true),
            ..Default::default()
        }
    }

    pub fn property(key: impl Into<String>, value: Option<String>) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(key.into(), value);
        Self {
            properties,
            ..Default::default()
        }
    }

    /// Swaps parent membership in one call: adds `target`, drops every
    /// previous parent.
    pub fn move_to(target: impl Into<String>, previous: Vec<String>) -> Self {
        Self {
            add_parents: vec![target.into()],
            remove_parents: previous,
            ..Default::default()
        }
    }

    pub fn with_fields(mut self, fields: &'static str) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// The remote storage provider, reached through a fixed set of RPC-like calls.
#[async_trait]
pub trait DriveService: Send + Sync {
    async fn list_files(&self, request: ListRequest) -> Result<Vec<DriveFile>, ApplicationError>;

    async fn get_file(&self, file_id: &str, fields: &str) -> Result<DriveFile, ApplicationError>;

    async fn create_folder(&self, name: &str, fields: &str)
        -> Result<DriveFile, ApplicationError>;

    async fn upload_file(
        &self,
        upload: &StagedUpload,
        parent_id: &str,
        fields: &str,
    ) -> Result<DriveFile, ApplicationError>;

    async fn update_file(
        &self,
        file_id: &str,
        update: FileUpdate,
    ) -> Result<DriveFile, ApplicationError>;

    async fn create_permission(
        &self,
        file_id: &str,
        grant: &PermissionGrant,
    ) -> Result<Permission, ApplicationError>;

    async fn download(&self, file_id: &str) -> Result<ContentStream, ApplicationError>;
}
