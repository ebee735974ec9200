//! Test helpers: an in-memory provider and a router wired against it.

#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};
use tempfile::TempDir;

use drive_relay::{
    application::{
        error::ApplicationError,
        services::{ContentStream, DriveService, FileUpdate, ListRequest},
    },
    create_router,
    domain::models::{
        file::{DriveFile, FOLDER_MIME_TYPE},
        permission::{Grantee, Permission, PermissionGrant},
        query::Predicate,
        upload::StagedUpload,
    },
    AppState, Settings, StagingArea,
};

pub const SHARE_EMAIL: &str = "owner@example.com";

#[derive(Default)]
struct Inner {
    files: Vec<DriveFile>,
    contents: BTreeMap<String, Vec<u8>>,
    permissions: Vec<(String, PermissionGrant)>,
    calls: Vec<String>,
    next_id: u64,
    failing: bool,
    failing_permissions: bool,
    uploads: usize,
    failing_upload: Option<usize>,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut DriveFile, ApplicationError> {
        self.files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| ApplicationError::Remote(format!("File not found: {}.", id)))
    }
}

/// In-memory stand-in for the remote provider.
///
/// Field projections are ignored: every call returns full records.
#[derive(Default)]
pub struct MemoryDrive {
    inner: Mutex<Inner>,
}

fn matches(file: &DriveFile, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::FoldersOnly => file.is_folder(),
        Predicate::NameEquals(name) => file.name.as_deref() == Some(name.as_str()),
        Predicate::Trashed(trashed) => file.trashed.unwrap_or(false) == *trashed,
        Predicate::InParent(parent) => file
            .parents
            .as_ref()
            .is_some_and(|parents| parents.contains(parent)),
        Predicate::ModifiedAfter(threshold) => file.modified_time.is_some_and(|t| t > *threshold),
        Predicate::PropertyEquals { key, value } => file.property(key) == Some(value.as_str()),
    }
}

impl MemoryDrive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails as if the provider were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    pub fn set_failing_permissions(&self, failing: bool) {
        self.inner.lock().unwrap().failing_permissions = failing;
    }

    /// The `n`th upload (1-based) fails; earlier and later ones succeed.
    pub fn fail_upload_number(&self, n: usize) {
        self.inner.lock().unwrap().failing_upload = Some(n);
    }

    pub fn insert_folder(&self, name: &str) -> String {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id("folder");
        let now = Utc::now();
        inner.files.push(DriveFile {
            id: id.clone(),
            name: Some(name.to_string()),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            created_time: Some(now),
            modified_time: Some(now),
            trashed: Some(false),
            ..Default::default()
        });
        id
    }

    pub fn insert_file(&self, name: &str, parent: &str, content: &[u8]) -> String {
        self.insert_file_modified_at(name, parent, content, Utc::now())
    }

    pub fn insert_file_modified_at(
        &self,
        name: &str,
        parent: &str,
        content: &[u8],
        modified: DateTime<Utc>,
    ) -> String {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id("file");
        inner.files.push(DriveFile {
            id: id.clone(),
            name: Some(name.to_string()),
            mime_type: Some("text/plain".to_string()),
            size: Some(content.len().to_string()),
            created_time: Some(modified),
            modified_time: Some(modified),
            parents: Some(vec![parent.to_string()]),
            web_view_link: Some(format!("https://drive.example.com/{}", id)),
            trashed: Some(false),
            ..Default::default()
        });
        inner.contents.insert(id.clone(), content.to_vec());
        id
    }

    pub fn file(&self, id: &str) -> Option<DriveFile> {
        self.inner
            .lock()
            .unwrap()
            .files
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    pub fn content(&self, id: &str) -> Option<Vec<u8>> {
        self.inner.lock().unwrap().contents.get(id).cloned()
    }

    pub fn folders_named(&self, name: &str) -> Vec<DriveFile> {
        self.inner
            .lock()
            .unwrap()
            .files
            .iter()
            .filter(|f| f.is_folder() && f.name.as_deref() == Some(name))
            .cloned()
            .collect()
    }

    pub fn permissions(&self) -> Vec<(String, PermissionGrant)> {
        self.inner.lock().unwrap().permissions.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    fn begin(&self, call: &str) -> Result<std::sync::MutexGuard<'_, Inner>, ApplicationError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call.to_string());
        if inner.failing {
            return Err(ApplicationError::Remote("Backend unavailable".to_string()));
        }
        Ok(inner)
    }
}

#[async_trait]
impl DriveService for MemoryDrive {
    async fn list_files(&self, request: ListRequest) -> Result<Vec<DriveFile>, ApplicationError> {
        let inner = self.begin("list_files")?;
        let mut files: Vec<DriveFile> = inner
            .files
            .iter()
            .filter(|f| request.query.predicates().iter().all(|p| matches(f, p)))
            .cloned()
            .collect();
        if let Some(page_size) = request.page_size {
            files.truncate(page_size as usize);
        }
        Ok(files)
    }

    async fn get_file(&self, file_id: &str, _fields: &str) -> Result<DriveFile, ApplicationError> {
        let mut inner = self.begin("get_file")?;
        inner.find_mut(file_id).map(|f| f.clone())
    }

    async fn create_folder(
        &self,
        name: &str,
        _fields: &str,
    ) -> Result<DriveFile, ApplicationError> {
        let mut inner = self.begin("create_folder")?;
        let id = inner.next_id("folder");
        let now = Utc::now();
        let folder = DriveFile {
            id: id.clone(),
            name: Some(name.to_string()),
            mime_type: Some(FOLDER_MIME_TYPE.to_string()),
            created_time: Some(now),
            modified_time: Some(now),
            web_view_link: Some(format!("https://drive.example.com/{}", id)),
            trashed: Some(false),
            ..Default::default()
        };
        inner.files.push(folder.clone());
        Ok(folder)
    }

    async fn upload_file(
        &self,
        upload: &StagedUpload,
        parent_id: &str,
        _fields: &str,
    ) -> Result<DriveFile, ApplicationError> {
        // The staged copy must still be on disk when forwarded.
        let content = tokio::fs::read(&upload.path)
            .await
            .map_err(|e| ApplicationError::InternalError(e.to_string()))?;

        let mut inner = self.begin("upload_file")?;
        inner.uploads += 1;
        if inner.failing_upload == Some(inner.uploads) {
            return Err(ApplicationError::Remote("Upload quota exceeded".to_string()));
        }
        let id = inner.next_id("file");
        let now = Utc::now();
        let file = DriveFile {
            id: id.clone(),
            name: Some(upload.original_name.clone()),
            mime_type: Some(upload.mime_type.clone()),
            size: Some(content.len().to_string()),
            created_time: Some(now),
            modified_time: Some(now),
            parents: Some(vec![parent_id.to_string()]),
            web_view_link: Some(format!("https://drive.example.com/{}", id)),
            trashed: Some(false),
            ..Default::default()
        };
        inner.files.push(file.clone());
        inner.contents.insert(id, content);
        Ok(file)
    }

    async fn update_file(
        &self,
        file_id: &str,
        update: FileUpdate,
    ) -> Result<DriveFile, ApplicationError> {
        let mut inner = self.begin("update_file")?;
        let file = inner.find_mut(file_id)?;

        if let Some(name) = update.name {
            file.name = Some(name);
        }
        if let Some(trashed) = update.trashed {
            file.trashed = Some(trashed);
        }
        if !update.properties.is_empty() {
            let properties = file.properties.get_or_insert_with(BTreeMap::new);
            for (key, value) in update.properties {
                match value {
                    Some(value) => {
                        properties.insert(key, value);
                    }
                    None => {
                        properties.remove(&key);
                    }
                }
            }
        }
        if !update.add_parents.is_empty() || !update.remove_parents.is_empty() {
            let parents = file.parents.get_or_insert_with(Vec::new);
            parents.retain(|p| !update.remove_parents.contains(p));
            for parent in update.add_parents {
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
        }
        file.modified_time = Some(Utc::now());

        Ok(file.clone())
    }

    async fn create_permission(
        &self,
        file_id: &str,
        grant: &PermissionGrant,
    ) -> Result<Permission, ApplicationError> {
        let mut inner = self.begin("create_permission")?;
        if inner.failing_permissions {
            return Err(ApplicationError::Remote(
                "The user does not have sufficient permissions".to_string(),
            ));
        }
        inner.find_mut(file_id)?;

        let id = inner.next_id("perm");
        inner.permissions.push((file_id.to_string(), grant.clone()));

        let (kind, email_address) = match grant.grantee {
            Grantee::User { ref email } => ("user", Some(email.clone())),
            Grantee::Anyone => ("anyone", None),
        };
        Ok(Permission {
            id,
            kind: Some(kind.to_string()),
            role: Some(grant.role.to_string()),
            email_address,
        })
    }

    async fn download(&self, file_id: &str) -> Result<ContentStream, ApplicationError> {
        let inner = self.begin("download")?;
        let content = inner
            .contents
            .get(file_id)
            .cloned()
            .ok_or_else(|| ApplicationError::Remote(format!("File not found: {}.", file_id)))?;

        // Two chunks, so the response body is genuinely streamed.
        let mid = content.len() / 2;
        let chunks = vec![
            Ok(Bytes::copy_from_slice(&content[..mid])),
            Ok(Bytes::copy_from_slice(&content[mid..])),
        ];
        Ok(stream::iter(chunks).boxed())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub drive: Arc<MemoryDrive>,
    pub upload_dir: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let upload_dir = dir.path().join("uploads");

    let settings = Settings {
        port: 0,
        credentials_file: dir.path().join("credentials.json"),
        share_email: SHARE_EMAIL.to_string(),
        upload_dir: upload_dir.clone(),
        static_dir: dir.path().join("public"),
        max_upload_bytes: 10 * 1024 * 1024,
        cors_allowed_origins: None,
    };

    let staging = StagingArea::create(&upload_dir)
        .await
        .expect("staging dir");
    let drive = Arc::new(MemoryDrive::new());

    let router = create_router(AppState::new(settings, drive.clone(), staging));
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        drive,
        upload_dir,
        _dir: dir,
    }
}
