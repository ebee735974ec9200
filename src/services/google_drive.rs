use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures_util::{StreamExt, TryStreamExt};
use reqwest::{multipart, Body, Client, Response, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::{
    application::{
        error::ApplicationError,
        services::{ContentStream, DriveService, FileUpdate, ListRequest},
    },
    domain::models::{
        file::{DriveFile, FOLDER_MIME_TYPE},
        permission::{Grantee, Permission, PermissionGrant},
        upload::StagedUpload,
    },
    services::error::{provider_message, StorageError},
};

const GOOGLE_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const GOOGLE_UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const DRIVE_SCOPES: &str =
    "https://www.googleapis.com/auth/drive.file https://www.googleapis.com/auth/drive.readonly";
const PERMISSION_FIELDS: &str = "id,type,role,emailAddress";

/// Tokens are refreshed this long before the provider-reported expiry.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

#[derive(Debug, Deserialize)]
struct ServiceAccountCredentials {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        self.expires_at < Utc::now() + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS)
    }
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Google Drive v3 client authenticated with a service account.
pub struct GDriveService {
    client: Client,
    credentials: ServiceAccountCredentials,
    access_token: tokio::sync::Mutex<Option<CachedToken>>,
}

impl GDriveService {
    /// `credentials_json` is the content of a service-account key file.
    pub fn new(credentials_json: &str) -> Result<Self, StorageError> {
        let credentials: ServiceAccountCredentials = serde_json::from_str(credentials_json)
            .map_err(|e| StorageError::InvalidCredentials(e.to_string()))?;

        Ok(Self {
            client: Client::new(),
            credentials,
            access_token: tokio::sync::Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    async fn get_access_token(&self) -> Result<String, StorageError> {
        let mut token = self.access_token.lock().await;
        if let Some(ref cached) = *token {
            if !cached.is_expired() {
                return Ok(cached.value.clone());
            }
        }

        let jwt = self.create_jwt()?;

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await?;

        let response = ensure_success(response, "Token exchange").await?;
        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Unauthorized(e.to_string()))?;

        debug!(
            "Obtained access token for {}, expires in {}s",
            self.credentials.client_email, token_response.expires_in
        );

        *token = Some(CachedToken {
            value: token_response.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(token_response.expires_in),
        });

        Ok(token_response.access_token)
    }

    fn create_jwt(&self) -> Result<String, StorageError> {
        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
        use serde::Serialize;

        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: &'a str,
            aud: &'a str,
            exp: i64,
            iat: i64,
        }

        let now = Utc::now().timestamp();

        let claims = Claims {
            iss: &self.credentials.client_email,
            scope: DRIVE_SCOPES,
            aud: &self.credentials.token_uri,
            exp: now + 3600,
            iat: now,
        };

        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| StorageError::InvalidCredentials(e.to_string()))?;

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| StorageError::InternalError(e.to_string()))
    }
}

/// `<base>/files/<segments...>`. Each segment is percent-encoded, so a file id
/// can never address a different resource.
fn files_url(base: &str, segments: &[&str]) -> Result<Url, StorageError> {
    let mut url = Url::parse(base).map_err(|e| StorageError::InternalError(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| StorageError::InternalError(format!("Invalid API base: {}", base)))?
        .push("files")
        .extend(segments);
    Ok(url)
}

async fn ensure_success(response: Response, operation: &str) -> Result<Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = provider_message(&body)
        .unwrap_or_else(|| format!("{} failed with status: {}", operation, status));

    Err(StorageError::from_status(status.as_u16(), message))
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, StorageError> {
    response
        .json::<T>()
        .await
        .map_err(|e| StorageError::InternalError(e.to_string()))
}

/// JSON body of a `files.update` call. Properties mapped to `None` are sent as
/// `null`, which removes them on the provider side.
fn update_body(update: &FileUpdate) -> Value {
    let mut body = Map::new();

    if let Some(ref name) = update.name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(trashed) = update.trashed {
        body.insert("trashed".to_string(), json!(trashed));
    }
    if !update.properties.is_empty() {
        let properties: Map<String, Value> = update
            .properties
            .iter()
            .map(|(key, value)| (key.clone(), json!(value)))
            .collect();
        body.insert("properties".to_string(), Value::Object(properties));
    }

    Value::Object(body)
}

fn permission_body(grant: &PermissionGrant) -> Value {
    match grant.grantee {
        Grantee::User { ref email } => json!({
            "role": grant.role.as_str(),
            "type": "user",
            "emailAddress": email,
        }),
        Grantee::Anyone => json!({
            "role": grant.role.as_str(),
            "type": "anyone",
        }),
    }
}

#[async_trait]
impl DriveService for GDriveService {
    async fn list_files(&self, request: ListRequest) -> Result<Vec<DriveFile>, ApplicationError> {
        let token = self.get_access_token().await?;

        let q = request.query.to_string();
        let mut params: Vec<(&str, String)> = vec![
            ("q", q),
            ("fields", request.fields.to_string()),
            ("spaces", "drive".to_string()),
        ];
        if let Some(order_by) = request.order_by {
            params.push(("orderBy", order_by.to_string()));
        }
        if let Some(page_size) = request.page_size {
            params.push(("pageSize", page_size.to_string()));
        }

        debug!("Listing files with query: {}", params[0].1);

        let response = self
            .client
            .get(files_url(GOOGLE_DRIVE_API_BASE, &[])?)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await
            .map_err(StorageError::from)?;

        let response = ensure_success(response, "List files").await?;
        let list: FileList = parse_json(response).await?;

        Ok(list.files)
    }

    async fn get_file(&self, file_id: &str, fields: &str) -> Result<DriveFile, ApplicationError> {
        let token = self.get_access_token().await?;

        let response = self
            .client
            .get(files_url(GOOGLE_DRIVE_API_BASE, &[file_id])?)
            .bearer_auth(token)
            .query(&[("fields", fields)])
            .send()
            .await
            .map_err(StorageError::from)?;

        let response = ensure_success(response, "Get file").await?;
        Ok(parse_json(response).await?)
    }

    async fn create_folder(
        &self,
        name: &str,
        fields: &str,
    ) -> Result<DriveFile, ApplicationError> {
        let token = self.get_access_token().await?;

        let folder_metadata = json!({
            "name": name,
            "mimeType": FOLDER_MIME_TYPE,
        });

        let response = self
            .client
            .post(files_url(GOOGLE_DRIVE_API_BASE, &[])?)
            .bearer_auth(token)
            .query(&[("fields", fields)])
            .json(&folder_metadata)
            .send()
            .await
            .map_err(StorageError::from)?;

        let response = ensure_success(response, "Create folder").await?;
        Ok(parse_json(response).await?)
    }

    async fn upload_file(
        &self,
        upload: &StagedUpload,
        parent_id: &str,
        fields: &str,
    ) -> Result<DriveFile, ApplicationError> {
        let token = self.get_access_token().await?;

        let file_metadata = json!({
            "name": upload.original_name,
            "mimeType": upload.mime_type,
            "parents": [parent_id],
        });

        let metadata_part = multipart::Part::text(file_metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let staged = tokio::fs::File::open(&upload.path).await.map_err(|e| {
            StorageError::InternalError(format!(
                "Cannot open staged upload {}: {}",
                upload.path.display(),
                e
            ))
        })?;

        let file_part = multipart::Part::stream_with_length(Body::from(staged), upload.size)
            .mime_str(&upload.mime_type)
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let form = multipart::Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        let response = self
            .client
            .post(files_url(GOOGLE_UPLOAD_API_BASE, &[])?)
            .bearer_auth(token)
            .query(&[("uploadType", "multipart"), ("fields", fields)])
            .multipart(form)
            .send()
            .await
            .map_err(StorageError::from)?;

        let response = ensure_success(response, "Upload").await?;
        Ok(parse_json(response).await?)
    }

    async fn update_file(
        &self,
        file_id: &str,
        update: FileUpdate,
    ) -> Result<DriveFile, ApplicationError> {
        let token = self.get_access_token().await?;

        let mut params: Vec<(&str, String)> = Vec::new();
        if !update.add_parents.is_empty() {
            params.push(("addParents", update.add_parents.join(",")));
        }
        if !update.remove_parents.is_empty() {
            params.push(("removeParents", update.remove_parents.join(",")));
        }
        if let Some(fields) = update.fields {
            params.push(("fields", fields.to_string()));
        }

        let response = self
            .client
            .patch(files_url(GOOGLE_DRIVE_API_BASE, &[file_id])?)
            .bearer_auth(token)
            .query(&params)
            .json(&update_body(&update))
            .send()
            .await
            .map_err(StorageError::from)?;

        let response = ensure_success(response, "Update file").await?;
        Ok(parse_json(response).await?)
    }

    async fn create_permission(
        &self,
        file_id: &str,
        grant: &PermissionGrant,
    ) -> Result<Permission, ApplicationError> {
        let token = self.get_access_token().await?;

        let mut params: Vec<(&str, String)> = vec![("fields", PERMISSION_FIELDS.to_string())];
        // Only user grants accept the notification flag.
        if let Grantee::User { .. } = grant.grantee {
            params.push(("sendNotificationEmail", grant.notify.to_string()));
        }

        let response = self
            .client
            .post(files_url(GOOGLE_DRIVE_API_BASE, &[file_id, "permissions"])?)
            .bearer_auth(token)
            .query(&params)
            .json(&permission_body(grant))
            .send()
            .await
            .map_err(StorageError::from)?;

        let response = ensure_success(response, "Create permission").await?;
        Ok(parse_json(response).await?)
    }

    async fn download(&self, file_id: &str) -> Result<ContentStream, ApplicationError> {
        let token = self.get_access_token().await?;

        let response = self
            .client
            .get(files_url(GOOGLE_DRIVE_API_BASE, &[file_id])?)
            .bearer_auth(token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(StorageError::from)?;

        let response = ensure_success(response, "Download").await?;

        let stream = response
            .bytes_stream()
            .map_err(|e| ApplicationError::from(StorageError::NetworkError(e.to_string())));

        Ok(stream.boxed())
    }
}
