use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    /// Service-account key file used to authenticate against the provider.
    pub credentials_file: PathBuf,
    /// External principal granted writer access on every created resource.
    pub share_email: String,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// `None` means permissive CORS.
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid {
                    key: "MAX_UPLOAD_BYTES",
                    value: raw,
                })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let share_email = get("SHARE_EMAIL").ok_or(ConfigError::Missing("SHARE_EMAIL"))?;
        if !share_email.contains('@') {
            return Err(ConfigError::Invalid {
                key: "SHARE_EMAIL",
                value: share_email,
            });
        }

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            port,
            credentials_file: get("GOOGLE_CREDENTIALS_FILE")
                .unwrap_or_else(|| "credentials.json".to_string())
                .into(),
            share_email: share_email.trim().to_string(),
            upload_dir: get("UPLOAD_DIR")
                .unwrap_or_else(|| "uploads".to_string())
                .into(),
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| "public".to_string())
                .into(),
            max_upload_bytes,
            cors_allowed_origins,
        })
    }
}
