use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Property key used to emulate color labels, which Drive has no native notion of.
pub const COLOR_LABEL_PROPERTY: &str = "colorLabel";

/// A file or folder resource as returned by the remote provider.
///
/// Every field is optional because callers request field projections; a
/// `files.get` with `fields=parents` only carries `parents`. Fields not modelled
/// here are kept in `extra` and relayed unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(
        rename = "createdTime",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_provider_time"
    )]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(
        rename = "modifiedTime",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_provider_time"
    )]
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<Owner>>,
    #[serde(rename = "webViewLink", default, skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
    #[serde(rename = "thumbnailLink", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trashed: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Drive renders timestamps as RFC 3339 with milliseconds and a `Z` suffix.
pub fn serialize_provider_time<S: Serializer>(
    time: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(time) => serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress", default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|props| props.get(key))
            .map(String::as_str)
    }

    pub fn color_label(&self) -> Option<&str> {
        self.property(COLOR_LABEL_PROPERTY)
            .filter(|label| !label.is_empty())
    }

    /// Size in bytes, `0` when absent or unparseable (folders carry no size).
    pub fn size_bytes(&self) -> u64 {
        self.size
            .as_deref()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0)
    }

    pub fn first_parent(&self) -> Option<&str> {
        self.parents
            .as_ref()
            .and_then(|parents| parents.first())
            .map(String::as_str)
    }

    pub fn first_owner_name(&self) -> Option<&str> {
        self.owners
            .as_ref()
            .and_then(|owners| owners.first())
            .and_then(|owner| owner.display_name.as_deref())
    }
}
