use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Commenter,
    Writer,
}

#[derive(Debug, Error, PartialEq)]
#[error("Invalid role '{0}'")]
pub struct InvalidRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Commenter => "commenter",
            Role::Writer => "writer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reader" => Ok(Role::Reader),
            "commenter" => Ok(Role::Commenter),
            "writer" => Ok(Role::Writer),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
    User { email: String },
    /// Anyone holding the link.
    Anyone,
}

/// A permission to be created on a resource. Grants are additive only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    pub role: Role,
    pub grantee: Grantee,
    pub notify: bool,
}

impl PermissionGrant {
    pub fn user(email: impl Into<String>, role: Role) -> Self {
        Self {
            role,
            grantee: Grantee::User {
                email: email.into(),
            },
            notify: false,
        }
    }

    pub fn anyone(role: Role) -> Self {
        Self {
            role,
            grantee: Grantee::Anyone,
            notify: false,
        }
    }

    pub fn with_notification(mut self) -> Self {
        self.notify = true;
        self
    }
}

/// A permission as reported back by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "emailAddress", default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}
