use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use super::file::FOLDER_MIME_TYPE;

/// A single search term understood by the provider's `files.list` `q` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    FoldersOnly,
    NameEquals(String),
    Trashed(bool),
    InParent(String),
    ModifiedAfter(DateTime<Utc>),
    PropertyEquals { key: String, value: String },
}

/// Conjunction of predicates, rendered as the provider's query syntax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileQuery {
    predicates: Vec<Predicate>,
}

impl FileQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-trashed folders with an exact name.
    pub fn folder_named(name: &str) -> Self {
        Self::new()
            .and(Predicate::FoldersOnly)
            .and(Predicate::NameEquals(name.to_string()))
            .and(Predicate::Trashed(false))
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::FoldersOnly => write!(f, "mimeType={}", quote(FOLDER_MIME_TYPE)),
            Predicate::NameEquals(name) => write!(f, "name={}", quote(name)),
            Predicate::Trashed(trashed) => write!(f, "trashed={}", trashed),
            Predicate::InParent(parent_id) => write!(f, "{} in parents", quote(parent_id)),
            Predicate::ModifiedAfter(threshold) => write!(
                f,
                "modifiedTime > {}",
                quote(&threshold.to_rfc3339_opts(SecondsFormat::Millis, true))
            ),
            Predicate::PropertyEquals { key, value } => write!(
                f,
                "properties has {{ key={} and value={} }}",
                quote(key),
                quote(value)
            ),
        }
    }
}

impl fmt::Display for FileQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                f.write_str(" and ")?;
            }
            write!(f, "{}", predicate)?;
        }
        Ok(())
    }
}
