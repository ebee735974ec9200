pub mod file;
pub mod permission;
pub mod query;
pub mod upload;
