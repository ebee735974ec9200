pub mod drive_service;
pub mod folders;
pub mod sharing;

pub use drive_service::{ContentStream, DriveService, FileUpdate, ListRequest};
