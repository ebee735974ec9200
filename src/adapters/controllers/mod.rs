pub mod file_controller;
pub mod folder_controller;
pub mod health_controller;
pub mod listing_controller;
pub mod sharing_controller;
pub mod upload_controller;
