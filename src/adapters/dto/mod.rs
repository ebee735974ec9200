pub mod file_dto;
pub mod params;
pub mod sharing_dto;
pub mod upload_dto;
