use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::adapters::{
    controllers::{
        file_controller::FileController, folder_controller::FolderController,
        health_controller::HealthController, listing_controller::ListingController,
        sharing_controller::SharingController, upload_controller::UploadController,
    },
    state::AppState,
};

fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    match allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        // Allow all origins if not specified (development)
        None => CorsLayer::permissive(),
    }
}

pub fn create_router(app_state: AppState) -> Router {
    let settings = app_state.settings.clone();

    let mut router = Router::new()
        .route("/health", get(HealthController::health_check))
        .route("/upload-to-drive", post(UploadController::upload_to_drive))
        .route("/list-drive-files", get(ListingController::list_drive_files))
        .route(
            "/list-drive-folders",
            get(ListingController::list_drive_folders),
        )
        .route("/list-recent-files", get(ListingController::list_recent_files))
        .route(
            "/list-trashed-files",
            get(ListingController::list_trashed_files),
        )
        .route("/file/{file_id}", get(FileController::get_file_content))
        .route("/file-details", get(FileController::get_file_details))
        .route("/rename-file", post(FileController::rename_file))
        .route("/move-file", post(FileController::move_file))
        .route("/trash-file", post(FileController::trash_file))
        .route("/update-file-color", post(FileController::update_file_color))
        .route(
            "/update-file-properties",
            post(FileController::update_file_properties),
        )
        .route("/create-folder", post(FolderController::create_folder))
        .route(
            "/ensure-trash-folder",
            post(FolderController::ensure_trash_folder),
        )
        .route(
            "/update-folder-color",
            post(FolderController::update_folder_color),
        )
        .route("/share-file", post(SharingController::share_file))
        .route(
            "/create-sharing-link",
            post(SharingController::create_sharing_link),
        );

    if settings.static_dir.is_dir() {
        info!("Serving static files from {}", settings.static_dir.display());
        router = router.fallback_service(ServeDir::new(&settings.static_dir));
    }

    router
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(settings.cors_allowed_origins.as_deref()))
        .with_state(app_state)
}
