use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = match self {
            ApplicationError::BadRequest(ref msg) => {
                warn!("Bad request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            ApplicationError::NotFound(ref msg) => {
                warn!("Not found: {}", msg);
                StatusCode::NOT_FOUND
            }
            ApplicationError::Remote(ref msg) => {
                error!("Remote provider error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApplicationError::InternalError(ref msg) => {
                error!("Internal server error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApplicationError::Failed {
                action,
                ref message,
            } => {
                error!("{}: {}", action, message);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
