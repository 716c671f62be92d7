//! Single top-level rejection handler shared by both services

use std::convert::Infallible;

use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::error::FocusFlowError;

/// HTTP status for a crate error
pub fn status_for(err: &FocusFlowError) -> StatusCode {
    match err {
        FocusFlowError::Unauthenticated | FocusFlowError::InvalidCredentials => {
            StatusCode::UNAUTHORIZED
        }
        FocusFlowError::NotFoundOrForbidden | FocusFlowError::NotFound(_) => StatusCode::NOT_FOUND,
        FocusFlowError::Conflict(_) => StatusCode::CONFLICT,
        FocusFlowError::ValidationError(_) => StatusCode::BAD_REQUEST,
        FocusFlowError::TokenError(_)
        | FocusFlowError::StorageError(_)
        | FocusFlowError::SystemError(_)
        | FocusFlowError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert any rejection into a JSON `{"error": ...}` reply.
///
/// Internal errors still carry their own message; unrecognised rejections get a
/// generic one.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<FocusFlowError>() {
        let code = status_for(e);
        if code == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", e);
        }
        (code, e.to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content length required".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        code,
    ))
}
