use crate::errors::ServiceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Turns an extractor rejection into a 400 carrying the rejection text
pub fn map_rejection<R: std::fmt::Display>(rejection: R) -> ServiceError {
    ServiceError::InvalidArgument(rejection.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_helpers_set_status() {
        assert_eq!(success_response("ok").status(), StatusCode::OK);
        assert_eq!(created_response("ok").status(), StatusCode::CREATED);
        assert_eq!(no_content_response().status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn rejections_become_bad_request() {
        let err = map_rejection("Failed to parse the request body");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
