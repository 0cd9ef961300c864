use super::*;

#[test]
fn chat_error_not_found_maps_to_404() {
    let err = ApiError::from(ChatError::NotFound(9));
    assert!(matches!(err, ApiError::ChatNotFound(9)));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[test]
fn chat_error_database_maps_to_500() {
    let err = ApiError::from(ChatError::Database(sqlx::Error::PoolTimedOut));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn validation_maps_to_422() {
    let err = ApiError::from(ValidationError::body("title", "string_too_short", "empty".into()));
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn into_response_uses_status() {
    let response = ApiError::ChatNotFound(1).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ApiError::Database(sqlx::Error::PoolClosed).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
