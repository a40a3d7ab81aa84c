use axum::body::to_bytes;
use serde_json::Value;

use super::*;

async fn render(err: ApiError) -> (StatusCode, Option<HeaderValue>, Value) {
    let response = err.into_response();
    let status = response.status();
    let retry_after = response.headers().get(RETRY_AFTER).cloned();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, retry_after, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn unauthorized_renders_code_and_message() {
    let (status, _, body) = render(ApiError::unauthorized(INVALID_CREDENTIALS)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"code": 401, "message": "Invalid credentials."}));
}

#[tokio::test]
async fn validation_renders_error_list() {
    let (status, _, body) = render(ApiError::Validation(vec!["Email already used".into()])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Email already used"]}));
}

#[tokio::test]
async fn throttled_sets_retry_after() {
    let err = ApiError::from(ThrottleError::TooManyAttempts { retry_after_secs: 42 });
    let (status, retry_after, body) = render(err).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(retry_after.unwrap(), "42");
    assert_eq!(body["code"], 429);
}

#[tokio::test]
async fn internal_errors_hide_detail() {
    let (status, _, body) = render(ApiError::Internal("pool exhausted at 10.0.0.3".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal server error");
}

#[test]
fn token_errors_map_to_unauthorized() {
    assert!(matches!(ApiError::from(TokenError::Expired), ApiError::Unauthorized(m) if m == "Expired JWT Token"));
    assert!(matches!(ApiError::from(TokenError::Invalid), ApiError::Unauthorized(m) if m == "Invalid JWT Token"));
    assert!(matches!(ApiError::from(TokenError::Sign("x".into())), ApiError::Internal(_)));
}

#[test]
fn duplicate_store_error_is_internal_status() {
    assert_eq!(ApiError::from(StoreError::Duplicate).status(), StatusCode::INTERNAL_SERVER_ERROR);
}
