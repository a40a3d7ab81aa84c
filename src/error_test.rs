use super::*;

#[test]
fn status_error_exposes_code() {
    let err = ApiError::Status { status: 503, path: "/user".into(), body: String::new() };
    assert_eq!(err.status(), Some(503));
    assert!(!err.is_unauthorized());
}

#[test]
fn unauthorized_detected_only_for_401() {
    let err = ApiError::Status { status: 401, path: "/api/widgets".into(), body: "{}".into() };
    assert!(err.is_unauthorized());
    assert!(!ApiError::Transport("connection refused".into()).is_unauthorized());
}

#[test]
fn non_http_errors_have_no_status() {
    assert_eq!(ApiError::Transport("timeout".into()).status(), None);
    assert_eq!(ApiError::Validation(vec!["x".into()]).status(), None);
    assert_eq!(ApiError::Decode("eof".into()).status(), None);
    assert_eq!(ApiError::Config("bad url".into()).status(), None);
}

#[test]
fn display_includes_path_and_status() {
    let err = ApiError::Status { status: 401, path: "/token/refresh".into(), body: String::new() };
    assert_eq!(err.to_string(), "/token/refresh returned status 401");
}

#[test]
fn validation_display_joins_messages() {
    let err = ApiError::Validation(vec!["Email already used".into(), "Password should not be blank.".into()]);
    assert_eq!(
        err.to_string(),
        "validation failed: Email already used; Password should not be blank."
    );
}
