use super::*;

// =============================================================================
// env_bool / env_parse: unique env var names avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on", "TRUE", " On "].iter().enumerate() {
        let key = format!("__TEST_SRV_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__TEST_SRV_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_invalid_or_unset_returns_none() {
    let key = "__TEST_SRV_EB_INVALID_4411__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_bool("__TEST_SRV_EB_UNSET_4412__"), None);
}

#[test]
fn env_parse_reads_value() {
    let key = "__TEST_SRV_EP_VALUE_5521__";
    unsafe { std::env::set_var(key, " 42 ") };
    assert_eq!(env_parse(key, 7_u64), 42);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_falls_back_on_garbage() {
    let key = "__TEST_SRV_EP_GARBAGE_5522__";
    unsafe { std::env::set_var(key, "forty-two") };
    assert_eq!(env_parse(key, 7_u32), 7);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_parse("__TEST_SRV_EP_UNSET_5523__", 9_usize), 9);
}

// =============================================================================
// validate_jwt_secret
// =============================================================================

#[test]
fn jwt_secret_required() {
    assert_eq!(validate_jwt_secret(None), Err(ConfigError::MissingEnv("JWT_SECRET")));
    assert_eq!(validate_jwt_secret(Some(String::new())), Err(ConfigError::MissingEnv("JWT_SECRET")));
}

#[test]
fn jwt_secret_too_short_rejected() {
    assert_eq!(validate_jwt_secret(Some("short".into())), Err(ConfigError::WeakSecret));
}

#[test]
fn jwt_secret_long_enough_accepted() {
    let secret = "k".repeat(MIN_JWT_SECRET_LEN);
    assert_eq!(validate_jwt_secret(Some(secret.clone())), Ok(secret));
}

#[test]
fn debug_output_redacts_secrets() {
    let cfg = ServerConfig {
        port: DEFAULT_PORT,
        database_url: Some("postgres://user:hunter2@db/app".into()),
        db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        jwt_secret: "super-secret-value-that-is-long-enough".into(),
        access_ttl: Duration::from_secs(DEFAULT_JWT_TOKEN_TTL_SECS),
        refresh_ttl: Duration::from_secs(DEFAULT_REFRESH_TOKEN_TTL_SECS),
        cookie_secure: false,
        cors_allow_origin: DEFAULT_CORS_ALLOW_ORIGIN.into(),
        api_version: DEFAULT_API_VERSION.into(),
        throttle_max_attempts: DEFAULT_LOGIN_THROTTLE_MAX_ATTEMPTS,
        throttle_window: Duration::from_secs(DEFAULT_LOGIN_THROTTLE_WINDOW_SECS),
    };
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains("super-secret"));
}
