use super::*;

#[test]
fn parses_request_with_global_credentials_after_subcommand() {
    let cli = Cli::try_parse_from([
        "vsb",
        "--base-url",
        "http://localhost:8000/api",
        "request",
        "/widgets",
        "--method",
        "post",
        "--data",
        "{\"a\":1}",
        "--email",
        "ada@example.com",
        "--password",
        "pw",
    ])
    .unwrap();

    assert_eq!(cli.base_url, "http://localhost:8000/api");
    assert_eq!(cli.login.email.as_deref(), Some("ada@example.com"));
    match cli.command {
        Command::Request { path, method, data } => {
            assert_eq!(path, "/widgets");
            assert_eq!(method, "post");
            assert_eq!(data.as_deref(), Some("{\"a\":1}"));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn parses_kebab_case_db_status() {
    let cli = Cli::try_parse_from(["vsb", "db-status"]).unwrap();
    assert!(matches!(cli.command, Command::DbStatus));
}

#[test]
fn credentials_need_both_fields() {
    let only_email = LoginArgs { email: Some("a@b.co".into()), password: None };
    assert!(only_email.credentials().is_none());

    let both = LoginArgs { email: Some("a@b.co".into()), password: Some("pw".into()) };
    let creds = both.credentials().unwrap();
    assert_eq!(creds.email, "a@b.co");
    assert_eq!(creds.password, "pw");
}

#[test]
fn parse_method_is_case_insensitive() {
    assert_eq!(parse_method("patch").unwrap(), Method::PATCH);
    assert_eq!(parse_method("DELETE").unwrap(), Method::DELETE);
    assert!(matches!(parse_method("TRACE"), Err(CliError::InvalidMethod(m)) if m == "TRACE"));
}

#[test]
fn render_body_pretty_prints_json_and_passes_text_through() {
    assert_eq!(render_body("{\"ok\":true}"), "{\n  \"ok\": true\n}");
    assert_eq!(render_body("plain text"), "plain text");
}

#[tokio::test]
async fn register_without_credentials_fails_before_any_request() {
    let session = SessionManager::from_config(&ClientConfig::new("http://127.0.0.1:9").unwrap()).unwrap();
    let err = run_register(&session, &LoginArgs::default()).await.unwrap_err();
    assert!(matches!(err, CliError::MissingCredentials));
}
