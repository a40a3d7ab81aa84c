use super::*;

#[test]
fn default_role_always_first_and_unique() {
    assert_eq!(with_default_role(vec![]), vec![ROLE_USER]);
    assert_eq!(
        with_default_role(vec!["ROLE_ADMIN".into(), ROLE_USER.into(), "ROLE_ADMIN".into()]),
        vec![ROLE_USER, "ROLE_ADMIN"]
    );
}

#[test]
fn user_record_serializes_without_password_hash() {
    let user = UserRecord {
        id: Uuid::nil(),
        email: "a@b.com".into(),
        password_hash: "$argon2id$secret".into(),
        roles: vec![ROLE_USER.into()],
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"id": "00000000-0000-0000-0000-000000000000", "email": "a@b.com", "roles": ["ROLE_USER"]})
    );
}

// =============================================================================
// MemoryAuthStore
// =============================================================================

#[tokio::test]
async fn memory_create_and_find_user() {
    let store = MemoryAuthStore::new();
    let created = store.create_user("a@b.com", "hash").await.unwrap();

    assert_eq!(created.roles, vec![ROLE_USER]);
    assert_eq!(store.find_user(created.id).await.unwrap(), Some(created.clone()));
    assert_eq!(store.find_user_by_email("a@b.com").await.unwrap(), Some(created));
    assert_eq!(store.find_user_by_email("other@b.com").await.unwrap(), None);
}

#[tokio::test]
async fn memory_duplicate_email_rejected() {
    let store = MemoryAuthStore::new();
    store.create_user("a@b.com", "hash").await.unwrap();

    let err = store.create_user("a@b.com", "hash2").await.unwrap_err();
    assert!(matches!(err, StoreError::Duplicate));
}

#[tokio::test]
async fn memory_refresh_token_lifecycle() {
    let store = MemoryAuthStore::new();
    let user_id = Uuid::new_v4();

    store.save_refresh_token("digest", user_id, Duration::from_secs(60)).await.unwrap();
    assert_eq!(store.find_refresh_token("digest").await.unwrap(), Some(user_id));

    store.delete_refresh_token("digest").await.unwrap();
    assert_eq!(store.find_refresh_token("digest").await.unwrap(), None);
}

#[tokio::test]
async fn memory_expired_refresh_token_is_absent() {
    let store = MemoryAuthStore::new();
    store.save_refresh_token("digest", Uuid::new_v4(), Duration::ZERO).await.unwrap();
    assert_eq!(store.find_refresh_token("digest").await.unwrap(), None);
}

#[tokio::test]
async fn memory_delete_unknown_token_is_ok() {
    let store = MemoryAuthStore::new();
    assert!(store.delete_refresh_token("missing").await.is_ok());
}

#[tokio::test]
async fn memory_status_reports_driver() {
    let status = MemoryAuthStore::new().status().await.unwrap();
    assert_eq!(status.driver, "memory");
    assert_eq!(status.database, "memory");
}
