use std::sync::Arc;

use campus::{Campus, Error, Role, SqliteRepositoryProvider, ThrottleConfig, TokenConfig};
use campus_core::error::AuthError;
use sqlx::SqlitePool;

// Test secret for HS256
const TEST_HS256_SECRET: &[u8] = b"this_is_a_test_secret_key_for_hs256_tokens_not_for_prod";

async fn setup() -> (Campus<SqliteRepositoryProvider>, SqlitePool) {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    let repositories = Arc::new(SqliteRepositoryProvider::new(pool.clone()));

    let campus = Campus::new(
        repositories,
        TokenConfig::new_hs256(TEST_HS256_SECRET.to_vec()).with_issuer("campus-test"),
    );
    campus.migrate().await.unwrap();

    (campus, pool)
}

/// Shift every ledger row into the past, as if `seconds` had elapsed.
async fn age_attempts(pool: &SqlitePool, seconds: i64) {
    sqlx::query("UPDATE login_attempts SET attempted_at = attempted_at - ?1")
        .bind(seconds)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_register_and_login() {
    let (campus, _pool) = setup().await;

    // Register returns a token and persists a hashed credential
    let (admin, token_a) = campus.register("admin", "secret").await.unwrap();
    assert_eq!(admin.username, "admin");
    assert_ne!(admin.password_hash, "secret");

    let claims = campus.verify_token(&token_a).unwrap();
    assert_eq!(claims.sub, "admin");
    assert!(claims.has_role(Role::Admin));

    // Login returns a fresh, valid token
    let (_, token_b) = campus.login("admin", "secret", "1.2.3.4").await.unwrap();
    let claims = campus.verify_token(&token_b).unwrap();
    assert_eq!(claims.sub, "admin");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (campus, _pool) = setup().await;

    campus.register("admin", "secret").await.unwrap();
    let result = campus.register("admin", "other").await;
    assert!(matches!(
        result,
        Err(Error::Auth(AuthError::UsernameTaken))
    ));
}

#[tokio::test]
async fn test_login_wrong_password_is_generic_401() {
    let (campus, _pool) = setup().await;
    campus.register("admin", "secret").await.unwrap();

    let wrong_password = campus.login("admin", "wrong", "1.2.3.4").await;
    let unknown_user = campus.login("ghost", "secret", "1.2.3.4").await;

    // Both failure modes produce the same error
    assert!(matches!(
        wrong_password,
        Err(Error::Auth(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        unknown_user,
        Err(Error::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_throttle_end_to_end() {
    let (campus, pool) = setup().await;
    campus.register("admin", "secret").await.unwrap();

    // Five wrong passwords from the same address: each is checked before
    // the ledger reaches the threshold, so each is invalid-credentials
    for _ in 0..5 {
        let result = campus.login("admin", "wrong", "1.2.3.4").await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::InvalidCredentials))
        ));
    }

    // The ledger now holds five recent failures: subsequent attempts are
    // throttled before any credential check, wrong password or not
    let result = campus.login("admin", "wrong", "1.2.3.4").await;
    assert!(matches!(result, Err(Error::Auth(AuthError::Throttled))));

    let result = campus.login("admin", "secret", "1.2.3.4").await;
    assert!(matches!(result, Err(Error::Auth(AuthError::Throttled))));

    // Once the failures age past the 60-second window, the correct
    // password succeeds and returns a fresh token
    age_attempts(&pool, 61).await;

    let (_, token) = campus.login("admin", "secret", "1.2.3.4").await.unwrap();
    let claims = campus.verify_token(&token).unwrap();
    assert_eq!(claims.sub, "admin");
}

#[tokio::test]
async fn test_success_clears_only_matching_pair() {
    let (campus, pool) = setup().await;
    campus.register("admin", "secret").await.unwrap();

    for _ in 0..4 {
        let _ = campus.login("admin", "wrong", "1.2.3.4").await;
    }
    // Failures from a second address stay on the ledger
    for _ in 0..3 {
        let _ = campus.login("admin", "wrong", "5.6.7.8").await;
    }

    // Correct password after 4 failures for this pair succeeds
    campus.login("admin", "secret", "1.2.3.4").await.unwrap();

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM login_attempts WHERE username = 'admin'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 3);

    let cleared: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM login_attempts WHERE username = 'admin' AND ip_address = '1.2.3.4'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(cleared, 0);
}

#[tokio::test]
async fn test_throttle_blocks_ip_across_usernames() {
    let (campus, _pool) = setup().await;
    campus.register("admin", "secret").await.unwrap();

    // One address probing five different usernames
    for i in 0..5 {
        let _ = campus
            .login(&format!("probe{i}"), "wrong", "1.2.3.4")
            .await;
    }

    // The real account is now unreachable from that address...
    let result = campus.login("admin", "secret", "1.2.3.4").await;
    assert!(matches!(result, Err(Error::Auth(AuthError::Throttled))));

    // ...but reachable from anywhere else
    campus.login("admin", "secret", "9.9.9.9").await.unwrap();
}

#[tokio::test]
async fn test_throttle_config_is_respected() {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    let repositories = Arc::new(SqliteRepositoryProvider::new(pool));

    let campus = Campus::with_throttle_config(
        repositories,
        TokenConfig::new_hs256(TEST_HS256_SECRET.to_vec()),
        ThrottleConfig {
            max_attempts: 2,
            ..ThrottleConfig::default()
        },
    );
    campus.migrate().await.unwrap();
    campus.register("admin", "secret").await.unwrap();

    let _ = campus.login("admin", "wrong", "1.2.3.4").await;
    let _ = campus.login("admin", "wrong", "1.2.3.4").await;

    let result = campus.login("admin", "secret", "1.2.3.4").await;
    assert!(matches!(result, Err(Error::Auth(AuthError::Throttled))));
}

#[tokio::test]
async fn test_token_rejected_with_wrong_key() {
    let (campus, _pool) = setup().await;
    let (_, token) = campus.register("admin", "secret").await.unwrap();

    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    let other = Campus::new(
        Arc::new(SqliteRepositoryProvider::new(pool)),
        TokenConfig::new_hs256(b"a_completely_different_secret_key".to_vec()),
    );

    assert!(other.verify_token(&token).is_err());
}
