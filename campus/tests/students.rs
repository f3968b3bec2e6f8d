use std::sync::Arc;

use campus::{
    Campus, Error, Level, SortDirection, SqliteRepositoryProvider, StudentSortKey, StudentUpdate,
    TokenConfig,
};
use campus_core::error::StorageError;
use sqlx::SqlitePool;

const TEST_HS256_SECRET: &[u8] = b"this_is_a_test_secret_key_for_hs256_tokens_not_for_prod";

async fn setup() -> Campus<SqliteRepositoryProvider> {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    let repositories = Arc::new(SqliteRepositoryProvider::new(pool));

    let campus = Campus::new(
        repositories,
        TokenConfig::new_hs256(TEST_HS256_SECRET.to_vec()),
    );
    campus.migrate().await.unwrap();
    campus
}

#[tokio::test]
async fn test_student_crud() {
    let campus = setup().await;

    let student = campus.create_student("jane.doe", Level::Junior).await.unwrap();
    assert_eq!(student.level, Level::Junior);

    let fetched = campus.get_student(&student.id).await.unwrap();
    assert_eq!(fetched.username, "jane.doe");

    let updated = campus
        .update_student(
            &student.id,
            StudentUpdate {
                username: None,
                level: Some(Level::Senior),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username, "jane.doe");
    assert_eq!(updated.level, Level::Senior);

    campus.delete_student(&student.id).await.unwrap();
    let result = campus.get_student(&student.id).await;
    assert!(matches!(
        result,
        Err(Error::Storage(StorageError::NotFound))
    ));
}

#[tokio::test]
async fn test_duplicate_student_username_conflicts() {
    let campus = setup().await;

    campus.create_student("jane", Level::Freshman).await.unwrap();
    let result = campus.create_student("jane", Level::Senior).await;
    assert!(matches!(
        result,
        Err(Error::Storage(StorageError::Constraint(_)))
    ));
}

#[tokio::test]
async fn test_list_search_filter() {
    let campus = setup().await;

    campus.create_student("alice", Level::Freshman).await.unwrap();
    campus.create_student("bob", Level::Senior).await.unwrap();
    campus.create_student("carol", Level::Senior).await.unwrap();

    let page = campus
        .list_students(0, 2, Some((StudentSortKey::Username, SortDirection::Desc)))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].username, "carol");

    let page = campus.search_students("AL", 0, 10).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].username, "alice");

    let page = campus
        .filter_students_by_level(Level::Senior, 0, 10)
        .await
        .unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_csv_import_and_export() {
    let campus = setup().await;
    campus.create_student("existing", Level::Senior).await.unwrap();

    let csv = "username,level\nexisting,FRESHMAN\nnew.student,JUNIOR\nno.level,\n";
    let report = campus.import_students_csv(csv.as_bytes()).await.unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 1);

    // The skipped row did not overwrite the existing record
    let page = campus.search_students("existing", 0, 10).await.unwrap();
    assert_eq!(page.items[0].level, Level::Senior);

    // Blank level defaulted to freshman
    let page = campus.search_students("no.level", 0, 10).await.unwrap();
    assert_eq!(page.items[0].level, Level::Freshman);

    let bytes = campus.export_students_csv().await.unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("username,level\n"));
    assert!(text.contains("new.student,JUNIOR"));
    assert_eq!(text.lines().count(), 4);
}

#[tokio::test]
async fn test_admin_management() {
    let campus = setup().await;

    let admin = campus.create_admin("root", "secret").await.unwrap();
    assert!(admin.password_hash.starts_with("$argon2"));

    let fetched = campus.get_admin_by_username("root").await.unwrap();
    assert_eq!(fetched.id, admin.id);

    // An admin created through management can log in
    campus.login("root", "secret", "1.2.3.4").await.unwrap();

    campus.delete_admin(&admin.id).await.unwrap();
    let result = campus.get_admin_by_username("root").await;
    assert!(matches!(
        result,
        Err(Error::Storage(StorageError::NotFound))
    ));
}
