use database::{Database, DbError, handle};

// The registry is process-wide state, so the whole lifecycle is exercised
// in a single test to keep it independent of test ordering.
#[tokio::test]
async fn handle_lifecycle_is_initialize_once_share_everywhere() {
    // Before initialization the accessor must refuse to hand anything out.
    assert!(matches!(handle::get().unwrap_err(), DbError::NotInitialized));

    let db = Database::initialize(":memory:").await.unwrap();
    handle::install(db).unwrap();

    // Every later access path goes through the registry.
    let shared = handle::get().unwrap();
    shared
        .repository()
        .get_all_strategies()
        .await
        .expect("installed handle should be usable");

    // A second install is refused rather than silently replacing the handle.
    let other = Database::initialize(":memory:").await.unwrap();
    assert!(matches!(
        handle::install(other).unwrap_err(),
        DbError::AlreadyInitialized
    ));
}
