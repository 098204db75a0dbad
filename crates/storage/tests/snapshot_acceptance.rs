use shared::domain::{User, UserId};
use storage::{CacheSnapshot, SnapshotCache, Storage};

#[tokio::test]
async fn snapshot_survives_reopening_the_cache_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("dashboard.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let snapshot = CacheSnapshot {
        users: vec![User {
            id: UserId(4),
            first_name: "Eve".to_string(),
            last_name: "Holt".to_string(),
            email: "eve.holt@reqres.in".to_string(),
            avatar: "https://reqres.in/img/faces/4-image.jpg".to_string(),
            job: "Unknown".to_string(),
        }],
        current_page: 2,
        total_pages: 2,
    };

    {
        let cache = SnapshotCache::new(Storage::new(&database_url).await.expect("db"));
        cache.save(&snapshot).await.expect("save");
        cache.storage().pool().close().await;
    }

    let cache = SnapshotCache::new(Storage::new(&database_url).await.expect("reopen"));
    let restored = cache.load().await.expect("load").expect("snapshot present");
    assert_eq!(restored, snapshot);

    cache.clear().await.expect("clear");
    assert_eq!(cache.load().await.expect("load"), None);
}
