mod test_helpers;

use tandem_core::{Initiator, SessionRecord, SessionStore, TrackChange};
use tandem_storage::{session, LocalStorageContext};
use test_helpers::*;

fn change(title: &str, by: Initiator) -> TrackChange {
    TrackChange {
        title: title.to_string(),
        artist: "Artist".to_string(),
        changed_at_epoch_ms: 1_700_000_000_000,
        changed_by: by,
    }
}

#[tokio::test]
async fn test_no_session_by_default() {
    let db = TestDb::new().await;
    assert!(session::get(db.pool()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_without_session_does_not_create() {
    let db = TestDb::new().await;

    let updated = session::update_track(db.pool(), &change("Song", Initiator::System))
        .await
        .unwrap();

    assert!(updated.is_none());
    assert!(session::get(db.pool()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_start_then_update() {
    let db = TestDb::new().await;
    let record = SessionRecord::new("partner-7", "First", "Artist", 1_000);
    session::start(db.pool(), &record).await.unwrap();

    let stored = session::get(db.pool()).await.unwrap().unwrap();
    assert_eq!(stored, record);
    assert_eq!(stored.changed_by, None);

    let updated = session::update_track(db.pool(), &change("Second", Initiator::User))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.partner_id, "partner-7");
    assert_eq!(updated.started_at_epoch_ms, 1_000);
    assert_eq!(updated.track_title, "Second");
    assert_eq!(updated.changed_at_epoch_ms, Some(1_700_000_000_000));
    assert_eq!(updated.changed_by, Some(Initiator::User));
    assert_eq!(session::get(db.pool()).await.unwrap(), Some(updated));
}

#[tokio::test]
async fn test_start_replaces_existing_session() {
    let db = TestDb::new().await;
    session::start(db.pool(), &SessionRecord::new("a", "T1", "A1", 1))
        .await
        .unwrap();
    session::start(db.pool(), &SessionRecord::new("b", "T2", "A2", 2))
        .await
        .unwrap();

    let stored = session::get(db.pool()).await.unwrap().unwrap();
    assert_eq!(stored.partner_id, "b");
    assert_eq!(stored.track_title, "T2");
}

#[tokio::test]
async fn test_end_session() {
    let db = TestDb::new().await;
    assert!(!session::end(db.pool()).await.unwrap());

    session::start(db.pool(), &SessionRecord::new("a", "T", "A", 1))
        .await
        .unwrap();
    assert!(session::end(db.pool()).await.unwrap());
    assert!(session::get(db.pool()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_store_trait() {
    let db = TestDb::new().await;
    let storage = LocalStorageContext::new(db.pool().clone());

    assert!(storage
        .update_track(&change("Song", Initiator::System))
        .await
        .unwrap()
        .is_none());

    storage
        .start(SessionRecord::new("p", "Old", "Old", 5))
        .await
        .unwrap();
    let updated = storage
        .update_track(&change("Song", Initiator::System))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.changed_by, Some(Initiator::System));
    assert!(storage.end().await.unwrap());
}
