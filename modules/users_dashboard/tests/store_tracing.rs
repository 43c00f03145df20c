//! Tests to verify that store operations emit the expected spans and events

mod common;

use tracing_test::traced_test;

use common::*;
use users_dashboard::contract::model::UserRecord;

#[traced_test]
#[tokio::test]
async fn load_emits_span_and_count() {
    let h = harness(MockRemote::new().with_users(seed_users(4)));

    h.store.load().await.unwrap();

    assert!(logs_contain("users_dashboard.store.load"));
    assert!(logs_contain("Loaded users"));
    assert!(logs_contain("count=4"));
}

#[traced_test]
#[tokio::test]
async fn local_update_logs_skipped_remote_call() {
    let h = loaded_harness(seed_users(1), MockRemote::new()).await;

    let _ = h
        .store
        .update(UserRecord::new(1_700_000_000_000, "A B", "a@b.co"))
        .await;

    assert!(logs_contain("users_dashboard.store.update"));
    assert!(logs_contain("Local-origin id, skipping remote call"));
}

#[traced_test]
#[tokio::test]
async fn failed_update_logs_unexpected_status() {
    let h = loaded_harness(seed_users(6), MockRemote::new().update_status(500)).await;

    let result = h.store.update(UserRecord::new(5, "X Y", "xy@example.com")).await;

    assert!(result.is_err());
    assert!(logs_contain("Unexpected response from server"));
    assert!(logs_contain("status=500"));
}

#[traced_test]
#[tokio::test]
async fn failed_delete_is_logged_with_cause() {
    let h = loaded_harness(seed_users(2), MockRemote::new().failing_delete()).await;

    let _ = h.store.delete(2).await;

    assert!(logs_contain("users_dashboard.store.delete"));
    assert!(logs_contain("Delete failed, keeping current list"));
    assert!(logs_contain("Unexpected HTTP status 404"));
}
