use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use spotibridge::{Res, error::Error, management::SleepTimerManager};

async fn noop() -> Res<()> {
    Ok(())
}

#[tokio::test]
async fn test_remaining_seconds_after_create() {
    let mgr = SleepTimerManager::new();
    let id = mgr.create(2.0, noop()).await.unwrap();

    // Immediately after creation the remaining time is the full duration,
    // give or take the second that may have ticked over.
    let remaining = mgr.remaining_seconds(&id).await.unwrap();
    assert!(
        (119..=120).contains(&remaining),
        "expected ~120s remaining, got {}",
        remaining
    );

    // Unknown ids report absence, not zero
    assert_eq!(mgr.remaining_seconds("timer_0_0").await, None);

    mgr.cancel_all().await;
}

#[tokio::test]
async fn test_non_positive_duration_is_rejected() {
    let mgr = SleepTimerManager::new();

    for bad in [0.0, -1.0, -0.5] {
        let err = mgr.create(bad, noop()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidDuration(_)));
    }

    // Rejected before any state mutation
    assert!(mgr.list().await.is_empty());
}

#[tokio::test]
async fn test_cancel_semantics() {
    let mgr = SleepTimerManager::new();
    let id = mgr.create(5.0, noop()).await.unwrap();

    assert!(mgr.get(&id).await.is_some());
    assert!(mgr.cancel(&id).await);
    assert!(mgr.list().await.is_empty());
    assert!(mgr.get(&id).await.is_none());

    // Second cancel of the same id is a no-op, not an error
    assert!(!mgr.cancel(&id).await);
    assert!(!mgr.cancel("never-existed").await);
}

#[tokio::test]
async fn test_cancel_all_counts() {
    let mgr = SleepTimerManager::new();
    for _ in 0..3 {
        mgr.create(10.0, noop()).await.unwrap();
    }

    assert_eq!(mgr.list().await.len(), 3);
    assert_eq!(mgr.cancel_all().await, 3);
    assert!(mgr.list().await.is_empty());
    assert_eq!(mgr.cancel_all().await, 0);
}

#[tokio::test]
async fn test_timer_fires_once_and_is_reaped() {
    let mgr = SleepTimerManager::new();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&fired);
    let id = mgr
        .create(0.002, async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(mgr.list().await.is_empty());
    assert_eq!(mgr.remaining_seconds(&id).await, None);
    assert!(!mgr.cancel(&id).await);
}

#[tokio::test]
async fn test_failing_action_leaves_no_zombie() {
    let mgr = SleepTimerManager::new();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&fired);
    mgr.create(0.002, async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(Error::NotAuthenticated)
    })
    .await
    .unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;

    // The action ran and failed; the registry must still be clean
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(mgr.list().await.is_empty());
}

#[tokio::test]
async fn test_ids_are_unique_under_rapid_creation() {
    let mgr = SleepTimerManager::new();
    let mut ids = HashSet::new();

    // Many of these land in the same millisecond; the per-process counter
    // keeps them distinct anyway.
    for _ in 0..50 {
        let id = mgr.create(5.0, noop()).await.unwrap();
        assert!(ids.insert(id), "duplicate timer id generated");
    }

    assert_eq!(mgr.cancel_all().await, 50);
}

#[tokio::test]
async fn test_cancel_beats_fire() {
    let mgr = SleepTimerManager::new();
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&fired);
    let id = mgr
        .create(0.001, async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap();

    assert!(mgr.cancel(&id).await);
    tokio::time::sleep(Duration::from_millis(250)).await;

    // The cancelled action never ran
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert!(mgr.list().await.is_empty());
}

#[tokio::test]
async fn test_timer_record_fields() {
    let mgr = SleepTimerManager::new();
    let id = mgr.create(1.5, noop()).await.unwrap();

    let timer = mgr.get(&id).await.unwrap();
    assert_eq!(timer.id, id);
    assert_eq!(timer.duration_minutes, 1.5);
    assert!(timer.scheduled_at > 0);
    assert!(!timer.scheduled_at_rfc3339().is_empty());

    mgr.cancel_all().await;
}
