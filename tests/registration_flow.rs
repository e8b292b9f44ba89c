mod common;

use common::{seed_event, seed_user, setup_pool, EventSpec};
use gather::error::PipelineError;
use gather::services::registration_service;

#[tokio::test]
async fn register_creates_one_active_registration() {
    let pool = setup_pool().await;
    seed_user(&pool, "alice", false).await;
    let event_id = seed_event(&pool, EventSpec::default()).await;

    let registration = registration_service::register(
        &pool,
        &event_id,
        "alice",
        Some(r#"{"diet":"vegetarian"}"#),
    )
    .await
    .expect("first registration succeeds");

    assert_eq!(registration.event_id, event_id);
    assert_eq!(registration.participant_id, "alice");
    assert!(registration.is_active());
    assert_eq!(
        registration.answers_json.as_deref(),
        Some(r#"{"diet":"vegetarian"}"#)
    );

    let rows = registration_service::list_registrations(&pool, &event_id)
        .await
        .expect("list");
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn duplicate_register_conflicts() {
    let pool = setup_pool().await;
    seed_user(&pool, "alice", false).await;
    let event_id = seed_event(&pool, EventSpec::default()).await;

    registration_service::register(&pool, &event_id, "alice", None)
        .await
        .expect("first registration succeeds");

    let err = registration_service::register(&pool, &event_id, "alice", None)
        .await
        .expect_err("second registration conflicts");
    assert!(matches!(err, PipelineError::InvalidState(_)));
    assert!(err.to_string().contains("already registered"));
}

#[tokio::test]
async fn cancel_then_reregister_reuses_the_same_row() {
    let pool = setup_pool().await;
    seed_user(&pool, "alice", false).await;
    let event_id = seed_event(&pool, EventSpec::default()).await;

    let first = registration_service::register(&pool, &event_id, "alice", None)
        .await
        .expect("register");

    let cancelled = registration_service::unregister(&pool, &event_id, "alice")
        .await
        .expect("unregister");
    assert_eq!(cancelled.registration_id, first.registration_id);
    assert!(!cancelled.is_active());

    let reactivated =
        registration_service::register(&pool, &event_id, "alice", Some(r#"{"late":true}"#))
            .await
            .expect("re-register");
    assert_eq!(reactivated.registration_id, first.registration_id);
    assert!(reactivated.is_active());
    assert_eq!(reactivated.answers_json.as_deref(), Some(r#"{"late":true}"#));

    let rows = registration_service::list_registrations(&pool, &event_id)
        .await
        .expect("list");
    assert_eq!(rows.len(), 1, "re-registration must not insert a second row");
}

#[tokio::test]
async fn second_cancel_is_not_found() {
    let pool = setup_pool().await;
    seed_user(&pool, "alice", false).await;
    let event_id = seed_event(&pool, EventSpec::default()).await;

    registration_service::register(&pool, &event_id, "alice", None)
        .await
        .expect("register");
    registration_service::unregister(&pool, &event_id, "alice")
        .await
        .expect("first unregister succeeds");

    let err = registration_service::unregister(&pool, &event_id, "alice")
        .await
        .expect_err("second unregister fails");
    assert!(matches!(err, PipelineError::NotFound(_)));
}

#[tokio::test]
async fn capacity_is_enforced_and_released_by_cancellation() {
    let pool = setup_pool().await;
    for user in ["alice", "bob", "carol"] {
        seed_user(&pool, user, false).await;
    }
    let event_id = seed_event(
        &pool,
        EventSpec {
            max_participants: Some(2),
            ..EventSpec::default()
        },
    )
    .await;

    registration_service::register(&pool, &event_id, "alice", None)
        .await
        .expect("alice fits");
    registration_service::register(&pool, &event_id, "bob", None)
        .await
        .expect("bob fits");

    let err = registration_service::register(&pool, &event_id, "carol", None)
        .await
        .expect_err("carol is over capacity");
    assert!(matches!(err, PipelineError::InvalidState(_)));
    assert!(err.to_string().contains("capacity"));

    registration_service::unregister(&pool, &event_id, "alice")
        .await
        .expect("alice leaves");

    registration_service::register(&pool, &event_id, "carol", None)
        .await
        .expect("freed capacity lets carol in");
}

#[tokio::test]
async fn registration_window_is_enforced_on_both_sides() {
    let pool = setup_pool().await;
    seed_user(&pool, "alice", false).await;

    let not_started = seed_event(
        &pool,
        EventSpec {
            starts_in_hours: 1,
            ends_in_hours: 2,
            ..EventSpec::default()
        },
    )
    .await;
    let err = registration_service::register(&pool, &not_started, "alice", None)
        .await
        .expect_err("window not open yet");
    assert!(matches!(err, PipelineError::InvalidState(_)));
    assert!(err.to_string().contains("not started"));

    let ended = seed_event(
        &pool,
        EventSpec {
            starts_in_hours: -2,
            ends_in_hours: -1,
            ..EventSpec::default()
        },
    )
    .await;
    let err = registration_service::register(&pool, &ended, "alice", None)
        .await
        .expect_err("window already closed");
    assert!(matches!(err, PipelineError::InvalidState(_)));
    assert!(err.to_string().contains("ended"));
}

#[tokio::test]
async fn unknown_event_is_not_found_for_every_operation() {
    let pool = setup_pool().await;
    seed_user(&pool, "alice", false).await;

    let err = registration_service::register(&pool, "missing-event", "alice", None)
        .await
        .expect_err("register");
    assert!(matches!(err, PipelineError::NotFound(_)));

    let err = registration_service::unregister(&pool, "missing-event", "alice")
        .await
        .expect_err("unregister");
    assert!(matches!(err, PipelineError::NotFound(_)));

    let err = registration_service::list_registrations(&pool, "missing-event")
        .await
        .expect_err("list");
    assert!(matches!(err, PipelineError::NotFound(_)));
}

#[tokio::test]
async fn listing_shows_cancelled_rows_alongside_active_ones() {
    let pool = setup_pool().await;
    seed_user(&pool, "alice", false).await;
    seed_user(&pool, "bob", false).await;
    let event_id = seed_event(&pool, EventSpec::default()).await;

    registration_service::register(&pool, &event_id, "alice", None)
        .await
        .expect("alice registers");
    registration_service::register(&pool, &event_id, "bob", None)
        .await
        .expect("bob registers");
    registration_service::unregister(&pool, &event_id, "bob")
        .await
        .expect("bob cancels");

    let rows = registration_service::list_registrations(&pool, &event_id)
        .await
        .expect("list");
    assert_eq!(rows.len(), 2);

    let bob = rows
        .iter()
        .find(|r| r.participant_id == "bob")
        .expect("bob's row survives cancellation");
    assert!(!bob.is_active());
}
