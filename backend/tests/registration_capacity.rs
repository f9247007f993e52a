//! Concurrency property tests for the registration capacity guard.
//!
//! The store-level conditional insert must keep `registered_count` at or
//! below capacity even when many registrations race at the boundary.

use std::sync::Arc;

use backend::domain::ports::{
    AttendanceCommand, MeetupRepository, NewUserRecord, UserRepository,
};
use backend::domain::{
    AttendanceService, Capacity, EmailAddress, ErrorCode, Meetup, MeetupDraft, UserId, Username,
};
use backend::test_support::InMemoryStore;
use chrono::{Duration, Utc};
use futures::future::join_all;
use mockable::DefaultClock;
use uuid::Uuid;

async fn seeded_store_with_meetup(capacity: i32) -> (Arc<InMemoryStore>, Uuid) {
    let store = Arc::new(InMemoryStore::new());
    let host_id = UserId::random();
    let now = Utc::now();

    UserRepository::insert(
        store.as_ref(),
        &NewUserRecord {
            id: host_id,
            username: Username::new("host_user").expect("valid username"),
            email: EmailAddress::new("host@example.org").expect("valid email"),
            password_hash: "hashed:hunter2".to_owned(),
            created_at: now,
        },
    )
    .await
    .expect("host insert succeeds");

    let meetup = Meetup::new(MeetupDraft {
        id: Uuid::new_v4(),
        title: "Contended meetup".to_owned(),
        description: "Everyone wants in".to_owned(),
        date: now + Duration::days(1),
        location: "Small room".to_owned(),
        category: "tech".to_owned(),
        capacity: Capacity::new(capacity).expect("valid capacity"),
        host_id,
        created_at: now,
    })
    .expect("valid meetup");
    let meetup_id = meetup.id();
    MeetupRepository::insert(store.as_ref(), &meetup)
        .await
        .expect("meetup insert succeeds");

    (store, meetup_id)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_registrations_never_exceed_capacity() {
    const CAPACITY: i32 = 10;
    const CONTENDERS: usize = 25;

    let (store, meetup_id) = seeded_store_with_meetup(CAPACITY).await;
    let service = Arc::new(AttendanceService::new(store.clone(), Arc::new(DefaultClock)));

    let tasks = (0..CONTENDERS).map(|_| {
        let service = service.clone();
        tokio::spawn(async move {
            let user_id = UserId::random();
            service.register(&user_id, meetup_id).await
        })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    let capacity_failures = results
        .iter()
        .filter(|result| {
            result.as_ref().is_err_and(|err| {
                err.code() == ErrorCode::InvalidRequest
                    && err.details().and_then(|d| d.get("code"))
                        == Some(&serde_json::json!("capacity_exceeded"))
            })
        })
        .count();

    assert_eq!(successes, CAPACITY as usize);
    assert_eq!(capacity_failures, CONTENDERS - CAPACITY as usize);
    assert_eq!(store.registration_count(meetup_id), CAPACITY as usize);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_duplicate_registrations_insert_one_row() {
    let (store, meetup_id) = seeded_store_with_meetup(10).await;
    let service = Arc::new(AttendanceService::new(store.clone(), Arc::new(DefaultClock)));
    let user_id = UserId::random();

    let tasks = (0..8).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.register(&user_id, meetup_id).await })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(successes, 1);
    assert_eq!(store.registration_count(meetup_id), 1);
}
