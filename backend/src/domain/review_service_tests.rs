//! Tests for the review service.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MeetupRecord, MockMeetupRepository, MockRegistrationRepository, MockReviewRepository,
    ReviewWithAuthor,
};
use crate::domain::{Capacity, ErrorCode, Meetup, MeetupDraft, Username};
use crate::test_support::FrozenClock;

fn fixture_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-06-01T12:00:00Z")
        .expect("valid fixture timestamp")
        .with_timezone(&Utc)
}

fn meetup_at(date: DateTime<Utc>) -> Meetup {
    Meetup::new(MeetupDraft {
        id: Uuid::new_v4(),
        title: "Rust meetup".to_owned(),
        description: "Monthly get-together".to_owned(),
        date,
        location: "Community hall".to_owned(),
        category: "tech".to_owned(),
        capacity: Capacity::new(10).expect("valid capacity"),
        host_id: UserId::random(),
        created_at: date - Duration::days(30),
    })
    .expect("valid meetup")
}

fn record(meetup: Meetup) -> MeetupRecord {
    MeetupRecord {
        meetup,
        host_name: Username::new("host_user").expect("valid username"),
        registered_count: 1,
    }
}

fn submission(meetup_id: Uuid, rating: i32, comment: &str) -> SubmitReview {
    SubmitReview {
        meetup_id,
        rating,
        comment: comment.to_owned(),
    }
}

struct Mocks {
    meetups: MockMeetupRepository,
    registrations: MockRegistrationRepository,
    reviews: MockReviewRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            meetups: MockMeetupRepository::new(),
            registrations: MockRegistrationRepository::new(),
            reviews: MockReviewRepository::new(),
        }
    }

    fn into_service(
        self,
        now: DateTime<Utc>,
    ) -> ReviewService<MockMeetupRepository, MockRegistrationRepository, MockReviewRepository>
    {
        ReviewService::new(
            Arc::new(self.meetups),
            Arc::new(self.registrations),
            Arc::new(self.reviews),
            Arc::new(FrozenClock::at(now)),
        )
    }
}

#[rstest]
#[case(0)]
#[case(6)]
#[case(-2)]
#[tokio::test]
async fn submit_rejects_out_of_range_rating_without_touching_the_store(#[case] rating: i32) {
    let mut mocks = Mocks::new();
    mocks.meetups.expect_find_by_id().times(0);
    mocks.reviews.expect_upsert().times(0);

    let err = mocks
        .into_service(fixture_now())
        .submit_review(&UserId::random(), submission(Uuid::new_v4(), rating, "Fine"))
        .await
        .expect_err("invalid rating rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|d| d.get("code")),
        Some(&serde_json::json!("invalid_rating"))
    );
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn submit_rejects_blank_comment(#[case] comment: &str) {
    let mut mocks = Mocks::new();
    mocks.meetups.expect_find_by_id().times(0);

    let err = mocks
        .into_service(fixture_now())
        .submit_review(&UserId::random(), submission(Uuid::new_v4(), 4, comment))
        .await
        .expect_err("blank comment rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|d| d.get("code")),
        Some(&serde_json::json!("invalid_comment"))
    );
}

#[tokio::test]
async fn submit_maps_missing_meetup_to_not_found() {
    let mut mocks = Mocks::new();
    mocks
        .meetups
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));

    let err = mocks
        .into_service(fixture_now())
        .submit_review(&UserId::random(), submission(Uuid::new_v4(), 4, "Fine"))
        .await
        .expect_err("missing meetup rejected");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn submit_for_future_meetup_is_forbidden_even_when_registered() {
    let now = fixture_now();
    let meetup = meetup_at(now + Duration::days(1));
    let meetup_id = meetup.id();

    let mut mocks = Mocks::new();
    mocks
        .meetups
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(record(meetup))));
    // The date gate fires first, so registration is never consulted.
    mocks.registrations.expect_exists().times(0);
    mocks.reviews.expect_upsert().times(0);

    let err = mocks
        .into_service(now)
        .submit_review(&UserId::random(), submission(meetup_id, 4, "Fine"))
        .await
        .expect_err("future meetup rejected");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(
        err.details().and_then(|d| d.get("code")),
        Some(&serde_json::json!("not_eligible"))
    );
}

#[tokio::test]
async fn submit_without_registration_is_forbidden_after_the_date() {
    let now = fixture_now();
    let meetup = meetup_at(now - Duration::days(1));
    let meetup_id = meetup.id();

    let mut mocks = Mocks::new();
    mocks
        .meetups
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(record(meetup))));
    mocks
        .registrations
        .expect_exists()
        .times(1)
        .return_once(|_, _| Ok(false));
    mocks.reviews.expect_upsert().times(0);

    let err = mocks
        .into_service(now)
        .submit_review(&UserId::random(), submission(meetup_id, 4, "Fine"))
        .await
        .expect_err("non-attendee rejected");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn submit_by_attendee_upserts_with_last_modified_timestamp() {
    let now = fixture_now();
    let meetup = meetup_at(now - Duration::days(1));
    let meetup_id = meetup.id();
    let user_id = UserId::random();

    let mut mocks = Mocks::new();
    mocks
        .meetups
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(record(meetup))));
    mocks
        .registrations
        .expect_exists()
        .times(1)
        .return_once(|_, _| Ok(true));
    mocks
        .reviews
        .expect_upsert()
        .times(1)
        .withf(move |review| {
            review.meetup_id() == meetup_id
                && review.rating().get() == 4
                && review.comment().as_ref() == "Great"
                && review.created_at() == now
        })
        .return_once(|review| Ok(review.clone()));

    let payload = mocks
        .into_service(now)
        .submit_review(&user_id, submission(meetup_id, 4, "Great"))
        .await
        .expect("submission succeeds");

    assert_eq!(payload.rating, 4);
    assert_eq!(payload.comment, "Great");
    assert_eq!(payload.user_id, user_id);
    assert_eq!(payload.created_at, now);
}

#[tokio::test]
async fn resubmission_returns_the_stored_row() {
    let now = fixture_now();
    let meetup = meetup_at(now - Duration::days(1));
    let meetup_id = meetup.id();
    let user_id = UserId::random();
    let stored_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks
        .meetups
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(record(meetup))));
    mocks
        .registrations
        .expect_exists()
        .times(1)
        .return_once(|_, _| Ok(true));
    // The adapter keeps the original row id on conflict; the service must
    // return what was stored, not what it attempted to insert.
    mocks.reviews.expect_upsert().times(1).return_once(move |review| {
        Ok(Review::new(
            stored_id,
            *review.user_id(),
            review.meetup_id(),
            review.rating(),
            review.comment().clone(),
            review.created_at(),
        ))
    });

    let payload = mocks
        .into_service(now)
        .submit_review(&user_id, submission(meetup_id, 2, "Actually mediocre"))
        .await
        .expect("resubmission succeeds");

    assert_eq!(payload.id, stored_id);
    assert_eq!(payload.rating, 2);
}

#[tokio::test]
async fn list_reviews_maps_missing_meetup_to_not_found() {
    let mut mocks = Mocks::new();
    mocks
        .meetups
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.reviews.expect_list_for_meetup().times(0);

    let err = mocks
        .into_service(fixture_now())
        .list_reviews(Uuid::new_v4())
        .await
        .expect_err("missing meetup rejected");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn list_reviews_includes_author_names() {
    let now = fixture_now();
    let meetup = meetup_at(now - Duration::days(1));
    let meetup_id = meetup.id();
    let user_id = UserId::random();

    let review = Review::new(
        Uuid::new_v4(),
        user_id,
        meetup_id,
        Rating::new(5).expect("valid rating"),
        ReviewComment::new("Great").expect("valid comment"),
        now - Duration::hours(1),
    );

    let mut mocks = Mocks::new();
    mocks
        .meetups
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(record(meetup))));
    mocks
        .reviews
        .expect_list_for_meetup()
        .times(1)
        .return_once(move |_| {
            Ok(vec![ReviewWithAuthor {
                review,
                author: Username::new("ada_lovelace").expect("valid username"),
            }])
        });

    let payloads = mocks
        .into_service(now)
        .list_reviews(meetup_id)
        .await
        .expect("listing succeeds");

    assert_eq!(payloads.len(), 1);
    let entry = payloads.first().expect("one entry");
    assert_eq!(entry.username, "ada_lovelace");
    assert_eq!(entry.rating, 5);
    assert_eq!(entry.user_id, user_id);
}
