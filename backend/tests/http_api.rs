//! End-to-end scenarios driven through the full routing table.
//!
//! These run the real services and handlers over the in-memory store, so
//! they exercise everything except the SQL itself.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use backend::middleware::trace::TRACE_ID_HEADER;
use backend::test_support::{self, InMemoryStore};
use backend::{Trace, server};
use chrono::{DateTime, Duration, Utc};
use mockable::DefaultClock;
use serde_json::{Value, json};

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = web::Data::new(test_support::http_state(
        Arc::new(InMemoryStore::new()),
        Arc::new(DefaultClock),
    ));
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(server::api_scope())
}

async fn register_user(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> String {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "username": username,
                "email": format!("{username}@example.org"),
                "password": "hunter2",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    body["token"].as_str().expect("token present").to_owned()
}

async fn create_meetup(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    token: &str,
    date: DateTime<Utc>,
    capacity: i32,
) -> String {
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/meetups")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "title": "Rust meetup",
                "description": "A meetup for testing",
                "date": date.to_rfc3339(),
                "location": "Community hall",
                "category": "tech",
                "capacity": capacity,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    body["id"].as_str().expect("meetup id").to_owned()
}

#[actix_web::test]
async fn capacity_one_meetup_admits_one_user_at_a_time() {
    let app = actix_test::init_service(test_app()).await;
    let host = register_user(&app, "host_user").await;
    let user_a = register_user(&app, "user_a").await;
    let user_b = register_user(&app, "user_b").await;
    let meetup_id = create_meetup(&app, &host, Utc::now() + Duration::days(1), 1).await;
    let register_uri = format!("/api/v1/meetups/{meetup_id}/register");

    let call = |token: String, method: &'static str| {
        let uri = register_uri.clone();
        let request = match method {
            "POST" => actix_test::TestRequest::post(),
            _ => actix_test::TestRequest::delete(),
        };
        request
            .uri(&uri)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request()
    };

    let first = actix_test::call_service(&app, call(user_a.clone(), "POST")).await;
    assert_eq!(first.status(), StatusCode::OK);

    let rejected = actix_test::call_service(&app, call(user_b.clone(), "POST")).await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let freed = actix_test::call_service(&app, call(user_a, "DELETE")).await;
    assert_eq!(freed.status(), StatusCode::OK);

    let admitted = actix_test::call_service(&app, call(user_b, "POST")).await;
    assert_eq!(admitted.status(), StatusCode::OK);
}

#[actix_web::test]
async fn yesterdays_attendee_can_review_and_revise() {
    let app = actix_test::init_service(test_app()).await;
    let host = register_user(&app, "host_user").await;
    let user = register_user(&app, "user_a").await;
    let meetup_id = create_meetup(&app, &host, Utc::now() - Duration::days(1), 10).await;

    let registered = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/meetups/{meetup_id}/register"))
            .insert_header(("Authorization", format!("Bearer {user}")))
            .to_request(),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::OK);

    let review_uri = format!("/api/v1/meetups/{meetup_id}/reviews");
    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&review_uri)
            .insert_header(("Authorization", format!("Bearer {user}")))
            .set_json(json!({ "rating": 4, "comment": "Great" }))
            .to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let revised = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&review_uri)
            .insert_header(("Authorization", format!("Bearer {user}")))
            .set_json(json!({ "rating": 2, "comment": "Actually mediocre" }))
            .to_request(),
    )
    .await;
    assert_eq!(revised.status(), StatusCode::CREATED);

    let listing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri(&review_uri).to_request(),
    )
    .await;
    let entries: Value = actix_test::read_body_json(listing).await;
    let entries = entries.as_array().expect("array body").clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["rating"].as_i64(), Some(2));
}

#[actix_web::test]
async fn responses_carry_a_trace_id_header() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/meetups").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(TRACE_ID_HEADER));
}

#[actix_web::test]
async fn error_payloads_use_the_shared_envelope() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/meetups/00000000-0000-0000-0000-000000000001")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"].as_str(), Some("not_found"));
    assert!(body["message"].as_str().is_some());
    assert!(body["traceId"].as_str().is_some());
}
