mod utils;
#[allow(unused)]
use utils::*;

use drover::prelude::*;
use fleet_load::{
    api,
    fixtures::{self, CarRecord, Credentials, LoginResponse, UserRecord, ADMIN},
};
use ntest::timeout;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn admin_session(client: &HttpClient) -> Session {
    let reply = api::login(client, ADMIN).await.unwrap();
    let LoginResponse { token } = reply.json().unwrap();
    Session::with_bearer(&token)
}

fn status_of<T: std::fmt::Debug>(res: Result<T, HttpError>) -> StatusCode {
    match res {
        Err(HttpError::Status(status)) => status,
        other => panic!("Expected a status error, got {other:?}"),
    }
}

#[tokio::test]
#[timeout(10_000)]
async fn admin_login_authorizes_listing() {
    init();
    let client = mock_client().await;
    let session = admin_session(&client).await;

    let cars: Vec<CarRecord> = api::list_cars(&client, &session)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(cars.is_empty());

    let users: Vec<UserRecord> = api::list_users(&client, &session)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(users.iter().any(|user| user.email == ADMIN.email));
}

#[tokio::test]
#[timeout(10_000)]
async fn created_car_can_be_deleted() {
    init();
    let client = mock_client().await;
    let session = admin_session(&client).await;

    let car: CarRecord = api::create_car(&client, &session, &fixtures::car2())
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(!car.id.is_empty());
    assert_eq!(car.plate, "XXX-0000");

    api::delete_car(&client, &session, &car.id).await.unwrap();

    let cars: Vec<CarRecord> = api::list_cars(&client, &session)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(cars.iter().all(|listed| listed.id != car.id));
}

#[tokio::test]
#[timeout(10_000)]
async fn duplicate_plates_are_rejected() {
    init();
    let client = mock_client().await;
    let session = admin_session(&client).await;

    api::create_car(&client, &session, &fixtures::car())
        .await
        .unwrap();
    let res = api::create_car(&client, &session, &fixtures::car()).await;
    assert_eq!(status_of(res), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
#[timeout(10_000)]
async fn registered_user_can_log_in() {
    init();
    let client = mock_client().await;
    let admin = admin_session(&client).await;

    let new_user = fixtures::user2();
    api::register_user(&client, &new_user).await.unwrap();

    let reply = api::login(&client, new_user.credentials()).await.unwrap();
    let LoginResponse { token } = reply.json().unwrap();
    let session = Session::with_bearer(&token);
    assert_ne!(session, admin);

    let res = api::register_user(&client, &new_user).await;
    assert_eq!(status_of(res), StatusCode::CONFLICT);
}

#[tokio::test]
#[timeout(10_000)]
async fn deleted_user_cannot_log_in() {
    init();
    let client = mock_client().await;

    let new_user = fixtures::user2();
    api::register_user(&client, &new_user).await.unwrap();
    let reply = api::login(&client, new_user.credentials()).await.unwrap();
    let LoginResponse { token } = reply.json().unwrap();
    let session = Session::with_bearer(&token);

    api::delete_user(&client, &session).await.unwrap();

    let res = api::login(&client, new_user.credentials()).await;
    assert_eq!(status_of(res), StatusCode::UNAUTHORIZED);
    let res = api::list_cars(&client, &session).await;
    assert_eq!(status_of(res), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[timeout(10_000)]
async fn logout_invalidates_token() {
    init();
    let client = mock_client().await;
    let session = admin_session(&client).await;
    let other = admin_session(&client).await;

    api::logout(&client, &session).await.unwrap();

    let res = api::list_cars(&client, &session).await;
    assert_eq!(status_of(res), StatusCode::UNAUTHORIZED);
    // Only the token used to log out is revoked.
    api::list_cars(&client, &other).await.unwrap();
}

#[tokio::test]
#[timeout(10_000)]
async fn unauthorized_requests_are_rejected() {
    init();
    let client = mock_client().await;
    let anonymous = Session::new();
    let forged = Session::with_bearer("not-a-token");

    for session in [&anonymous, &forged] {
        let res = api::list_cars(&client, session).await;
        assert_eq!(status_of(res), StatusCode::UNAUTHORIZED);

        let res = api::create_car(&client, session, &fixtures::car()).await;
        assert_eq!(status_of(res), StatusCode::UNAUTHORIZED);

        let res = api::list_users(&client, session).await;
        assert_eq!(status_of(res), StatusCode::UNAUTHORIZED);

        let res = api::delete_user(&client, session).await;
        assert_eq!(status_of(res), StatusCode::UNAUTHORIZED);
    }

    // Registration is public.
    api::register_user(&client, &fixtures::user2()).await.unwrap();
}

#[tokio::test]
#[timeout(10_000)]
async fn wrong_password_is_rejected() {
    init();
    let client = mock_client().await;

    let res = api::login(
        &client,
        Credentials {
            email: ADMIN.email,
            password: "wrong",
        },
    )
    .await;
    assert_eq!(status_of(res), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[timeout(10_000)]
async fn numeric_year_is_an_invalid_car() {
    init();
    let client = mock_client().await;
    let session = admin_session(&client).await;

    let payload = json!({
        "brand": "Ford",
        "model": "Focus",
        "year": 2018,
        "plate": "XXX-0000",
        "odometer": 2,
    });
    let reply = client
        .send(session.apply(client.post("/car")).json(&payload))
        .await
        .unwrap();

    assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = reply.json().unwrap();
    assert!(body["error"].is_string());

    let cars: Vec<CarRecord> = api::list_cars(&client, &session)
        .await
        .unwrap()
        .json()
        .unwrap();
    assert!(cars.is_empty());
}

#[tokio::test]
#[timeout(10_000)]
async fn malformed_bodies_get_json_errors() {
    init();
    let client = mock_client().await;

    for path in ["/login", "/user"] {
        let reply = client
            .send(
                client
                    .post(path)
                    .header("content-type", "application/json")
                    .body("garbage"),
            )
            .await
            .unwrap();

        assert_eq!(reply.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = reply.json().unwrap();
        assert!(body["error"].is_string(), "{path}: {}", reply.text());
    }
}
