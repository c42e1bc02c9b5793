//! One `#[transaction]` per request the fleet script sends. Each is recorded under its
//! function name; a non-2xx status counts as an error.
use crate::fixtures::{Credentials, NewCar, NewUser};
use drover::prelude::*;

#[transaction]
pub async fn login(client: &HttpClient, credentials: Credentials<'_>) -> Result<Reply, HttpError> {
    client
        .send(client.post("/login").json(&credentials))
        .await?
        .error_for_status()
}

#[transaction]
pub async fn logout(client: &HttpClient, session: &Session) -> Result<Reply, HttpError> {
    client
        .send(session.apply(client.post("/logout")))
        .await?
        .error_for_status()
}

#[transaction]
pub async fn create_car(
    client: &HttpClient,
    session: &Session,
    car: &NewCar,
) -> Result<Reply, HttpError> {
    client
        .send(session.apply(client.post("/car").json(car)))
        .await?
        .error_for_status()
}

#[transaction]
pub async fn delete_car(client: &HttpClient, session: &Session, id: &str) -> Result<Reply, HttpError> {
    client
        .send(session.apply(client.delete(&format!("/car/{id}"))))
        .await?
        .error_for_status()
}

#[transaction]
pub async fn list_cars(client: &HttpClient, session: &Session) -> Result<Reply, HttpError> {
    client
        .send(session.apply(client.get("/car")))
        .await?
        .error_for_status()
}

#[transaction]
pub async fn list_users(client: &HttpClient, session: &Session) -> Result<Reply, HttpError> {
    client
        .send(session.apply(client.get("/user")))
        .await?
        .error_for_status()
}

#[transaction]
pub async fn register_user(client: &HttpClient, user: &NewUser) -> Result<Reply, HttpError> {
    client
        .send(client.post("/user").json(user))
        .await?
        .error_for_status()
}

#[transaction]
pub async fn delete_user(client: &HttpClient, session: &Session) -> Result<Reply, HttpError> {
    client
        .send(session.apply(client.delete("/user")))
        .await?
        .error_for_status()
}
