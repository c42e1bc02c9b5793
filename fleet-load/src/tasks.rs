//! The weighted behaviour of one simulated fleet user.
//!
//! Every task ends with a logout, which also drops the bearer header from the session. Tasks
//! that need authorization log in again first when the session is empty.
use crate::{
    api,
    fixtures::{self, CarRecord, LoginResponse, ADMIN},
};
use drover::prelude::*;
use tracing::debug;

#[task]
pub async fn on_start(user: &mut VirtualUser) -> TaskResult {
    ensure_login(user).await
}

#[task(8)]
pub async fn car_register(user: &mut VirtualUser) -> TaskResult {
    ensure_login(user).await?;
    let outcome = register_then_delete_car(user.client(), user.session()).await;
    end_session(user).await?;
    outcome
}

#[task(5)]
pub async fn car_list(user: &mut VirtualUser) -> TaskResult {
    ensure_login(user).await?;
    let listed = api::list_cars(user.client(), user.session()).await;
    end_session(user).await?;
    listed?;
    Ok(())
}

#[task(4)]
pub async fn user_list(user: &mut VirtualUser) -> TaskResult {
    ensure_login(user).await?;
    let listed = api::list_users(user.client(), user.session()).await;
    end_session(user).await?;
    listed?;
    Ok(())
}

#[task(3)]
pub async fn user_register(user: &mut VirtualUser) -> TaskResult {
    let outcome = register_then_delete_user(user.client()).await;
    ensure_login(user).await?;
    end_session(user).await?;
    outcome
}

/// Log in as the admin unless the session already carries a bearer header.
pub async fn ensure_login(user: &mut VirtualUser) -> TaskResult {
    if user.session().is_authorized() {
        return Ok(());
    }

    let reply = api::login(user.client(), ADMIN).await?;
    let LoginResponse { token } = reply.json()?;
    user.session_mut().set_bearer(&token);
    debug!(user = user.id(), "Logged in");
    Ok(())
}

/// Send the logout and clear the session, even when the request fails.
pub async fn end_session(user: &mut VirtualUser) -> TaskResult {
    let res = api::logout(user.client(), user.session()).await;
    user.session_mut().clear();
    res?;
    Ok(())
}

/// The delete is skipped when the create fails.
async fn register_then_delete_car(client: &HttpClient, session: &Session) -> TaskResult {
    let reply = api::create_car(client, session, &fixtures::car()).await?;
    let car: CarRecord = reply.json()?;
    api::delete_car(client, session, &car.id).await?;
    Ok(())
}

/// Registration may collide with a concurrent user's; the login decides whether the account
/// gets deleted.
async fn register_then_delete_user(client: &HttpClient) -> TaskResult {
    let new_user = fixtures::user2();
    let registered = api::register_user(client, &new_user).await;

    let reply = api::login(client, new_user.credentials()).await?;
    let LoginResponse { token } = reply.json()?;
    api::delete_user(client, &Session::with_bearer(&token)).await?;

    registered?;
    Ok(())
}
