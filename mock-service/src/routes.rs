use crate::{
    auth::Caller,
    error::ApiError,
    store::{Car, Credentials, NewCar, NewUser, User},
    AppState,
};
use axum::{
    debug_handler,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

#[debug_handler]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(credentials) = payload?;
    let token = state.store.write()?.login(&credentials)?;
    debug!(email = %credentials.email, "login");
    Ok(Json(json!({ "token": token })))
}

#[debug_handler]
pub async fn logout(State(state): State<AppState>, caller: Caller) -> Result<StatusCode, ApiError> {
    state.store.write()?.logout(&caller.token);
    Ok(StatusCode::OK)
}

#[debug_handler]
pub async fn list_cars(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<Car>>, ApiError> {
    Ok(Json(state.store.read()?.cars_of(&caller.user_id)))
}

#[debug_handler]
pub async fn add_car(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<NewCar>, JsonRejection>,
) -> Result<Json<Car>, ApiError> {
    // A payload of the wrong shape (e.g. a numeric year) is just another invalid car.
    let Json(new_car) = payload.map_err(|_| ApiError::InvalidCar)?;
    let car = state.store.write()?.add_car(&caller.user_id, new_car)?;
    debug!(id = %car.id, plate = %car.plate, "car registered");
    Ok(Json(car))
}

#[debug_handler]
pub async fn delete_car(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.write()?.delete_car(&caller.user_id, &id);
    Ok(StatusCode::OK)
}

#[debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.store.read()?.users()))
}

#[debug_handler]
pub async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(new_user) = payload?;
    let user = state.store.write()?.register(new_user)?;
    debug!(email = %user.email, "user registered");
    Ok(Json(user))
}

/// Deletes the calling account.
#[debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<StatusCode, ApiError> {
    state.store.write()?.delete_user(&caller.user_id);
    Ok(StatusCode::OK)
}
