use crate::{error::ApiError, AppState};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// The authenticated account behind a request's bearer token.
#[derive(Clone, Debug)]
pub struct Caller {
    pub user_id: String,
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::Unauthorized)?;

        let store = state.store.read()?;
        let user_id = store
            .authenticate(token)
            .ok_or(ApiError::Unauthorized)?
            .to_string();

        Ok(Caller {
            user_id,
            token: token.to_string(),
        })
    }
}

/// `bearer <token>`, with the scheme matched case-insensitively.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
