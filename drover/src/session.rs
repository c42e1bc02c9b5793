use reqwest::{header::AUTHORIZATION, RequestBuilder};

/// Per-user session state: at most one active Authorization header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    authorization: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session already holding `bearer <token>`.
    pub fn with_bearer(token: &str) -> Self {
        let mut session = Self::new();
        session.set_bearer(token);
        session
    }

    /// Replace the active Authorization header with `bearer <token>`.
    pub fn set_bearer(&mut self, token: &str) {
        self.authorization = Some(format!("bearer {token}"));
    }

    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn is_authorized(&self) -> bool {
        self.authorization.is_some()
    }

    pub fn clear(&mut self) -> Option<String> {
        self.authorization.take()
    }

    /// Attach the Authorization header, if any.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }
}
