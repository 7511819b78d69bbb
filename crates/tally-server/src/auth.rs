//! Bearer-token authentication.
//!
//! The routing layer's only job here is resolving request headers to a user
//! identity; everything downstream is keyed by that identity. Tokens come
//! from configuration and map straight to user ids.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use std::collections::HashMap;

use crate::AppState;
use crate::error::ApiError;

/// Resolves `Authorization` headers to user identities.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    tokens: HashMap<String, String>,
}

impl Authenticator {
    #[must_use]
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    /// Resolve a raw `Authorization` header value to a user id.
    ///
    /// Only the `Bearer <token>` scheme is recognized; anything else, or an
    /// unknown token, resolves to `None`.
    #[must_use]
    pub fn resolve(&self, authorization: Option<&str>) -> Option<String> {
        let token = authorization?.strip_prefix("Bearer ")?.trim();
        self.tokens.get(token).cloned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// The authenticated caller.
///
/// Extraction fails with 401 when the header is missing or the token is
/// unknown, so handlers never run for anonymous requests.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        state
            .auth
            .resolve(authorization)
            .map(|id| Self { id })
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::Authenticator;
    use std::collections::HashMap;

    fn authenticator() -> Authenticator {
        let mut tokens = HashMap::new();
        tokens.insert("alice-token".to_string(), "alice".to_string());
        Authenticator::new(tokens)
    }

    #[test]
    fn resolves_known_bearer_tokens() {
        let auth = authenticator();
        assert_eq!(
            auth.resolve(Some("Bearer alice-token")),
            Some("alice".to_string())
        );
    }

    #[test]
    fn rejects_missing_or_malformed_headers() {
        let auth = authenticator();
        assert_eq!(auth.resolve(None), None);
        assert_eq!(auth.resolve(Some("alice-token")), None);
        assert_eq!(auth.resolve(Some("Basic alice-token")), None);
    }

    #[test]
    fn rejects_unknown_tokens() {
        let auth = authenticator();
        assert_eq!(auth.resolve(Some("Bearer nope")), None);
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let auth = Authenticator::default();
        assert!(auth.is_empty());
        assert_eq!(auth.resolve(Some("Bearer anything")), None);
    }
}
