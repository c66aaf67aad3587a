use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::{Claims, SubjectId};
use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity extracted from a verified bearer token.
///
/// Handlers that scope rows to "my own" data must use `subject` and nothing
/// the client sent in the query string.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub subject: SubjectId,
    pub role: Option<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
        let claims = state.verifier.verify(token)?;
        Ok(AuthUser::from(claims))
    }
}

/// Requires the configured admin role. Rejects with 403 otherwise.
pub struct RequireAdmin(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.has_role(&state.config.security.admin_role) {
            tracing::warn!(subject = user.subject, role = ?user.role, "admin route refused");
            return Err(ApiError::Forbidden);
        }
        Ok(RequireAdmin(user))
    }
}

/// Token from `Authorization: Bearer <token>`, or `None` when absent, not
/// bearer, or empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
