use axum::{extract::FromRequestParts, http::request::Parts};

use crate::builds::Principal;
use crate::entity::user::ADMIN_ROLE;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.user_id,
            role: self.role.clone(),
        }
    }

    /// Returns `Ok(())` if the user has the given role, `Err(Forbidden)` otherwise.
    pub fn require_role(&self, role: &str) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden("Insufficient permissions".into()))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        self.require_role(ADMIN_ROLE)
    }
}

fn bearer_token(parts: &Parts) -> Option<Result<&str, AppError>> {
    let header = parts.headers.get("Authorization")?;
    Some(
        header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::TokenInvalid),
    )
}

fn decode(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims =
        jwt::verify(token, &state.config.auth.jwt_secret).map_err(|_| AppError::TokenInvalid)?;
    Ok(AuthUser {
        user_id: claims.uid,
        username: claims.sub,
        role: claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::TokenMissing)??;
        decode(token, state)
    }
}

/// Optional authentication for endpoints that anonymous callers may use.
///
/// A missing, malformed or expired token yields an anonymous caller rather
/// than a rejection.
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn principal(&self) -> Option<Principal> {
        self.0.as_ref().map(AuthUser::principal)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(parts) {
            Some(Ok(token)) => match decode(token, state) {
                Ok(user) => Some(user),
                Err(_) => {
                    tracing::debug!("Ignoring invalid bearer token on optional-auth route");
                    None
                }
            },
            _ => None,
        };
        Ok(MaybeAuthUser(user))
    }
}
