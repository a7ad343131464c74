use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tracing::Span;

use crate::domain::models::account::VerifiedAccount;
use crate::error::AppError;
use crate::state::AppState;

/// Verified caller, any role.
pub struct AuthAccount(pub VerifiedAccount);

/// Verified caller holding the SUPERADMIN role.
pub struct Superadmin(pub VerifiedAccount);

pub(crate) fn bearer_token(parts: &Parts) -> Result<String, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token.to_string())
}

impl FromRequestParts<Arc<AppState>> for AuthAccount {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let account = state.identity.verify(&token).await?;

        Span::current().record("account_id", account.id.as_str());

        Ok(AuthAccount(account))
    }
}

impl FromRequestParts<Arc<AppState>> for Superadmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let AuthAccount(account) = AuthAccount::from_request_parts(parts, state).await?;

        if !account.is_superadmin() {
            return Err(AppError::Forbidden("Superadmin role required".into()));
        }

        Ok(Superadmin(account))
    }
}
