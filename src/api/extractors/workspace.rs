use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Span;

use crate::api::extractors::auth::bearer_token;
use crate::domain::models::{account::VerifiedAccount, member::Member};
use crate::error::AppError;
use crate::state::AppState;

/// Verified caller together with their membership row in the `{workspace_id}`
/// path workspace. Rejects with 403 when the account is not a member.
pub struct WorkspaceMember {
    pub workspace_id: String,
    pub member: Member,
    pub account: VerifiedAccount,
}

impl WorkspaceMember {
    pub fn is_admin(&self) -> bool {
        self.member.role == "OWNER" || self.member.role == "ADMIN"
    }
}

impl FromRequestParts<Arc<AppState>> for WorkspaceMember {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let account = state.identity.verify(&token).await?;

        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Missing workspace id".into()))?;

        let workspace_id = params
            .get("workspace_id")
            .ok_or(AppError::Validation("Missing workspace id".into()))?
            .clone();

        let member = state
            .member_repo
            .find(&workspace_id, &account.id)
            .await?
            .ok_or(AppError::Forbidden("Not a member of this workspace".into()))?;

        Span::current().record("workspace_id", workspace_id.as_str());
        Span::current().record("account_id", account.id.as_str());

        Ok(WorkspaceMember { workspace_id, member, account })
    }
}
