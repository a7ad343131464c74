use crate::domain::{models::integration::Integration, ports::IntegrationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresIntegrationRepo {
    pool: PgPool,
}

impl PostgresIntegrationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IntegrationRepository for PostgresIntegrationRepo {
    async fn upsert(&self, integration: &Integration) -> Result<Integration, AppError> {
        sqlx::query_as::<_, Integration>(
            "INSERT INTO integrations (id, workspace_id, provider, access_token, refresh_token, expires_at, metadata_json, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (workspace_id, provider) DO UPDATE SET \
               access_token = excluded.access_token, \
               refresh_token = COALESCE(excluded.refresh_token, integrations.refresh_token), \
               expires_at = excluded.expires_at, \
               metadata_json = excluded.metadata_json, \
               updated_at = excluded.updated_at \
             RETURNING *"
        )
            .bind(&integration.id)
            .bind(&integration.workspace_id)
            .bind(&integration.provider)
            .bind(&integration.access_token)
            .bind(&integration.refresh_token)
            .bind(integration.expires_at)
            .bind(&integration.metadata_json)
            .bind(integration.created_at)
            .bind(integration.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find(&self, workspace_id: &str, provider: &str) -> Result<Option<Integration>, AppError> {
        sqlx::query_as::<_, Integration>(
            "SELECT * FROM integrations WHERE workspace_id = $1 AND provider = $2"
        )
            .bind(workspace_id)
            .bind(provider)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<Integration>, AppError> {
        sqlx::query_as::<_, Integration>(
            "SELECT * FROM integrations WHERE workspace_id = $1 ORDER BY provider ASC"
        )
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, workspace_id: &str, provider: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM integrations WHERE workspace_id = $1 AND provider = $2")
            .bind(workspace_id)
            .bind(provider)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
