use crate::domain::{models::workspace::Workspace, ports::WorkspaceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteWorkspaceRepo {
    pool: SqlitePool,
}

impl SqliteWorkspaceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceRepository for SqliteWorkspaceRepo {
    async fn create(&self, workspace: &Workspace) -> Result<Workspace, AppError> {
        sqlx::query_as::<_, Workspace>(
            "INSERT INTO workspaces (id, name, slug, logo_url, owner_account_id, settings_json, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&workspace.id)
            .bind(&workspace.name)
            .bind(&workspace.slug)
            .bind(&workspace.logo_url)
            .bind(&workspace.owner_account_id)
            .bind(&workspace.settings_json)
            .bind(workspace.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Workspace>, AppError> {
        sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Workspace>, AppError> {
        sqlx::query_as::<_, Workspace>("SELECT * FROM workspaces WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, workspace: &Workspace) -> Result<Workspace, AppError> {
        sqlx::query_as::<_, Workspace>(
            "UPDATE workspaces SET name=?, slug=?, logo_url=?, settings_json=? WHERE id=? RETURNING *"
        )
            .bind(&workspace.name)
            .bind(&workspace.slug)
            .bind(&workspace.logo_url)
            .bind(&workspace.settings_json)
            .bind(&workspace.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM workspaces WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Workspace>, AppError> {
        sqlx::query_as::<_, Workspace>(
            "SELECT * FROM workspaces ORDER BY created_at DESC LIMIT ? OFFSET ?"
        )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workspaces")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.0)
    }
}
