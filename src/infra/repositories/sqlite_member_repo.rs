use crate::domain::{models::member::Member, ports::MemberRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteMemberRepo {
    pool: SqlitePool,
}

impl SqliteMemberRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepo {
    async fn create(&self, member: &Member) -> Result<Member, AppError> {
        sqlx::query_as::<_, Member>(
            "INSERT INTO members (id, workspace_id, account_id, email, role, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&member.id)
            .bind(&member.workspace_id)
            .bind(&member.account_id)
            .bind(&member.email)
            .bind(&member.role)
            .bind(member.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find(&self, workspace_id: &str, account_id: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE workspace_id = ? AND account_id = ?"
        )
            .bind(workspace_id)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE workspace_id = ? AND id = ?"
        )
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_first_by_account(&self, account_id: &str) -> Result<Option<Member>, AppError> {
        sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE account_id = ? ORDER BY created_at ASC LIMIT 1"
        )
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_workspace(&self, workspace_id: &str) -> Result<Vec<Member>, AppError> {
        sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE workspace_id = ? ORDER BY created_at ASC"
        )
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_owners(&self, workspace_id: &str) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM members WHERE workspace_id = ? AND role = 'OWNER'"
        )
            .bind(workspace_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.0)
    }

    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM members WHERE workspace_id = ? AND id = ?")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
