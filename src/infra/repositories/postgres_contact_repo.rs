use crate::domain::{models::contact::Contact, ports::ContactRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresContactRepo {
    pool: PgPool,
}

impl PostgresContactRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepo {
    async fn create(&self, contact: &Contact) -> Result<Contact, AppError> {
        sqlx::query_as::<_, Contact>(
            "INSERT INTO contacts (id, workspace_id, name, email, phone, note, last_seen_at, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *"
        )
            .bind(&contact.id)
            .bind(&contact.workspace_id)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.note)
            .bind(contact.last_seen_at)
            .bind(contact.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE workspace_id = $1 AND id = $2"
        )
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, workspace_id: &str, email: &str) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE workspace_id = $1 AND email = $2"
        )
            .bind(workspace_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_phone(&self, workspace_id: &str, phone: &str) -> Result<Option<Contact>, AppError> {
        sqlx::query_as::<_, Contact>(
            "SELECT * FROM contacts WHERE workspace_id = $1 AND phone = $2"
        )
            .bind(workspace_id)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn search(&self, workspace_id: &str, query: Option<&str>) -> Result<Vec<Contact>, AppError> {
        match query {
            Some(q) => {
                let pattern = format!("%{}%", q);
                sqlx::query_as::<_, Contact>(
                    "SELECT * FROM contacts WHERE workspace_id = $1 AND (name ILIKE $2 OR email ILIKE $2 OR phone LIKE $2) ORDER BY created_at DESC"
                )
                    .bind(workspace_id)
                    .bind(&pattern)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Contact>(
                    "SELECT * FROM contacts WHERE workspace_id = $1 ORDER BY created_at DESC"
                )
                    .bind(workspace_id)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
        }
    }

    async fn update(&self, contact: &Contact) -> Result<Contact, AppError> {
        sqlx::query_as::<_, Contact>(
            "UPDATE contacts SET name=$1, email=$2, phone=$3, note=$4, last_seen_at=$5 WHERE workspace_id=$6 AND id=$7 RETURNING *"
        )
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.note)
            .bind(contact.last_seen_at)
            .bind(&contact.workspace_id)
            .bind(&contact.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn touch_last_seen_by_phone(&self, phone: &str, at: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE contacts SET last_seen_at = $1 WHERE phone = $2")
            .bind(at)
            .bind(phone)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM contacts WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.0)
    }
}
