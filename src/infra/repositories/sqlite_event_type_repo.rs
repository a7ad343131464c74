use crate::domain::{models::event_type::EventType, ports::EventTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventTypeRepo {
    pool: SqlitePool,
}

impl SqliteEventTypeRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventTypeRepository for SqliteEventTypeRepo {
    async fn create(&self, event_type: &EventType) -> Result<EventType, AppError> {
        sqlx::query_as::<_, EventType>(
            "INSERT INTO event_types (id, workspace_id, slug, title, description, duration_min, timezone, location_kind, capacity, min_notice_min, availability_json, active, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&event_type.id)
            .bind(&event_type.workspace_id)
            .bind(&event_type.slug)
            .bind(&event_type.title)
            .bind(&event_type.description)
            .bind(event_type.duration_min)
            .bind(&event_type.timezone)
            .bind(&event_type.location_kind)
            .bind(event_type.capacity)
            .bind(event_type.min_notice_min)
            .bind(&event_type.availability_json)
            .bind(event_type.active)
            .bind(event_type.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE workspace_id = ? AND id = ?"
        )
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, workspace_id: &str, slug: &str) -> Result<Option<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE workspace_id = ? AND slug = ?"
        )
            .bind(workspace_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, workspace_id: &str) -> Result<Vec<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE workspace_id = ? ORDER BY created_at ASC"
        )
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self, workspace_id: &str) -> Result<Vec<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE workspace_id = ? AND active = 1 ORDER BY created_at ASC"
        )
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event_type: &EventType) -> Result<EventType, AppError> {
        sqlx::query_as::<_, EventType>(
            "UPDATE event_types SET slug=?, title=?, description=?, duration_min=?, timezone=?, location_kind=?, capacity=?, min_notice_min=?, availability_json=?, active=? \
             WHERE workspace_id=? AND id=? RETURNING *"
        )
            .bind(&event_type.slug)
            .bind(&event_type.title)
            .bind(&event_type.description)
            .bind(event_type.duration_min)
            .bind(&event_type.timezone)
            .bind(&event_type.location_kind)
            .bind(event_type.capacity)
            .bind(event_type.min_notice_min)
            .bind(&event_type.availability_json)
            .bind(event_type.active)
            .bind(&event_type.workspace_id)
            .bind(&event_type.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM event_types WHERE workspace_id = ? AND id = ?")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
