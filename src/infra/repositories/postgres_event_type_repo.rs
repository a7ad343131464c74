use crate::domain::{models::event_type::EventType, ports::EventTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventTypeRepo {
    pool: PgPool,
}

impl PostgresEventTypeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventTypeRepository for PostgresEventTypeRepo {
    async fn create(&self, event_type: &EventType) -> Result<EventType, AppError> {
        sqlx::query_as::<_, EventType>(
            "INSERT INTO event_types (id, workspace_id, slug, title, description, duration_min, timezone, location_kind, capacity, min_notice_min, availability_json, active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *"
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
            "SELECT * FROM event_types WHERE workspace_id = $1 AND id = $2"
        )
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, workspace_id: &str, slug: &str) -> Result<Option<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE workspace_id = $1 AND slug = $2"
        )
            .bind(workspace_id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, workspace_id: &str) -> Result<Vec<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE workspace_id = $1 ORDER BY created_at ASC"
        )
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_active(&self, workspace_id: &str) -> Result<Vec<EventType>, AppError> {
        sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE workspace_id = $1 AND active = TRUE ORDER BY created_at ASC"
        )
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event_type: &EventType) -> Result<EventType, AppError> {
        sqlx::query_as::<_, EventType>(
            "UPDATE event_types SET slug=$1, title=$2, description=$3, duration_min=$4, timezone=$5, location_kind=$6, capacity=$7, min_notice_min=$8, availability_json=$9, active=$10 \
             WHERE workspace_id=$11 AND id=$12 RETURNING *"
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
        sqlx::query("DELETE FROM event_types WHERE workspace_id = $1 AND id = $2")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
