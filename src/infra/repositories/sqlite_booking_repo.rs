use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, workspace_id, event_type_id, contact_id, start_time, end_time, status, notes, meeting_url, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&booking.id)
            .bind(&booking.workspace_id)
            .bind(&booking.event_type_id)
            .bind(&booking.contact_id)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(&booking.status)
            .bind(&booking.notes)
            .bind(&booking.meeting_url)
            .bind(booking.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, workspace_id: &str, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE workspace_id = ? AND id = ?"
        )
            .bind(workspace_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_workspace(&self, workspace_id: &str, event_type_id: Option<&str>) -> Result<Vec<Booking>, AppError> {
        match event_type_id {
            Some(et_id) => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings WHERE workspace_id = ? AND event_type_id = ? ORDER BY start_time DESC"
                )
                    .bind(workspace_id)
                    .bind(et_id)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings WHERE workspace_id = ? ORDER BY start_time DESC"
                )
                    .bind(workspace_id)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
        }
    }

    async fn list_confirmed_by_range(&self, event_type_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE event_type_id = ? AND status = 'CONFIRMED' AND start_time < ? AND end_time > ?"
        )
            .bind(event_type_id)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET contact_id=?, start_time=?, end_time=?, status=?, notes=?, meeting_url=? WHERE workspace_id=? AND id=? RETURNING *"
        )
            .bind(&booking.contact_id)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(&booking.status)
            .bind(&booking.notes)
            .bind(&booking.meeting_url)
            .bind(&booking.workspace_id)
            .bind(&booking.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, workspace_id: &str, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM bookings WHERE workspace_id = ? AND id = ?")
            .bind(workspace_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.0)
    }
}
