use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, workspace_id, event_type_id, contact_id, start_time, end_time, status, notes, meeting_url, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *"
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
            "SELECT * FROM bookings WHERE workspace_id = $1 AND id = $2"
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
                    "SELECT * FROM bookings WHERE workspace_id = $1 AND event_type_id = $2 ORDER BY start_time DESC"
                )
                    .bind(workspace_id)
                    .bind(et_id)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings WHERE workspace_id = $1 ORDER BY start_time DESC"
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
            "SELECT * FROM bookings WHERE event_type_id = $1 AND status = 'CONFIRMED' AND start_time < $2 AND end_time > $3"
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
            "UPDATE bookings SET contact_id=$1, start_time=$2, end_time=$3, status=$4, notes=$5, meeting_url=$6 WHERE workspace_id=$7 AND id=$8 RETURNING *"
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
        sqlx::query("DELETE FROM bookings WHERE workspace_id = $1 AND id = $2")
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
