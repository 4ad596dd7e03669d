use crate::domain::{models::business::{Business, BusinessHours, ScheduleException}, ports::BusinessRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresBusinessRepo {
    pool: PgPool,
}

impl PostgresBusinessRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepository for PostgresBusinessRepo {
    async fn create(&self, business: &Business) -> Result<Business, AppError> {
        sqlx::query_as::<_, Business>(
            "INSERT INTO businesses (id, name, timezone, created_at) VALUES ($1, $2, $3, $4) RETURNING *"
        )
            .bind(&business.id).bind(&business.name).bind(&business.timezone).bind(business.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Business>, AppError> {
        sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn replace_hours(&self, business_id: &str, hours: &[BusinessHours]) -> Result<Vec<BusinessHours>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM business_hours WHERE business_id = $1")
            .bind(business_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let mut saved = Vec::with_capacity(hours.len());
        for row in hours {
            let inserted = sqlx::query_as::<_, BusinessHours>(
                "INSERT INTO business_hours (id, business_id, weekday, open_time, close_time) VALUES ($1, $2, $3, $4, $5) RETURNING *"
            )
                .bind(&row.id).bind(business_id).bind(&row.weekday).bind(&row.open_time).bind(&row.close_time)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
            saved.push(inserted);
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(saved)
    }

    async fn list_hours(&self, business_id: &str) -> Result<Vec<BusinessHours>, AppError> {
        sqlx::query_as::<_, BusinessHours>("SELECT * FROM business_hours WHERE business_id = $1")
            .bind(business_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn upsert_exception(&self, exception: &ScheduleException) -> Result<ScheduleException, AppError> {
        sqlx::query_as::<_, ScheduleException>(
            "INSERT INTO schedule_exceptions (id, business_id, date, is_day_off, open_time, close_time, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (business_id, date) DO UPDATE SET
                is_day_off = EXCLUDED.is_day_off,
                open_time = EXCLUDED.open_time,
                close_time = EXCLUDED.close_time
             RETURNING *"
        )
            .bind(&exception.id).bind(&exception.business_id).bind(exception.date).bind(exception.is_day_off)
            .bind(&exception.open_time).bind(&exception.close_time).bind(exception.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_exceptions(&self, business_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleException>, AppError> {
        sqlx::query_as::<_, ScheduleException>(
            "SELECT * FROM schedule_exceptions WHERE business_id = $1 AND date >= $2 AND date <= $3 ORDER BY date ASC"
        )
            .bind(business_id).bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
