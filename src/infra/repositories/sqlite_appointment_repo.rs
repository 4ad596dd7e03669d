use crate::domain::{
    models::appointment::{Appointment, AppointmentHistory, AppointmentStatus},
    ports::AppointmentRepository,
    services::conflict_guard::check_capacity,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::warn;

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Writing the type row first takes SQLite's write lock, so concurrent
/// bookings of the same type queue up behind this transaction.
async fn lock_type(conn: &mut SqliteConnection, appointment_type_id: &str) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE appointment_types SET id = id WHERE id = ?")
        .bind(appointment_type_id)
        .execute(&mut *conn)
        .await
        .map_err(AppError::Database)?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Appointment type not found".into()));
    }
    Ok(())
}

async fn claim_slot(conn: &mut SqliteConnection, appointment: &Appointment, limit: Option<i32>) -> Result<Appointment, AppError> {
    let duplicate = sqlx::query(
        "SELECT COUNT(*) as count FROM appointments WHERE lead_id = ? AND appointment_type_id = ? AND start_time = ? AND status = 'PENDING'"
    )
        .bind(&appointment.lead_id).bind(&appointment.appointment_type_id).bind(appointment.start_time)
        .fetch_one(&mut *conn).await.map_err(AppError::Database)?;
    if duplicate.get::<i64, _>("count") > 0 {
        return Err(AppError::Conflict("You already have a pending appointment at that time".into()));
    }

    let pending = sqlx::query(
        "SELECT COUNT(*) as count FROM appointments WHERE appointment_type_id = ? AND start_time = ? AND status = 'PENDING'"
    )
        .bind(&appointment.appointment_type_id).bind(appointment.start_time)
        .fetch_one(&mut *conn).await.map_err(AppError::Database)?;
    let pending = pending.get::<i64, _>("count");
    if let Err(e) = check_capacity(limit, pending) {
        warn!("Slot {} of type {} is full ({} pending)", appointment.start_time, appointment.appointment_type_id, pending);
        return Err(e);
    }

    sqlx::query_as::<_, Appointment>(
        "INSERT INTO appointments (id, business_id, lead_id, appointment_type_id, start_time, subject, status, actor_type, actor_id, rescheduled_from, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *"
    )
        .bind(&appointment.id).bind(&appointment.business_id).bind(&appointment.lead_id).bind(&appointment.appointment_type_id)
        .bind(appointment.start_time).bind(&appointment.subject).bind(&appointment.status).bind(&appointment.actor_type)
        .bind(&appointment.actor_id).bind(&appointment.rescheduled_from).bind(appointment.created_at)
        .fetch_one(&mut *conn).await.map_err(AppError::Database)
}

async fn insert_history(conn: &mut SqliteConnection, history: &AppointmentHistory) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO appointment_history (id, appointment_id, action, actor_type, actor_id, reason, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
        .bind(&history.id).bind(&history.appointment_id).bind(&history.action).bind(&history.actor_type)
        .bind(&history.actor_id).bind(&history.reason).bind(history.created_at)
        .execute(&mut *conn).await.map_err(AppError::Database)?;
    Ok(())
}

/// Moves a PENDING row to `status`; a row that is no longer pending is a conflict.
async fn transition(conn: &mut SqliteConnection, id: &str, status: AppointmentStatus) -> Result<Appointment, AppError> {
    sqlx::query_as::<_, Appointment>("UPDATE appointments SET status = ? WHERE id = ? AND status = 'PENDING' RETURNING *")
        .bind(status.as_str()).bind(id)
        .fetch_optional(&mut *conn).await.map_err(AppError::Database)?
        .ok_or(AppError::Conflict("Appointment is no longer pending".into()))
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn book(&self, appointment: &Appointment, limit: Option<i32>, history: &AppointmentHistory) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        lock_type(&mut tx, &appointment.appointment_type_id).await?;
        let created = claim_slot(&mut tx, appointment, limit).await?;
        insert_history(&mut tx, history).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn reschedule(&self, original: &Appointment, replacement: &Appointment, limit: Option<i32>, history: &AppointmentHistory) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        lock_type(&mut tx, &replacement.appointment_type_id).await?;
        transition(&mut tx, &original.id, AppointmentStatus::Rescheduled).await?;
        let moved = claim_slot(&mut tx, replacement, limit).await?;
        insert_history(&mut tx, history).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(moved)
    }

    async fn cancel(&self, appointment: &Appointment, history: &AppointmentHistory) -> Result<Appointment, AppError> {
        self.set_status(appointment, AppointmentStatus::Cancelled, history).await
    }

    async fn set_status(&self, appointment: &Appointment, status: AppointmentStatus, history: &AppointmentHistory) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let updated = transition(&mut tx, &appointment.id, status).await?;
        insert_history(&mut tx, history).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE business_id = ? AND id = ?")
            .bind(business_id).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_for_lead(&self, lead_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE lead_id = ? AND id = ?")
            .bind(lead_id).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_lead(&self, lead_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE lead_id = ? ORDER BY start_time ASC")
            .bind(lead_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_upcoming_pending_for_lead(&self, lead_id: &str, after: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE lead_id = ? AND status = 'PENDING' AND start_time > ? ORDER BY start_time ASC"
        )
            .bind(lead_id).bind(after)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_pending_by_range(&self, business_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE business_id = ? AND status = 'PENDING' AND start_time >= ? AND start_time < ?"
        )
            .bind(business_id).bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_history(&self, appointment_id: &str) -> Result<Vec<AppointmentHistory>, AppError> {
        sqlx::query_as::<_, AppointmentHistory>(
            "SELECT * FROM appointment_history WHERE appointment_id = ? ORDER BY created_at ASC"
        )
            .bind(appointment_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
