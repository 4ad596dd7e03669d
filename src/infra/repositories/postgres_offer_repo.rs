use crate::domain::{models::offer::{AppointmentType, Offer}, ports::OfferRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresOfferRepo {
    pool: PgPool,
}

impl PostgresOfferRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferRepository for PostgresOfferRepo {
    async fn create_offer(&self, offer: &Offer) -> Result<Offer, AppError> {
        sqlx::query_as::<_, Offer>(
            "INSERT INTO offers (id, business_id, name, active, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(&offer.id).bind(&offer.business_id).bind(&offer.name).bind(offer.active).bind(offer.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_offer(&self, business_id: &str, id: &str) -> Result<Option<Offer>, AppError> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE business_id = $1 AND id = $2")
            .bind(business_id).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_offers(&self, business_id: &str) -> Result<Vec<Offer>, AppError> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE business_id = $1 ORDER BY created_at ASC")
            .bind(business_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_type(&self, appointment_type: &AppointmentType) -> Result<AppointmentType, AppError> {
        sqlx::query_as::<_, AppointmentType>(
            "INSERT INTO appointment_types (id, business_id, offer_id, name, duration_min, concurrency_limit, active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&appointment_type.id).bind(&appointment_type.business_id).bind(&appointment_type.offer_id)
            .bind(&appointment_type.name).bind(appointment_type.duration_min).bind(appointment_type.concurrency_limit)
            .bind(appointment_type.active).bind(appointment_type.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_type(&self, business_id: &str, id: &str) -> Result<Option<AppointmentType>, AppError> {
        sqlx::query_as::<_, AppointmentType>("SELECT * FROM appointment_types WHERE business_id = $1 AND id = $2")
            .bind(business_id).bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_types(&self, business_id: &str) -> Result<Vec<AppointmentType>, AppError> {
        sqlx::query_as::<_, AppointmentType>("SELECT * FROM appointment_types WHERE business_id = $1 ORDER BY created_at ASC")
            .bind(business_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
