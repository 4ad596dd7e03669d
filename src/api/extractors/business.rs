use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

/// Business id from the path, verified to exist.
pub struct BusinessId(pub String);

impl FromRequestParts<Arc<AppState>> for BusinessId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Invalid path parameters".into()))?;

        let business_id = params.get("business_id")
            .ok_or(AppError::Validation("Missing business id".into()))?;

        match state.business_repo.find_by_id(business_id).await? {
            Some(_) => Ok(BusinessId(business_id.clone())),
            None => Err(AppError::NotFound("Business not found".into())),
        }
    }
}
