pub mod auth;
pub mod bookings;
pub mod health;
pub mod services;

use uuid::Uuid;

use crate::errors::AppError;

/// Rejects ids that could never have been issued by the store.
fn parse_id(raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::BadRequest(format!("malformed id: {raw}")))
}
