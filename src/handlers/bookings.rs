use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;

use super::parse_id;
use crate::db::filter::{Filter, FindOptions, Update};
use crate::db::{self, queries, DeleteResult, InsertOneResult, UpdateResult, BOOKINGS};
use crate::errors::AppError;
use crate::models::{Booking, Claims, NewBooking, StatusUpdate};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct BookingsQuery {
    pub email: Option<String>,
}

// GET /bookings
/// Lists the caller's bookings. The `email` parameter must name the token's own identity.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let Query(query) = query?;

    if query.email.as_deref() != Some(claims.email.as_str()) {
        tracing::warn!(
            claimed = %claims.email,
            requested = ?query.email,
            "booking list requested for another identity"
        );
        return Err(AppError::Unauthorized);
    }

    let filter = Filter::new().eq("email", claims.email);
    let docs = state
        .store
        .with_conn(|conn| queries::find(conn, BOOKINGS, &filter, &FindOptions::new()))?;

    let bookings = docs
        .into_iter()
        .map(db::decode)
        .collect::<anyhow::Result<Vec<Booking>>>()?;

    Ok(Json(bookings))
}

// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(raw_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let id = parse_id(&raw_id)?;

    let doc = state
        .store
        .with_conn(|conn| queries::find_one(conn, BOOKINGS, &Filter::by_id(&id), &FindOptions::new()))?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    let booking: Booking = db::decode(doc)?;

    if booking.email != claims.email {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(booking))
}

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<Json<InsertOneResult>, AppError> {
    let Json(booking) = payload?;
    let doc = booking.into_document();

    let ack = state
        .store
        .with_conn(|conn| queries::insert_one(conn, BOOKINGS, doc))?;

    tracing::info!(booking_id = %ack.inserted_id, "booking created");
    Ok(Json(ack))
}

// PATCH /bookings/:id
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<UpdateResult>, AppError> {
    let id = parse_id(&raw_id)?;
    let Json(update) = payload?;
    let filter = Filter::by_id(&id);

    let ack = state.store.with_conn(|conn| -> Result<UpdateResult, AppError> {
        let doc = queries::find_one(conn, BOOKINGS, &filter, &FindOptions::new())?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
        let current: Booking = db::decode(doc)?;

        if !current.status.can_transition_to(update.status) {
            return Err(AppError::Conflict(format!(
                "booking cannot move from {} to {}",
                current.status.as_str(),
                update.status.as_str()
            )));
        }

        let ack = queries::update_one(conn, BOOKINGS, &filter, &Update::set("status", update.status.as_str()))?;
        Ok(ack)
    })?;

    tracing::info!(booking_id = %id, status = update.status.as_str(), "booking status updated");
    Ok(Json(ack))
}

// DELETE /bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let id = parse_id(&raw_id)?;

    let ack = state
        .store
        .with_conn(|conn| queries::delete_one(conn, BOOKINGS, &Filter::by_id(&id)))?;

    if ack.deleted_count == 0 {
        return Err(AppError::NotFound(format!("booking {id}")));
    }

    tracing::info!(booking_id = %id, "booking deleted");
    Ok(Json(ack))
}
