//! Read-only service catalogue.
//!
//! Service records are maintained outside this server, so they are returned as stored:
//! only the filter fields (`title`, `price`) are relied on, everything else passes through.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use super::parse_id;
use crate::db::filter::{Filter, FindOptions, SortOrder};
use crate::db::{queries, Document, SERVICES};
use crate::errors::AppError;
use crate::state::AppState;

/// Fields returned by the single-service lookup, besides `_id`.
pub const SERVICE_DETAIL_FIELDS: &[&str] = &["title", "price", "service_id", "img"];

#[derive(Deserialize)]
pub struct ServicesQuery {
    pub sort: Option<String>,
    pub search: Option<String>,
}

// GET /services
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ServicesQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, AppError> {
    let Query(query) = query?;
    let range = state.config.price_range;

    let filter = Filter::new()
        .contains_ignore_case("title", query.search.unwrap_or_default())
        .between("price", range.min, range.max);
    let options = FindOptions::new().sort("price", SortOrder::parse(query.sort.as_deref()));

    let services = state
        .store
        .with_conn(|conn| queries::find(conn, SERVICES, &filter, &options))?;

    Ok(Json(services))
}

// GET /services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let id = parse_id(&raw_id)?;
    let options = FindOptions::new().project(SERVICE_DETAIL_FIELDS);

    let service = state
        .store
        .with_conn(|conn| queries::find_one(conn, SERVICES, &Filter::by_id(&id), &options))?
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

    Ok(Json(service))
}
