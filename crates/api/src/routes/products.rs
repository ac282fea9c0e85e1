//! Product catalog endpoints.
//!
//! The fetch handlers go through the read-only `ProductReader`; only the
//! admin handlers reach the write path.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{ProductId, RequestId};
use domain::{Money, Product};
use entity_store::EntityStore;
use events::{AuditBus, EventBus};
use serde::Deserialize;

use crate::AppState;
use crate::auth::CallerIdentity;
use crate::error::ApiError;

/// Inbound product body. A supplied `id` is accepted and ignored on
/// creation.
#[derive(Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub code: String,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub url: String,
}

impl ProductRequest {
    fn into_product(self) -> Product {
        Product {
            id: self.id.unwrap_or_default(),
            code: self.code,
            name: self.name,
            price: self.price,
            model: self.model,
            url: self.url,
        }
    }
}

/// GET /products — full catalog listing.
#[tracing::instrument(skip(state))]
pub async fn list<S, B, A>(
    State(state): State<Arc<AppState<S, B, A>>>,
) -> Result<Json<Vec<Product>>, ApiError>
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    Ok(Json(state.product_reader.get_all().await?))
}

/// GET /products/{id} — fetch one product by id.
#[tracing::instrument(skip(state))]
pub async fn get<S, B, A>(
    State(state): State<Arc<AppState<S, B, A>>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError>
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    let id = parse_product_id(&id)?;
    Ok(Json(state.product_reader.get_by_id(id).await?))
}

/// POST /products — create a product.
#[tracing::instrument(skip(state, caller, req))]
pub async fn create<S, B, A>(
    State(state): State<Arc<AppState<S, B, A>>>,
    caller: CallerIdentity,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError>
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    let request_id = RequestId::new();
    let created = state
        .product_admin
        .create(req.into_product(), &caller.0, request_id)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /products/{id} — update an existing product.
#[tracing::instrument(skip(state, caller, req))]
pub async fn update<S, B, A>(
    State(state): State<Arc<AppState<S, B, A>>>,
    Path(id): Path<String>,
    caller: CallerIdentity,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>, ApiError>
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    let id = parse_product_id(&id)?;
    let request_id = RequestId::new();
    let updated = state
        .product_admin
        .update(id, req.into_product(), &caller.0, request_id)
        .await?;
    Ok(Json(updated))
}

/// DELETE /products/{id} — delete a product, returning the pre-deletion
/// snapshot.
#[tracing::instrument(skip(state, caller))]
pub async fn remove<S, B, A>(
    State(state): State<Arc<AppState<S, B, A>>>,
    Path(id): Path<String>,
    caller: CallerIdentity,
) -> Result<Json<Product>, ApiError>
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    let id = parse_product_id(&id)?;
    let request_id = RequestId::new();
    let deleted = state
        .product_admin
        .delete(id, &caller.0, request_id)
        .await?;
    Ok(Json(deleted))
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid product id: {e}")))?;
    Ok(ProductId::from_uuid(uuid))
}
