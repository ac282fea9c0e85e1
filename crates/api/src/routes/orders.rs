//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use common::{OrderId, RequestId};
use domain::{Billing, Order, OrderItem, Shipping};
use entity_store::EntityStore;
use events::{AuditBus, EventBus};
use orchestrator::OrderRequest;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

/// Query parameters for GET /orders.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub email: Option<String>,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
}

/// Query parameters for DELETE /orders; both are required.
#[derive(Debug, Deserialize)]
pub struct DeleteOrderQuery {
    pub email: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
}

/// Outbound order representation.
///
/// The `products` list is omitted entirely when empty rather than emitted
/// as `[]`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub email: String,
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<OrderItem>>,
    pub billing: Billing,
    pub shipping: Shipping,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            email: order.email,
            id: order.id,
            created_at: order.created_at,
            products: if order.products.is_empty() {
                None
            } else {
                Some(order.products)
            },
            billing: order.billing,
            shipping: order.shipping,
        }
    }
}

/// GET /orders — dispatches on the query string: one order, one customer's
/// orders, or everything.
#[tracing::instrument(skip(state))]
pub async fn list<S, B, A>(
    State(state): State<Arc<AppState<S, B, A>>>,
    Query(query): Query<OrdersQuery>,
) -> Result<Response, ApiError>
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    match (query.email, query.order_id) {
        (Some(email), Some(order_id)) => {
            let order_id = parse_order_id(&order_id)?;
            let order = state.order_service.get_order(&email, order_id).await?;
            Ok(Json(OrderResponse::from(order)).into_response())
        }
        (Some(email), None) => {
            let orders = state.order_service.get_orders_by_email(&email).await?;
            Ok(Json(to_responses(orders)).into_response())
        }
        (None, Some(_)) => Err(ApiError::BadRequest(
            "email is required when orderId is given".to_string(),
        )),
        (None, None) => {
            let orders = state.order_service.get_all_orders().await?;
            Ok(Json(to_responses(orders)).into_response())
        }
    }
}

/// POST /orders — create an order from referenced product ids.
#[tracing::instrument(skip(state, req))]
pub async fn create<S, B, A>(
    State(state): State<Arc<AppState<S, B, A>>>,
    Json(req): Json<OrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError>
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    let request_id = RequestId::new();
    let order = state.order_service.create_order(req, request_id).await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// DELETE /orders?email=&orderId= — delete one order, returning the
/// pre-deletion snapshot.
#[tracing::instrument(skip(state))]
pub async fn remove<S, B, A>(
    State(state): State<Arc<AppState<S, B, A>>>,
    Query(query): Query<DeleteOrderQuery>,
) -> Result<Json<OrderResponse>, ApiError>
where
    S: EntityStore + Clone + 'static,
    B: EventBus + 'static,
    A: AuditBus + 'static,
{
    let order_id = parse_order_id(&query.order_id)?;
    let request_id = RequestId::new();
    let deleted = state
        .order_service
        .delete_order(&query.email, order_id, request_id)
        .await?;
    Ok(Json(OrderResponse::from(deleted)))
}

fn to_responses(orders: Vec<Order>) -> Vec<OrderResponse> {
    orders.into_iter().map(OrderResponse::from).collect()
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order id: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
