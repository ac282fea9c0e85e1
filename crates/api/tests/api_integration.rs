//! Integration tests for the API server.

use std::sync::OnceLock;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use entity_store::{EntityStore, InMemoryEntityStore};
use events::{InMemoryAuditBus, InMemoryEventBus};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    app: axum::Router,
    store: InMemoryEntityStore,
    bus: InMemoryEventBus,
    audit: InMemoryAuditBus,
}

fn setup() -> TestApp {
    let config = api::Config::default();
    let store = InMemoryEntityStore::new();
    let (state, bus, audit) = api::create_default_state(store.clone(), &config);
    let app = api::create_app(state, get_metrics_handle());
    TestApp {
        app,
        store,
        bus,
        audit,
    }
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-caller-email", "admin@store.com")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn create_product(app: &axum::Router, code: &str, price: i64) -> serde_json::Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/products",
        serde_json::json!({
            "code": code,
            "name": format!("{code} name"),
            "price": price,
            "model": "M-1",
            "url": "https://example.com/p"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_health_check() {
    let t = setup();

    let (status, json) = get_json(&t.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_product_generates_id_and_roundtrips() {
    let t = setup();

    let supplied_id = uuid::Uuid::new_v4().to_string();
    let (status, created) = send_json(
        &t.app,
        "POST",
        "/products",
        serde_json::json!({
            "id": supplied_id,
            "code": "PROD1",
            "name": "Widget",
            "price": 1500,
            "model": "W-100",
            "url": "https://example.com/w-100"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_ne!(id, supplied_id);
    assert_eq!(created["code"], "PROD1");
    assert_eq!(created["price"], 1500);

    let (status, fetched) = get_json(&t.app, &format!("/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_missing_product_is_not_found() {
    let t = setup();

    let (status, json) = get_json(&t.app, &format!("/products/{}", uuid::Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_list_products() {
    let t = setup();
    create_product(&t.app, "PROD1", 1500).await;
    create_product(&t.app, "PROD2", 1000).await;

    let (status, json) = get_json(&t.app, "/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_product() {
    let t = setup();
    let created = create_product(&t.app, "PROD1", 1500).await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send_json(
        &t.app,
        "PUT",
        &format!("/products/{id}"),
        serde_json::json!({
            "code": "PROD1",
            "name": "Widget v2",
            "price": 2000,
            "model": "W-200",
            "url": "https://example.com/w-200"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "Widget v2");
    assert_eq!(updated["price"], 2000);

    let (_, fetched) = get_json(&t.app, &format!("/products/{id}")).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_missing_product_is_not_found() {
    let t = setup();

    let (status, _) = send_json(
        &t.app,
        "PUT",
        &format!("/products/{}", uuid::Uuid::new_v4()),
        serde_json::json!({
            "code": "PROD1",
            "name": "Widget",
            "price": 1500
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_product_with_negative_price_is_bad_request() {
    let t = setup();

    let (status, _) = send_json(
        &t.app,
        "POST",
        "/products",
        serde_json::json!({
            "code": "PROD1",
            "name": "Widget",
            "price": -100
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, products) = get_json(&t.app, "/products").await;
    assert!(products.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_product_returns_snapshot_then_not_found() {
    let t = setup();
    let created = create_product(&t.app, "PROD1", 1500).await;
    let id = created["id"].as_str().unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/products/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(&t.app, request).await;
    let snapshot: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot, created);

    let (status, _) = get_json(&t.app, &format!("/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_order_snapshots_and_roundtrips() {
    let t = setup();
    let p1 = create_product(&t.app, "PROD1", 1500).await;
    let p2 = create_product(&t.app, "PROD2", 1000).await;

    let (status, order) = send_json(
        &t.app,
        "POST",
        "/orders",
        serde_json::json!({
            "email": "a@b.com",
            "productIds": [p1["id"], p2["id"]],
            "payment": "CASH",
            "shipping": { "type": "ECONOMIC", "carrier": "POST" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["email"], "a@b.com");
    assert_eq!(order["billing"]["totalPrice"], 2500);
    assert_eq!(order["billing"]["paymentMethod"], "CASH");
    assert_eq!(order["products"].as_array().unwrap().len(), 2);

    let order_id = order["id"].as_str().unwrap();
    let (status, fetched) =
        get_json(&t.app, &format!("/orders?email=a@b.com&orderId={order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, order);
}

#[tokio::test]
async fn test_order_snapshot_is_immune_to_product_changes() {
    let t = setup();
    let p1 = create_product(&t.app, "PROD1", 1500).await;
    let id = p1["id"].as_str().unwrap();

    let (_, order) = send_json(
        &t.app,
        "POST",
        "/orders",
        serde_json::json!({
            "email": "a@b.com",
            "productIds": [p1["id"]],
            "payment": "CASH",
            "shipping": { "type": "ECONOMIC", "carrier": "POST" }
        }),
    )
    .await;

    send_json(
        &t.app,
        "PUT",
        &format!("/products/{id}"),
        serde_json::json!({
            "code": "PROD1",
            "name": "Widget",
            "price": 9999
        }),
    )
    .await;

    let order_id = order["id"].as_str().unwrap();
    let (_, fetched) =
        get_json(&t.app, &format!("/orders?email=a@b.com&orderId={order_id}")).await;
    assert_eq!(fetched["billing"]["totalPrice"], 1500);
    assert_eq!(fetched["products"][0]["price"], 1500);
}

#[tokio::test]
async fn test_create_order_with_missing_product() {
    let t = setup();
    let p1 = create_product(&t.app, "PROD1", 1500).await;

    let request = Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&serde_json::json!({
                "email": "a@b.com",
                "productIds": [p1["id"], uuid::Uuid::new_v4().to_string()],
                "payment": "CASH",
                "shipping": { "type": "ECONOMIC", "carrier": "POST" }
            }))
            .unwrap(),
        ))
        .unwrap();
    let (status, bytes) = send(&t.app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(String::from_utf8(bytes).unwrap(), "Some product was not found");

    // Nothing persisted, no domain event, exactly one audit record.
    let (_, orders) = get_json(&t.app, "/orders").await;
    assert!(orders.as_array().unwrap().is_empty());
    assert_eq!(t.bus.published_count(events::EventType::OrderCreated), 0);

    let records = t.audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].detail["reason"], "PRODUCT_NOT_FOUND");
    assert_eq!(records[0].detail["orderRequest"]["email"], "a@b.com");
}

#[tokio::test]
async fn test_order_response_omits_empty_products() {
    let t = setup();

    let (status, order) = send_json(
        &t.app,
        "POST",
        "/orders",
        serde_json::json!({
            "email": "a@b.com",
            "productIds": [],
            "payment": "CASH",
            "shipping": { "type": "ECONOMIC", "carrier": "POST" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(order.get("products").is_none());
    assert_eq!(order["billing"]["totalPrice"], 0);
}

#[tokio::test]
async fn test_list_orders_by_email() {
    let t = setup();
    let p1 = create_product(&t.app, "PROD1", 1500).await;

    for email in ["a@b.com", "a@b.com", "z@b.com"] {
        let (status, _) = send_json(
            &t.app,
            "POST",
            "/orders",
            serde_json::json!({
                "email": email,
                "productIds": [p1["id"]],
                "payment": "CREDIT_CARD",
                "shipping": { "type": "URGENT", "carrier": "FEDEX" }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = get_json(&t.app, "/orders").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, by_email) = get_json(&t.app, "/orders?email=a@b.com").await;
    assert_eq!(by_email.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_order() {
    let t = setup();
    let p1 = create_product(&t.app, "PROD1", 1500).await;

    let (_, order) = send_json(
        &t.app,
        "POST",
        "/orders",
        serde_json::json!({
            "email": "a@b.com",
            "productIds": [p1["id"]],
            "payment": "CASH",
            "shipping": { "type": "ECONOMIC", "carrier": "POST" }
        }),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/orders?email=a@b.com&orderId={order_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, bytes) = send(&t.app, request).await;
    let snapshot: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot, order);
    assert_eq!(t.bus.published_count(events::EventType::OrderDeleted), 1);

    let (status, _) =
        get_json(&t.app, &format!("/orders?email=a@b.com&orderId={order_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/orders?email=a@b.com&orderId={order_id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&t.app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_order_without_params_is_bad_request() {
    let t = setup();

    let request = Request::builder()
        .method("DELETE")
        .uri("/orders")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&t.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_bad_request() {
    let t = setup();

    let (status, bytes) = send(
        &t.app,
        Request::builder()
            .uri("/customers")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(bytes).unwrap(), "Bad request");
}

#[tokio::test]
async fn test_unknown_method_is_bad_request() {
    let t = setup();

    let (status, bytes) = send(
        &t.app,
        Request::builder()
            .method("PATCH")
            .uri("/products")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(bytes).unwrap(), "Bad request");
}

#[tokio::test]
async fn test_product_events_are_recorded_with_caller_email() {
    let t = setup();
    let created = create_product(&t.app, "PROD1", 1500).await;
    let id = created["id"].as_str().unwrap();

    send_json(
        &t.app,
        "PUT",
        &format!("/products/{id}"),
        serde_json::json!({
            "code": "PROD1",
            "name": "Widget v2",
            "price": 2000
        }),
    )
    .await;

    // The recorder consumes asynchronously; give it a moment.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let entries = t.store.query("events", "#product_PROD1").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["email"], "admin@store.com");
    assert!(entries[0]["ttl"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_order_events_are_published_but_not_recorded() {
    let t = setup();
    let p1 = create_product(&t.app, "PROD1", 1500).await;

    let (status, _) = send_json(
        &t.app,
        "POST",
        "/orders",
        serde_json::json!({
            "email": "a@b.com",
            "productIds": [p1["id"]],
            "payment": "CASH",
            "shipping": { "type": "ECONOMIC", "carrier": "POST" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(t.bus.published_count(events::EventType::OrderCreated), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;

    // Only the PRODUCT_CREATED entry exists; the order envelope was never
    // recorded.
    assert_eq!(t.store.item_count("events").await, 1);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let t = setup();

    let (status, _) = send(
        &t.app,
        Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}
