//! HTTP-level tests for `BackendClient` against a mock backend.

use std::sync::Arc;

use folio_commerce::prelude::*;
use folio_data::{
    ApiError, BackendClient, CodCheckoutRequest, MemoryTokenStore, StoreApi, TokenStore,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, token: Option<&str>) -> BackendClient {
    let tokens: Arc<dyn TokenStore> = match token {
        Some(t) => Arc::new(MemoryTokenStore::with_token(t)),
        None => Arc::new(MemoryTokenStore::new()),
    };
    BackendClient::new(format!("{}/api/", server.uri()), tokens).unwrap()
}

#[tokio::test]
async fn attaches_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "cartItems": [{"bookId": 2, "bookTitle": "Emma", "bookPrice": 4.5, "quantity": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cart = client(&server, Some("jwt-123")).get_cart().await.unwrap();
    assert_eq!(cart.total().unwrap().amount_minor, 900);
}

#[tokio::test]
async fn cod_checkout_posts_address_and_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment/checkout/cod"))
        .and(body_json(json!({"shippingAddress": "1 High Street", "totalAmount": 19.99})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "totalAmount": 19.99,
            "paymentMethod": "COD",
            "shippingAddress": "1 High Street",
            "books": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let order = client(&server, None)
        .checkout_cod(&CodCheckoutRequest {
            shipping_address: "1 High Street".to_string(),
            total_amount: Money::new(1999, STORE_CURRENCY),
        })
        .await
        .unwrap();
    assert_eq!(order.id, OrderId::new(42));
}

#[tokio::test]
async fn checkout_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment/checkout/cod"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Inventory service down"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, None)
        .checkout_cod(&CodCheckoutRequest {
            shipping_address: "1 High Street".to_string(),
            total_amount: Money::new(100, STORE_CURRENCY),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.reason(), "Inventory service down");
}

#[tokio::test]
async fn order_history_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "totalAmount": 3.0, "books": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let orders = client(&server, None).order_history().await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn null_order_history_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert!(client(&server, None).order_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn payment_intent_amount_in_minor_units() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment/create-payment-intent"))
        .and(body_json(json!({"amount": 2599})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"clientSecret": "pi_9_secret_x"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let intent = client(&server, None)
        .create_payment_intent(Money::new(2599, STORE_CURRENCY))
        .await
        .unwrap();
    assert_eq!(intent.id.as_deref(), Some("pi_9"));
    assert_eq!(intent.client_secret.expose(), "pi_9_secret_x");
}

#[tokio::test]
async fn error_payload_shapes_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment/create-payment-intent"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Cart is empty"})),
        )
        .mount(&server)
        .await;

    let err = client(&server, None)
        .create_payment_intent(Money::new(100, STORE_CURRENCY))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 400, .. }));
    assert_eq!(err.reason(), "Cart is empty");
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let uri = format!("http://127.0.0.1:{port}/api");
    let client = BackendClient::new(uri, Arc::new(MemoryTokenStore::new())).unwrap();
    let err = client
        .checkout_cod(&CodCheckoutRequest {
            shipping_address: "x".to_string(),
            total_amount: Money::new(100, STORE_CURRENCY),
        })
        .await
        .unwrap_err();
    assert!(err.is_network());
}

fn one_line_cart(quantity: u32) -> serde_json::Value {
    json!({
        "id": 1,
        "cartItems": [{"bookId": 2, "bookTitle": "Emma", "bookPrice": 4.5, "quantity": quantity}]
    })
}

#[tokio::test]
async fn login_posts_credentials_without_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "ada", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "jwt-new"})))
        .expect(1)
        .mount(&server)
        .await;

    let token = client(&server, Some("jwt-stale"))
        .login("ada", "hunter2")
        .await
        .unwrap();
    assert_eq!(token, "jwt-new");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn login_rejection_carries_backend_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let err = client(&server, None).login("ada", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.reason(), "Invalid credentials");
}

#[tokio::test]
async fn list_books_sends_only_set_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("search", "dune"))
        .and(query_param("category", "Sci-Fi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "books": [{"id": 5, "title": "Dune", "price": 9.99, "quantity": 3}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = BookQuery::new().with_search("dune").with_category("Sci-Fi");
    let books = client(&server, None).list_books(&query).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].price.amount_minor, 999);

    let requests = server.received_requests().await.unwrap();
    let url = &requests[0].url;
    assert!(url.query_pairs().all(|(k, _)| k == "search" || k == "category"));
}

#[tokio::test]
async fn list_books_accepts_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Emma", "price": 4.5},
            {"id": 2, "title": "Persuasion", "price": 5.0}
        ])))
        .mount(&server)
        .await;

    let books = client(&server, None)
        .list_books(&BookQuery::new())
        .await
        .unwrap();
    assert_eq!(books.len(), 2);
    assert!(server.received_requests().await.unwrap()[0]
        .url
        .query()
        .is_none());
}

#[tokio::test]
async fn add_to_cart_posts_book_and_quantity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .and(header("authorization", "Bearer jwt-123"))
        .and(body_json(json!({"bookId": 2, "quantity": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(one_line_cart(3)))
        .expect(1)
        .mount(&server)
        .await;

    let cart = client(&server, Some("jwt-123"))
        .add_to_cart(BookId::new(2), 3)
        .await
        .unwrap();
    assert_eq!(cart.items[0].quantity, 3);
}

#[tokio::test]
async fn add_to_cart_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, None)
        .add_to_cart(BookId::new(2), 1)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn update_cart_item_puts_new_quantity() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/cart/update"))
        .and(body_json(json!({"bookId": 2, "quantity": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(one_line_cart(5)))
        .expect(1)
        .mount(&server)
        .await;

    let cart = client(&server, None)
        .update_cart_item(BookId::new(2), 5)
        .await
        .unwrap();
    assert_eq!(cart.total().unwrap().amount_minor, 2250);
}

#[tokio::test]
async fn remove_from_cart_puts_book_id_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/cart/remove/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 1, "cartItems": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cart = client(&server, None)
        .remove_from_cart(BookId::new(2))
        .await
        .unwrap();
    assert!(cart.is_empty());
}
