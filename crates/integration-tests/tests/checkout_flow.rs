//! End-to-end checkout flow against a fake shop API.
//!
//! Run with: cargo test -p shopfront-integration-tests

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::{StatusCode, header::LOCATION};
use rust_decimal::Decimal;
use serde_json::json;

use shopfront_core::{OrderRequest, OrderStatus, PaymentMethod, PaymentStatus};
use shopfront_integration_tests::{
    FakeShopApi, OrderReply, TEST_USER_ID, TestContext, sample_cart,
};
use shopfront_storefront::services::checkout::{
    ADDRESS_REQUIRED_MESSAGE, CART_EMPTY_MESSAGE, ORDER_CREATED_MESSAGE, ORDER_FAILED_FALLBACK,
};

fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn select_address(ctx: &TestContext, address_id: &str) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/shop/checkout/address"))
        .form(&[("address_id", address_id)])
        .send()
        .await
        .unwrap()
}

async fn place_order(ctx: &TestContext) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/shop/checkout/order"))
        .send()
        .await
        .unwrap()
}

async fn page(ctx: &TestContext, path: &str) -> String {
    let response = ctx.client.get(ctx.url(path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.text().await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::start(FakeShopApi::with_cart(None)).await;

    let response = ctx.anonymous.get(ctx.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_anonymous_checkout_redirects_to_login() {
    let ctx = TestContext::start(FakeShopApi::with_cart(Some(sample_cart()))).await;

    let response = ctx
        .anonymous
        .get(ctx.url("/shop/checkout"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some(ctx.login_url.clone()));
}

#[tokio::test]
async fn test_checkout_page_renders_cart_and_addresses() {
    let ctx = TestContext::start(FakeShopApi::with_cart(Some(sample_cart()))).await;

    let body = page(&ctx, "/shop/checkout").await;

    assert!(body.contains("Linen Shirt"));
    assert!(body.contains("Straw Hat"));
    assert!(body.contains("$24.00"));
    assert!(body.contains("12 Hill Rd"));
}

#[tokio::test]
async fn test_missing_cart_is_rejected_as_empty() {
    let ctx = TestContext::start(FakeShopApi::with_cart(None)).await;

    let response = place_order(&ctx).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/shop/checkout"));

    assert!(page(&ctx, "/shop/checkout").await.contains(CART_EMPTY_MESSAGE));
    assert!(ctx.shop.orders().is_empty());
}

#[tokio::test]
async fn test_cart_without_items_is_rejected_as_empty() {
    let empty = json!({ "_id": "cart-1", "userId": TEST_USER_ID, "items": [] });
    let ctx = TestContext::start(FakeShopApi::with_cart(Some(empty))).await;

    select_address(&ctx, "addr-1").await;
    place_order(&ctx).await;

    assert!(page(&ctx, "/shop/checkout").await.contains(CART_EMPTY_MESSAGE));
    assert!(ctx.shop.orders().is_empty());
}

#[tokio::test]
async fn test_order_requires_selected_address() {
    let ctx = TestContext::start(FakeShopApi::with_cart(Some(sample_cart()))).await;

    let response = place_order(&ctx).await;
    assert_eq!(location(&response).as_deref(), Some("/shop/checkout"));

    assert!(page(&ctx, "/shop/checkout").await.contains(ADDRESS_REQUIRED_MESSAGE));
    assert!(ctx.shop.orders().is_empty());
}

#[tokio::test]
async fn test_unknown_address_is_not_found() {
    let ctx = TestContext::start(FakeShopApi::with_cart(Some(sample_cart()))).await;

    let response = select_address(&ctx, "addr-404").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_successful_order_lands_on_account_page() {
    let ctx = TestContext::start(FakeShopApi::with_cart(Some(sample_cart()))).await;

    let selected = select_address(&ctx, "addr-1").await;
    assert_eq!(location(&selected).as_deref(), Some("/shop/checkout"));

    let response = place_order(&ctx).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/shop/account"));

    let orders = ctx.shop.orders();
    assert_eq!(orders.len(), 1);
    let order: OrderRequest = serde_json::from_value(orders[0].clone()).unwrap();
    assert_eq!(order.user_id.as_str(), TEST_USER_ID);
    assert_eq!(order.cart_id.as_str(), "cart-1");
    assert_eq!(order.order_status, OrderStatus::Confirmed);
    assert_eq!(order.payment_method, PaymentMethod::CashOnDelivery);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.order_date, order.order_update_date);
    assert_eq!(order.total_amount, Decimal::from(24));
    assert_eq!(order.address_info.address_id.as_str(), "addr-1");
    assert_eq!(order.address_info.notes, "Ring twice");
    assert_eq!(order.cart_items.len(), 2);
    assert_eq!(order.cart_items[0].price, Decimal::from(10));
    assert_eq!(order.cart_items[1].price, Decimal::from(4));

    // Wire names follow the shop API.
    assert_eq!(orders[0]["paymentMethod"], "cod");
    assert_eq!(orders[0]["orderStatus"], "confirmed");

    let account = page(&ctx, "/shop/account").await;
    assert!(account.contains(ORDER_CREATED_MESSAGE));
    assert!(account.contains("$24.00"));
}

#[tokio::test]
async fn test_address_selection_is_cleared_after_order() {
    let ctx = TestContext::start(FakeShopApi::with_cart(Some(sample_cart()))).await;

    select_address(&ctx, "addr-1").await;
    place_order(&ctx).await;
    let response = place_order(&ctx).await;

    assert_eq!(location(&response).as_deref(), Some("/shop/checkout"));
    assert_eq!(ctx.shop.orders().len(), 1);
}

#[tokio::test]
async fn test_server_rejection_message_is_shown() {
    let shop = FakeShopApi::with_cart(Some(sample_cart())).replying(OrderReply::rejected(
        StatusCode::BAD_REQUEST,
        Some("Not enough stock for Straw Hat"),
    ));
    let ctx = TestContext::start(shop).await;

    select_address(&ctx, "addr-1").await;
    let response = place_order(&ctx).await;

    assert_eq!(location(&response).as_deref(), Some("/shop/checkout"));
    assert_eq!(ctx.shop.orders().len(), 1);
    assert!(
        page(&ctx, "/shop/checkout")
            .await
            .contains("Not enough stock for Straw Hat")
    );
}

#[tokio::test]
async fn test_server_failure_without_message_uses_fallback() {
    let shop = FakeShopApi::with_cart(Some(sample_cart()))
        .replying(OrderReply::rejected(StatusCode::INTERNAL_SERVER_ERROR, None));
    let ctx = TestContext::start(shop).await;

    select_address(&ctx, "addr-1").await;
    let response = place_order(&ctx).await;

    assert_eq!(location(&response).as_deref(), Some("/shop/checkout"));
    assert_eq!(ctx.shop.orders().len(), 1);
    assert!(page(&ctx, "/shop/checkout").await.contains(ORDER_FAILED_FALLBACK));
}

#[tokio::test]
async fn test_rate_limited_rejection_keeps_server_message() {
    let shop = FakeShopApi::with_cart(Some(sample_cart())).replying(OrderReply::rejected(
        StatusCode::TOO_MANY_REQUESTS,
        Some("Too many orders, try again in a minute"),
    ));
    let ctx = TestContext::start(shop).await;

    select_address(&ctx, "addr-1").await;
    let response = place_order(&ctx).await;

    assert_eq!(location(&response).as_deref(), Some("/shop/checkout"));
    assert!(
        page(&ctx, "/shop/checkout")
            .await
            .contains("Too many orders, try again in a minute")
    );
}
