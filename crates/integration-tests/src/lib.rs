//! Integration test harness for the Shopfront storefront.
//!
//! Each [`TestContext`] starts two servers on ephemeral ports:
//!
//! - a [`FakeShopApi`] speaking the shop REST API's JSON shapes, recording
//!   every order it receives;
//! - the real storefront [`app`](shopfront_storefront::app), configured to
//!   talk to the fake.
//!
//! Tests drive the storefront through a cookie-enabled `reqwest` client that
//! does not follow redirects, so `Location` headers can be asserted.
//!
//! # Example
//!
//! ```rust,ignore
//! let ctx = TestContext::start(FakeShopApi::with_cart(sample_cart())).await;
//! let resp = ctx.client.get(ctx.url("/shop/checkout")).send().await.unwrap();
//! assert_eq!(resp.status(), 200);
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    routing::{get, post},
};
use reqwest::cookie::Jar;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

use shopfront_storefront::AppState;
use shopfront_storefront::config::{ShopApiConfig, StorefrontConfig};

/// Auth token the fake shop API accepts.
pub const VALID_TOKEN: &str = "valid-token";

/// User ID the fake shop API resolves [`VALID_TOKEN`] to.
pub const TEST_USER_ID: &str = "665f1c0de4b0a1a2b3c4d5e6";

/// Canned reply for `POST /api/shop/order/create`.
#[derive(Debug, Clone)]
pub struct OrderReply {
    pub status: StatusCode,
    pub body: Value,
}

impl OrderReply {
    /// `201 { success: true, orderId }`.
    #[must_use]
    pub fn created() -> Self {
        Self {
            status: StatusCode::CREATED,
            body: json!({ "success": true, "orderId": "order-1" }),
        }
    }

    /// A rejection with the given status and optional server message.
    #[must_use]
    pub fn rejected(status: StatusCode, message: Option<&str>) -> Self {
        let body = match message {
            Some(message) => json!({ "success": false, "message": message }),
            None => json!({ "success": false }),
        };
        Self { status, body }
    }
}

#[derive(Debug)]
struct FakeShopState {
    cart: Option<Value>,
    addresses: Value,
    reply: OrderReply,
    orders: Mutex<Vec<Value>>,
}

/// In-process stand-in for the shop REST API.
#[derive(Debug, Clone)]
pub struct FakeShopApi {
    state: Arc<FakeShopState>,
}

impl FakeShopApi {
    /// A shop where the test user has the given cart and one address.
    #[must_use]
    pub fn with_cart(cart: Option<Value>) -> Self {
        Self {
            state: Arc::new(FakeShopState {
                cart,
                addresses: json!([sample_address()]),
                reply: OrderReply::created(),
                orders: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Replace the order creation reply.
    #[must_use]
    pub fn replying(self, reply: OrderReply) -> Self {
        let state = Arc::try_unwrap(self.state).expect("fake shop already started");
        Self {
            state: Arc::new(FakeShopState { reply, ..state }),
        }
    }

    /// Order bodies received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.state
            .orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/api/auth/check-auth", get(check_auth))
            .route("/api/shop/cart/get/{user_id}", get(get_cart))
            .route("/api/shop/address/get/{user_id}", get(get_addresses))
            .route("/api/shop/order/create", post(create_order))
            .route("/api/shop/order/list/{user_id}", get(list_orders))
            .with_state(Arc::clone(&self.state))
    }
}

async fn check_auth(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let authenticated = headers
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookies| cookies.contains(&format!("token={VALID_TOKEN}")));

    if authenticated {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Authenticated user!",
                "user": { "id": TEST_USER_ID, "email": "ada@example.com", "userName": "ada" }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Unauthorised user!" })),
        )
    }
}

async fn get_cart(
    State(state): State<Arc<FakeShopState>>,
    Path(_user_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    match &state.cart {
        Some(cart) => (StatusCode::OK, Json(json!({ "success": true, "data": cart }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Cart not found!" })),
        ),
    }
}

async fn get_addresses(
    State(state): State<Arc<FakeShopState>>,
    Path(_user_id): Path<String>,
) -> Json<Value> {
    Json(json!({ "success": true, "data": state.addresses }))
}

async fn create_order(
    State(state): State<Arc<FakeShopState>>,
    Json(order): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state
        .orders
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(order);
    (state.reply.status, Json(state.reply.body.clone()))
}

async fn list_orders(
    State(state): State<Arc<FakeShopState>>,
    Path(_user_id): Path<String>,
) -> Json<Value> {
    let orders = state.orders.lock().unwrap_or_else(PoisonError::into_inner);
    let summaries: Vec<Value> = orders
        .iter()
        .enumerate()
        .map(|(index, order)| {
            json!({
                "_id": format!("order-{}", index + 1),
                "orderDate": order["orderDate"],
                "orderStatus": order["orderStatus"],
                "totalAmount": order["totalAmount"],
            })
        })
        .collect();
    Json(json!({ "success": true, "data": summaries }))
}

/// Cart with a regular-priced line and a sale line: total 24.00.
#[must_use]
pub fn sample_cart() -> Value {
    json!({
        "_id": "cart-1",
        "userId": TEST_USER_ID,
        "items": [
            { "productId": "p1", "title": "Linen Shirt", "image": "shirt.png",
              "price": 10, "salePrice": 0, "quantity": 2 },
            { "productId": "p2", "title": "Straw Hat", "image": null,
              "price": 5, "salePrice": 4, "quantity": 1 }
        ]
    })
}

/// The test user's single saved address.
#[must_use]
pub fn sample_address() -> Value {
    json!({
        "_id": "addr-1",
        "userId": TEST_USER_ID,
        "address": "12 Hill Rd",
        "city": "Pune",
        "pincode": "411001",
        "phone": "5550100",
        "notes": "Ring twice"
    })
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

/// A running storefront wired to a fake shop API.
pub struct TestContext {
    pub shop: FakeShopApi,
    pub storefront_url: Url,
    pub login_url: String,
    /// Client carrying the shop auth cookie.
    pub client: reqwest::Client,
    /// Client without any auth cookie.
    pub anonymous: reqwest::Client,
}

impl TestContext {
    /// Start the fake shop API and a storefront pointed at it.
    pub async fn start(shop: FakeShopApi) -> Self {
        let shop_addr = spawn(shop.router()).await;
        let shop_url = Url::parse(&format!("http://{shop_addr}/")).expect("shop url");
        let login_url = format!("{shop_url}auth/login");

        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_string(),
            shop_api: ShopApiConfig {
                base_url: shop_url,
                login_url: login_url.clone(),
                api_token: None,
                timeout: Duration::from_secs(5),
            },
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::from_config(config).expect("storefront state");
        let storefront_addr = spawn(shopfront_storefront::app(state)).await;
        let storefront_url =
            Url::parse(&format!("http://{storefront_addr}/")).expect("storefront url");

        let jar = Jar::default();
        jar.add_cookie_str(&format!("token={VALID_TOKEN}; Path=/"), &storefront_url);

        Self {
            shop,
            login_url,
            client: build_client(Some(jar)),
            anonymous: build_client(None),
            storefront_url,
        }
    }

    /// Absolute storefront URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.storefront_url.join(path).expect("valid path")
    }
}

fn build_client(jar: Option<Jar>) -> reqwest::Client {
    let builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
    let builder = match jar {
        Some(jar) => builder.cookie_provider(Arc::new(jar)),
        None => builder.cookie_store(true),
    };
    builder.build().expect("test client")
}
