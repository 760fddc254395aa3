//! Order payloads exchanged with the shop API.
//!
//! [`OrderRequest`] is the only data contract the checkout produces. Field
//! names follow the shop API's camelCase JSON.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::address::Address;
use crate::types::cart::{Cart, CartItem};
use crate::types::id::{AddressId, CartId, OrderId, ProductId, UserId};
use crate::types::status::{OrderStatus, PaymentMethod, PaymentStatus};

/// Purchase intent sent to the order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: UserId,
    pub cart_id: CartId,
    pub cart_items: Vec<OrderLine>,
    pub address_info: AddressInfo,
    pub order_status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub order_update_date: DateTime<Utc>,
}

impl OrderRequest {
    /// Build a cash-on-delivery order for every line of `cart`.
    ///
    /// Each line carries its effective unit price, and `placed_at` is used
    /// for both the creation and last-update timestamps.
    #[must_use]
    pub fn cash_on_delivery(
        user_id: UserId,
        cart: &Cart,
        address: &Address,
        placed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            cart_id: cart.id.clone(),
            cart_items: cart.items.iter().map(OrderLine::from).collect(),
            address_info: AddressInfo::from(address),
            order_status: OrderStatus::Confirmed,
            payment_method: PaymentMethod::CashOnDelivery,
            payment_status: PaymentStatus::Pending,
            total_amount: cart.total(),
            order_date: placed_at,
            order_update_date: placed_at,
        }
    }
}

/// Per-item snapshot inside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub title: String,
    pub image: Option<String>,
    /// Effective unit price at the time of ordering.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            title: item.title.clone(),
            image: item.image.clone(),
            price: item.effective_price(),
            quantity: item.quantity_or_zero(),
        }
    }
}

/// Delivery address copied into the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    pub address_id: AddressId,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub phone: String,
    pub notes: String,
}

impl From<&Address> for AddressInfo {
    fn from(address: &Address) -> Self {
        Self {
            address_id: address.id.clone(),
            address: address.address.clone(),
            city: address.city.clone(),
            pincode: address.pincode.clone(),
            phone: address.phone.clone(),
            notes: address.notes.clone(),
        }
    }
}

/// Order service reply to a creation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

impl OrderResponse {
    /// A failed response carrying no server message.
    #[must_use]
    pub fn failed() -> Self {
        Self::default()
    }
}

/// Past order as listed on the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_amount: Option<Decimal>,
}
