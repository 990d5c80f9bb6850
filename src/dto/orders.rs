use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderStatus, ResolvedOrderLine};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct OrderDraft {
    pub client_name: Option<String>,
    /// Defaults to the time the order is recorded.
    pub order_date: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    pub observations: Option<String>,
    /// Defaults to the sum of `quantity * unit_price` over the lines.
    pub total_value: Option<Decimal>,
    #[serde(default)]
    pub lines: Vec<OrderLineDraft>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderLineDraft {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Defaults to the product's sale price at recording time.
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderSummary {
    pub order: Order,
    pub lines: Vec<ResolvedOrderLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryList {
    pub items: Vec<OrderSummary>,
}
