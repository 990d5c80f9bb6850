use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::orders::OrderSummary;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    /// Units in stock across all products.
    pub available_stock: i64,
    pub orders_in_production: u64,
    /// Number of materials below their minimum threshold.
    pub low_stock_materials: usize,
    pub total_revenue: Decimal,
    pub recent_orders: Vec<OrderSummary>,
}
