use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

/// Product form as submitted. Nothing here is trusted until it goes through
/// `validation::validate_product_draft`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProductDraft {
    pub name: Option<String>,
    /// `vela` or `vitral`.
    pub kind: Option<String>,
    pub size: Option<String>,
    pub sale_price: Option<Decimal>,
    pub production_cost: Option<Decimal>,
    pub production_minutes: Option<i32>,
    pub description: Option<String>,
    /// `pronta_entrega` or `sob_encomenda`, defaults to the latter.
    pub availability: Option<String>,
    pub current_stock: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
