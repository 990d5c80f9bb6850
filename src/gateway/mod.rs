//! Persistence boundary.
//!
//! Services only talk to storage through [`Gateway`]. Two implementations
//! exist: [`InMemoryGateway`] for tests and local runs, and [`SeaOrmGateway`]
//! backed by Postgres.

mod memory;
mod postgres;

pub use memory::InMemoryGateway;
pub use postgres::SeaOrmGateway;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Availability, Material, MaterialFields, Order, OrderLine, OrderStatus, Product,
    ProductFields, ProductKind, ProductMaterial, ResolvedOrderLine,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("could not decode stored row: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Filter for product listings. Results come newest first.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub kind: Option<ProductKind>,
    pub availability: Option<Availability>,
    /// Only products with `current_stock > 0`.
    pub in_stock_only: bool,
    pub limit: Option<u64>,
}

/// Filter for material listings. Results come newest first.
#[derive(Debug, Clone, Default)]
pub struct MaterialQuery {
    /// Only materials with `available_quantity < minimum_threshold`.
    pub low_stock_only: bool,
    pub limit: Option<u64>,
}

/// Filter for order listings. Results are ordered by `created_at`
/// descending, ties broken by `id` ascending.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<u64>,
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn insert_product(&self, product: Product) -> GatewayResult<Product>;

    async fn get_product(&self, id: Uuid) -> GatewayResult<Option<Product>>;

    /// Replaces every mutable field. `None` when the id is unknown.
    async fn update_product(
        &self,
        id: Uuid,
        fields: ProductFields,
    ) -> GatewayResult<Option<Product>>;

    /// Returns `false` when nothing was deleted. Composition lines go with
    /// the product; order lines referencing it make the delete fail.
    async fn delete_product(&self, id: Uuid) -> GatewayResult<bool>;

    async fn query_products(&self, query: ProductQuery) -> GatewayResult<Vec<Product>>;

    async fn insert_material(&self, material: Material) -> GatewayResult<Material>;

    async fn get_material(&self, id: Uuid) -> GatewayResult<Option<Material>>;

    async fn update_material(
        &self,
        id: Uuid,
        fields: MaterialFields,
    ) -> GatewayResult<Option<Material>>;

    async fn delete_material(&self, id: Uuid) -> GatewayResult<bool>;

    async fn query_materials(&self, query: MaterialQuery) -> GatewayResult<Vec<Material>>;

    async fn insert_product_material(
        &self,
        line: ProductMaterial,
    ) -> GatewayResult<ProductMaterial>;

    async fn list_product_materials(&self, product_id: Uuid)
    -> GatewayResult<Vec<ProductMaterial>>;

    async fn delete_product_material(&self, product_id: Uuid, id: Uuid) -> GatewayResult<bool>;

    /// Stores the order and all its lines as one unit: either everything is
    /// written or nothing is.
    async fn insert_order(&self, order: Order, lines: Vec<OrderLine>) -> GatewayResult<Order>;

    async fn get_order(&self, id: Uuid) -> GatewayResult<Option<Order>>;

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> GatewayResult<Option<Order>>;

    /// Deletes the order together with its lines.
    async fn delete_order(&self, id: Uuid) -> GatewayResult<bool>;

    async fn query_orders(&self, query: OrderQuery) -> GatewayResult<Vec<Order>>;

    async fn count_orders(&self, status: Option<OrderStatus>) -> GatewayResult<u64>;

    /// Sum of `total_value` over every stored order.
    async fn sum_order_totals(&self) -> GatewayResult<Decimal>;

    /// Lines of the given orders joined with product names, in recording
    /// order within each order.
    async fn order_lines_with_products(
        &self,
        order_ids: &[Uuid],
    ) -> GatewayResult<Vec<ResolvedOrderLine>>;
}
