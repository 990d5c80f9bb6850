use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Gateway, GatewayError, GatewayResult, MaterialQuery, OrderQuery, ProductQuery};
use crate::models::{
    Material, MaterialFields, Order, OrderLine, OrderStatus, Product, ProductFields,
    ProductMaterial, ResolvedOrderLine,
};

#[derive(Default)]
struct Tables {
    products: HashMap<Uuid, Product>,
    materials: HashMap<Uuid, Material>,
    compositions: Vec<ProductMaterial>,
    orders: HashMap<Uuid, Order>,
    order_lines: Vec<OrderLine>,
}

/// Gateway that keeps every table in memory.
///
/// Mirrors the foreign keys of the Postgres schema, so a test that passes here
/// sees the same constraint failures it would against the database. All tables
/// sit behind a single lock, which makes multi-table writes atomic.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every row from every table.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }
}

fn apply_limit<T>(mut rows: Vec<T>, limit: Option<u64>) -> Vec<T> {
    if let Some(limit) = limit {
        rows.truncate(limit as usize);
    }
    rows
}

fn duplicate_key(table: &str, id: Uuid) -> GatewayError {
    GatewayError::ConstraintViolation(format!("duplicate key {id} in {table}"))
}

#[async_trait]
impl Gateway for InMemoryGateway {
    async fn insert_product(&self, product: Product) -> GatewayResult<Product> {
        let mut tables = self.tables.write().await;
        if tables.products.contains_key(&product.id) {
            return Err(duplicate_key("products", product.id));
        }
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> GatewayResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn update_product(
        &self,
        id: Uuid,
        fields: ProductFields,
    ) -> GatewayResult<Option<Product>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.products.remove(&id) else {
            return Ok(None);
        };
        let updated = existing.with_fields(fields);
        tables.products.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_product(&self, id: Uuid) -> GatewayResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(false);
        }
        if tables.order_lines.iter().any(|line| line.product_id == id) {
            return Err(GatewayError::ConstraintViolation(format!(
                "product {id} is referenced by order lines"
            )));
        }
        tables.products.remove(&id);
        tables.compositions.retain(|line| line.product_id != id);
        Ok(true)
    }

    async fn query_products(&self, query: ProductQuery) -> GatewayResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Product> = tables
            .products
            .values()
            .filter(|p| query.kind.is_none_or(|kind| p.kind == kind))
            .filter(|p| query.availability.is_none_or(|a| p.availability == a))
            .filter(|p| !query.in_stock_only || p.current_stock > 0)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(apply_limit(rows, query.limit))
    }

    async fn insert_material(&self, material: Material) -> GatewayResult<Material> {
        let mut tables = self.tables.write().await;
        if tables.materials.contains_key(&material.id) {
            return Err(duplicate_key("materials", material.id));
        }
        tables.materials.insert(material.id, material.clone());
        Ok(material)
    }

    async fn get_material(&self, id: Uuid) -> GatewayResult<Option<Material>> {
        Ok(self.tables.read().await.materials.get(&id).cloned())
    }

    async fn update_material(
        &self,
        id: Uuid,
        fields: MaterialFields,
    ) -> GatewayResult<Option<Material>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.materials.remove(&id) else {
            return Ok(None);
        };
        let updated = existing.with_fields(fields);
        tables.materials.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_material(&self, id: Uuid) -> GatewayResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.materials.remove(&id).is_none() {
            return Ok(false);
        }
        tables.compositions.retain(|line| line.material_id != id);
        Ok(true)
    }

    async fn query_materials(&self, query: MaterialQuery) -> GatewayResult<Vec<Material>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Material> = tables
            .materials
            .values()
            .filter(|m| !query.low_stock_only || m.is_low_stock())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(apply_limit(rows, query.limit))
    }

    async fn insert_product_material(
        &self,
        line: ProductMaterial,
    ) -> GatewayResult<ProductMaterial> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&line.product_id) {
            return Err(GatewayError::ConstraintViolation(format!(
                "product {} does not exist",
                line.product_id
            )));
        }
        if !tables.materials.contains_key(&line.material_id) {
            return Err(GatewayError::ConstraintViolation(format!(
                "material {} does not exist",
                line.material_id
            )));
        }
        if tables.compositions.iter().any(|c| c.id == line.id) {
            return Err(duplicate_key("product_materials", line.id));
        }
        tables.compositions.push(line.clone());
        Ok(line)
    }

    async fn list_product_materials(
        &self,
        product_id: Uuid,
    ) -> GatewayResult<Vec<ProductMaterial>> {
        let tables = self.tables.read().await;
        Ok(tables
            .compositions
            .iter()
            .filter(|line| line.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn delete_product_material(&self, product_id: Uuid, id: Uuid) -> GatewayResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.compositions.len();
        tables
            .compositions
            .retain(|line| !(line.id == id && line.product_id == product_id));
        Ok(tables.compositions.len() != before)
    }

    async fn insert_order(&self, order: Order, lines: Vec<OrderLine>) -> GatewayResult<Order> {
        let mut tables = self.tables.write().await;
        if tables.orders.contains_key(&order.id) {
            return Err(duplicate_key("orders", order.id));
        }
        // Check every line before touching any table.
        let mut line_ids = HashSet::new();
        for line in &lines {
            if !line_ids.insert(line.id) || tables.order_lines.iter().any(|l| l.id == line.id) {
                return Err(duplicate_key("order_lines", line.id));
            }
            if line.order_id != order.id {
                return Err(GatewayError::ConstraintViolation(format!(
                    "order line {} belongs to order {}",
                    line.id, line.order_id
                )));
            }
            if !tables.products.contains_key(&line.product_id) {
                return Err(GatewayError::ConstraintViolation(format!(
                    "product {} does not exist",
                    line.product_id
                )));
            }
            if line.quantity <= 0 {
                return Err(GatewayError::ConstraintViolation(format!(
                    "order line {} has quantity {}",
                    line.id, line.quantity
                )));
            }
        }

        tables.orders.insert(order.id, order.clone());
        tables.order_lines.extend(lines);
        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> GatewayResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> GatewayResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        Ok(tables.orders.get_mut(&id).map(|order| {
            order.status = status;
            order.clone()
        }))
    }

    async fn delete_order(&self, id: Uuid) -> GatewayResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.orders.remove(&id).is_none() {
            return Ok(false);
        }
        tables.order_lines.retain(|line| line.order_id != id);
        Ok(true)
    }

    async fn query_orders(&self, query: OrderQuery) -> GatewayResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| query.status.is_none_or(|status| o.status == status))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(apply_limit(rows, query.limit))
    }

    async fn count_orders(&self, status: Option<OrderStatus>) -> GatewayResult<u64> {
        let tables = self.tables.read().await;
        let count = tables
            .orders
            .values()
            .filter(|o| status.is_none_or(|status| o.status == status))
            .count();
        Ok(count as u64)
    }

    async fn sum_order_totals(&self) -> GatewayResult<Decimal> {
        let tables = self.tables.read().await;
        Ok(tables.orders.values().map(|o| o.total_value).sum())
    }

    async fn order_lines_with_products(
        &self,
        order_ids: &[Uuid],
    ) -> GatewayResult<Vec<ResolvedOrderLine>> {
        let tables = self.tables.read().await;
        Ok(tables
            .order_lines
            .iter()
            .filter(|line| order_ids.contains(&line.order_id))
            .map(|line| ResolvedOrderLine {
                id: line.id,
                order_id: line.order_id,
                product_id: line.product_id,
                product_name: tables.products.get(&line.product_id).map(|p| p.name.clone()),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect())
    }
}
