use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::{Gateway, GatewayError, GatewayResult, MaterialQuery, OrderQuery, ProductQuery};
use crate::{
    entity::{
        materials::{
            ActiveModel as MaterialActive, Column as MatCol, Entity as Materials,
            Model as MaterialModel,
        },
        order_lines::{
            self, ActiveModel as OrderLineActive, Column as LineCol, Entity as OrderLines,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        product_materials::{
            ActiveModel as CompositionActive, Column as CompCol, Entity as ProductMaterials,
            Model as CompositionModel,
        },
        products::{
            ActiveModel as ProductActive, Column as ProdCol, Entity as Products,
            Model as ProductModel,
        },
    },
    models::{
        Material, MaterialFields, Order, OrderLine, OrderStatus, Product, ProductFields,
        ProductMaterial, ResolvedOrderLine, UnknownToken, now,
    },
};

/// Gateway over a Postgres database through sea-orm.
#[derive(Clone)]
pub struct SeaOrmGateway {
    conn: DatabaseConnection,
}

impl SeaOrmGateway {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

fn map_db_err(err: DbErr) -> GatewayError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(msg))
        | Some(SqlErr::UniqueConstraintViolation(msg)) => GatewayError::ConstraintViolation(msg),
        _ => GatewayError::Database(err),
    }
}

fn decode<T>(token: &str) -> GatewayResult<T>
where
    T: FromStr<Err = UnknownToken>,
{
    token
        .parse::<T>()
        .map_err(|err| GatewayError::Decode(err.to_string()))
}

#[async_trait]
impl Gateway for SeaOrmGateway {
    async fn insert_product(&self, product: Product) -> GatewayResult<Product> {
        let active = ProductActive {
            id: Set(product.id),
            created_at: Set(product.created_at.into()),
            ..Default::default()
        };
        let model = apply_product_fields(active, product.fields())
            .insert(&self.conn)
            .await
            .map_err(map_db_err)?;
        product_from_entity(model)
    }

    async fn get_product(&self, id: Uuid) -> GatewayResult<Option<Product>> {
        Products::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(product_from_entity)
            .transpose()
    }

    async fn update_product(
        &self,
        id: Uuid,
        fields: ProductFields,
    ) -> GatewayResult<Option<Product>> {
        let existing = Products::find_by_id(id).one(&self.conn).await?;
        let existing = match existing {
            Some(p) => p,
            None => return Ok(None),
        };

        let model = apply_product_fields(existing.into(), fields)
            .update(&self.conn)
            .await
            .map_err(map_db_err)?;
        product_from_entity(model).map(Some)
    }

    async fn delete_product(&self, id: Uuid) -> GatewayResult<bool> {
        let result = Products::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn query_products(&self, query: ProductQuery) -> GatewayResult<Vec<Product>> {
        let mut condition = Condition::all();
        if let Some(kind) = query.kind {
            condition = condition.add(ProdCol::Kind.eq(kind.as_str()));
        }
        if let Some(availability) = query.availability {
            condition = condition.add(ProdCol::Availability.eq(availability.as_str()));
        }
        if query.in_stock_only {
            condition = condition.add(ProdCol::CurrentStock.gt(0));
        }

        let mut finder = Products::find()
            .filter(condition)
            .order_by_desc(ProdCol::CreatedAt)
            .order_by_asc(ProdCol::Id);
        if let Some(limit) = query.limit {
            finder = finder.limit(limit);
        }

        finder
            .all(&self.conn)
            .await?
            .into_iter()
            .map(product_from_entity)
            .collect()
    }

    async fn insert_material(&self, material: Material) -> GatewayResult<Material> {
        let active = MaterialActive {
            id: Set(material.id),
            created_at: Set(material.created_at.into()),
            ..Default::default()
        };
        let model = apply_material_fields(active, material.fields())
            .insert(&self.conn)
            .await
            .map_err(map_db_err)?;
        material_from_entity(model)
    }

    async fn get_material(&self, id: Uuid) -> GatewayResult<Option<Material>> {
        Materials::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(material_from_entity)
            .transpose()
    }

    async fn update_material(
        &self,
        id: Uuid,
        fields: MaterialFields,
    ) -> GatewayResult<Option<Material>> {
        let existing = Materials::find_by_id(id).one(&self.conn).await?;
        let existing = match existing {
            Some(m) => m,
            None => return Ok(None),
        };

        let model = apply_material_fields(existing.into(), fields)
            .update(&self.conn)
            .await
            .map_err(map_db_err)?;
        material_from_entity(model).map(Some)
    }

    async fn delete_material(&self, id: Uuid) -> GatewayResult<bool> {
        let result = Materials::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn query_materials(&self, query: MaterialQuery) -> GatewayResult<Vec<Material>> {
        let mut finder = Materials::find();
        if query.low_stock_only {
            finder = finder.filter(
                Expr::col(MatCol::AvailableQuantity).lt(Expr::col(MatCol::MinimumThreshold)),
            );
        }
        finder = finder
            .order_by_desc(MatCol::CreatedAt)
            .order_by_asc(MatCol::Id);
        if let Some(limit) = query.limit {
            finder = finder.limit(limit);
        }

        finder
            .all(&self.conn)
            .await?
            .into_iter()
            .map(material_from_entity)
            .collect()
    }

    async fn insert_product_material(
        &self,
        line: ProductMaterial,
    ) -> GatewayResult<ProductMaterial> {
        let model = CompositionActive {
            id: Set(line.id),
            product_id: Set(line.product_id),
            material_id: Set(line.material_id),
            consumed_quantity: Set(line.consumed_quantity),
            created_at: Set(now().into()),
        }
        .insert(&self.conn)
        .await
        .map_err(map_db_err)?;
        Ok(composition_from_entity(model))
    }

    async fn list_product_materials(
        &self,
        product_id: Uuid,
    ) -> GatewayResult<Vec<ProductMaterial>> {
        let rows = ProductMaterials::find()
            .filter(CompCol::ProductId.eq(product_id))
            .order_by_asc(CompCol::CreatedAt)
            .order_by_asc(CompCol::Id)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(composition_from_entity)
            .collect();
        Ok(rows)
    }

    async fn delete_product_material(&self, product_id: Uuid, id: Uuid) -> GatewayResult<bool> {
        let result = ProductMaterials::delete_many()
            .filter(
                Condition::all()
                    .add(CompCol::Id.eq(id))
                    .add(CompCol::ProductId.eq(product_id)),
            )
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn insert_order(&self, order: Order, lines: Vec<OrderLine>) -> GatewayResult<Order> {
        let txn = self.conn.begin().await?;

        let stored = OrderActive {
            id: Set(order.id),
            client_name: Set(order.client_name),
            order_date: Set(order.order_date.into()),
            status: Set(order.status.as_str().to_string()),
            observations: Set(order.observations),
            total_value: Set(order.total_value),
            created_at: Set(order.created_at.into()),
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        for (position, line) in lines.into_iter().enumerate() {
            OrderLineActive {
                id: Set(line.id),
                order_id: Set(line.order_id),
                product_id: Set(line.product_id),
                position: Set(position as i32),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
            }
            .insert(&txn)
            .await
            .map_err(map_db_err)?;
        }

        // Dropping `txn` on any early return above rolls everything back.
        txn.commit().await?;

        order_from_entity(stored)
    }

    async fn get_order(&self, id: Uuid) -> GatewayResult<Option<Order>> {
        Orders::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(order_from_entity)
            .transpose()
    }

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> GatewayResult<Option<Order>> {
        let existing = Orders::find_by_id(id).one(&self.conn).await?;
        let existing = match existing {
            Some(o) => o,
            None => return Ok(None),
        };

        let mut active: OrderActive = existing.into();
        active.status = Set(status.as_str().to_string());
        let order = active.update(&self.conn).await?;
        order_from_entity(order).map(Some)
    }

    async fn delete_order(&self, id: Uuid) -> GatewayResult<bool> {
        let txn = self.conn.begin().await?;

        OrderLines::delete_many()
            .filter(LineCol::OrderId.eq(id))
            .exec(&txn)
            .await?;
        let result = Orders::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn query_orders(&self, query: OrderQuery) -> GatewayResult<Vec<Order>> {
        let mut condition = Condition::all();
        if let Some(status) = query.status {
            condition = condition.add(OrderCol::Status.eq(status.as_str()));
        }

        let mut finder = Orders::find()
            .filter(condition)
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_asc(OrderCol::Id);
        if let Some(limit) = query.limit {
            finder = finder.limit(limit);
        }

        finder
            .all(&self.conn)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect()
    }

    async fn count_orders(&self, status: Option<OrderStatus>) -> GatewayResult<u64> {
        let mut finder = Orders::find();
        if let Some(status) = status {
            finder = finder.filter(OrderCol::Status.eq(status.as_str()));
        }
        Ok(finder.count(&self.conn).await?)
    }

    async fn sum_order_totals(&self) -> GatewayResult<Decimal> {
        let total: Option<Option<Decimal>> = Orders::find()
            .select_only()
            .column_as(OrderCol::TotalValue.sum(), "total")
            .into_tuple()
            .one(&self.conn)
            .await?;
        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }

    async fn order_lines_with_products(
        &self,
        order_ids: &[Uuid],
    ) -> GatewayResult<Vec<ResolvedOrderLine>> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        #[derive(Debug, FromQueryResult)]
        struct LineProductRow {
            id: Uuid,
            order_id: Uuid,
            product_id: Uuid,
            quantity: i32,
            unit_price: Decimal,
            product_name: Option<String>,
        }

        let rows = OrderLines::find()
            .select_only()
            .column(LineCol::Id)
            .column(LineCol::OrderId)
            .column(LineCol::ProductId)
            .column(LineCol::Quantity)
            .column(LineCol::UnitPrice)
            .column_as(ProdCol::Name, "product_name")
            .join(JoinType::LeftJoin, order_lines::Relation::Products.def())
            .filter(LineCol::OrderId.is_in(order_ids.iter().copied()))
            .order_by_asc(LineCol::OrderId)
            .order_by_asc(LineCol::Position)
            .into_model::<LineProductRow>()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| ResolvedOrderLine {
                id: row.id,
                order_id: row.order_id,
                product_id: row.product_id,
                product_name: row.product_name,
                quantity: row.quantity,
                unit_price: row.unit_price,
            })
            .collect())
    }
}

fn apply_product_fields(mut active: ProductActive, fields: ProductFields) -> ProductActive {
    active.name = Set(fields.name);
    active.kind = Set(fields.kind.as_str().to_string());
    active.size = Set(fields.size);
    active.sale_price = Set(fields.sale_price);
    active.production_cost = Set(fields.production_cost);
    active.production_minutes = Set(fields.production_minutes);
    active.description = Set(fields.description);
    active.availability = Set(fields.availability.as_str().to_string());
    active.current_stock = Set(fields.current_stock);
    active.image_url = Set(fields.image_url);
    active
}

fn apply_material_fields(mut active: MaterialActive, fields: MaterialFields) -> MaterialActive {
    active.name = Set(fields.name);
    active.unit = Set(fields.unit.as_str().to_string());
    active.unit_cost = Set(fields.unit_cost);
    active.available_quantity = Set(fields.available_quantity);
    active.minimum_threshold = Set(fields.minimum_threshold);
    active
}

fn product_from_entity(model: ProductModel) -> GatewayResult<Product> {
    Ok(Product {
        id: model.id,
        name: model.name,
        kind: decode(&model.kind)?,
        size: model.size,
        sale_price: model.sale_price,
        production_cost: model.production_cost,
        production_minutes: model.production_minutes,
        description: model.description,
        availability: decode(&model.availability)?,
        current_stock: model.current_stock,
        image_url: model.image_url,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn material_from_entity(model: MaterialModel) -> GatewayResult<Material> {
    Ok(Material {
        id: model.id,
        name: model.name,
        unit: decode(&model.unit)?,
        unit_cost: model.unit_cost,
        available_quantity: model.available_quantity,
        minimum_threshold: model.minimum_threshold,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn composition_from_entity(model: CompositionModel) -> ProductMaterial {
    ProductMaterial {
        id: model.id,
        product_id: model.product_id,
        material_id: model.material_id,
        consumed_quantity: model.consumed_quantity,
    }
}

fn order_from_entity(model: OrderModel) -> GatewayResult<Order> {
    Ok(Order {
        id: model.id,
        client_name: model.client_name,
        order_date: model.order_date.with_timezone(&Utc),
        status: decode(&model.status)?,
        observations: model.observations,
        total_value: model.total_value,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
