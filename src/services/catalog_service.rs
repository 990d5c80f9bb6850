use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    gateway::{MaterialQuery, ProductQuery},
    models::{Availability, Material, Product, ProductKind, ProductMaterial, now},
    state::AppState,
    validation::{ValidatedMaterial, ValidatedProduct, check_quantity, validate_consumed_quantity},
};

/// Appended to the name of a duplicated product.
pub const COPY_SUFFIX: &str = " (Cópia)";

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub kind: Option<ProductKind>,
    pub availability: Option<Availability>,
}

pub async fn create_product(state: &AppState, validated: ValidatedProduct) -> AppResult<Product> {
    let product = Product::new(Uuid::new_v4(), now(), validated.into_fields());
    let product = state.gateway.insert_product(product).await?;
    tracing::info!(product_id = %product.id, name = %product.name, "product created");
    Ok(product)
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    state
        .gateway
        .get_product(id)
        .await?
        .ok_or(AppError::NotFound("product"))
}

pub async fn list_products(state: &AppState, filter: ProductFilter) -> AppResult<Vec<Product>> {
    let query = ProductQuery {
        kind: filter.kind,
        availability: filter.availability,
        ..Default::default()
    };
    Ok(state.gateway.query_products(query).await?)
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    validated: ValidatedProduct,
) -> AppResult<Product> {
    let product = state
        .gateway
        .update_product(id, validated.into_fields())
        .await?
        .ok_or(AppError::NotFound("product"))?;
    tracing::info!(product_id = %product.id, "product updated");
    Ok(product)
}

/// Creates a copy of a product under a new id. Stock is not copied.
pub async fn duplicate_product(state: &AppState, id: Uuid) -> AppResult<Product> {
    let source = get_product(state, id).await?;

    let mut fields = source.fields();
    fields.name = format!("{}{COPY_SUFFIX}", fields.name);
    fields.current_stock = 0;

    let copy = state
        .gateway
        .insert_product(Product::new(Uuid::new_v4(), now(), fields))
        .await?;
    tracing::info!(source_id = %id, product_id = %copy.id, "product duplicated");
    Ok(copy)
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<()> {
    if !state.gateway.delete_product(id).await? {
        return Err(AppError::NotFound("product"));
    }
    tracing::info!(product_id = %id, "product deleted");
    Ok(())
}

pub async fn adjust_product_stock(state: &AppState, id: Uuid, delta: i32) -> AppResult<Product> {
    if delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let product = get_product(state, id).await?;
    let new_stock = product
        .current_stock
        .checked_add(delta)
        .filter(|stock| *stock >= 0)
        .ok_or_else(|| AppError::BadRequest("stock cannot be negative".into()))?;

    let mut fields = product.fields();
    fields.current_stock = new_stock;
    let updated = state
        .gateway
        .update_product(id, fields)
        .await?
        .ok_or(AppError::NotFound("product"))?;
    tracing::info!(product_id = %id, delta, stock = new_stock, "product stock adjusted");
    Ok(updated)
}

/// Units on hand across every product that has any.
pub async fn total_available_stock(state: &AppState) -> AppResult<i64> {
    let in_stock = state
        .gateway
        .query_products(ProductQuery {
            in_stock_only: true,
            ..Default::default()
        })
        .await?;
    Ok(in_stock.iter().map(|p| i64::from(p.current_stock)).sum())
}

pub async fn create_material(
    state: &AppState,
    validated: ValidatedMaterial,
) -> AppResult<Material> {
    let material = Material::new(Uuid::new_v4(), now(), validated.into_fields());
    let material = state.gateway.insert_material(material).await?;
    tracing::info!(material_id = %material.id, name = %material.name, "material created");
    Ok(material)
}

pub async fn get_material(state: &AppState, id: Uuid) -> AppResult<Material> {
    state
        .gateway
        .get_material(id)
        .await?
        .ok_or(AppError::NotFound("material"))
}

pub async fn list_materials(state: &AppState) -> AppResult<Vec<Material>> {
    Ok(state
        .gateway
        .query_materials(MaterialQuery::default())
        .await?)
}

pub async fn update_material(
    state: &AppState,
    id: Uuid,
    validated: ValidatedMaterial,
) -> AppResult<Material> {
    let material = state
        .gateway
        .update_material(id, validated.into_fields())
        .await?
        .ok_or(AppError::NotFound("material"))?;
    tracing::info!(material_id = %id, "material updated");
    Ok(material)
}

pub async fn delete_material(state: &AppState, id: Uuid) -> AppResult<()> {
    if !state.gateway.delete_material(id).await? {
        return Err(AppError::NotFound("material"));
    }
    tracing::info!(material_id = %id, "material deleted");
    Ok(())
}

pub async fn adjust_material_quantity(
    state: &AppState,
    id: Uuid,
    delta: Decimal,
) -> AppResult<Material> {
    if delta.is_zero() {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let material = get_material(state, id).await?;
    let new_quantity = material
        .available_quantity
        .checked_add(delta)
        .ok_or_else(|| AppError::BadRequest("quantity out of range".into()))?;
    if new_quantity < Decimal::ZERO {
        return Err(AppError::BadRequest("quantity cannot be negative".into()));
    }
    check_quantity(new_quantity, "available_quantity")?;

    let mut fields = material.fields();
    fields.available_quantity = new_quantity;
    let updated = state
        .gateway
        .update_material(id, fields)
        .await?
        .ok_or(AppError::NotFound("material"))?;

    if updated.is_low_stock() {
        tracing::warn!(
            material_id = %id,
            available = %updated.available_quantity,
            minimum = %updated.minimum_threshold,
            "material below minimum threshold"
        );
    }
    Ok(updated)
}

/// Materials whose available quantity is under their minimum threshold.
pub async fn low_stock_materials(state: &AppState) -> AppResult<Vec<Material>> {
    Ok(state
        .gateway
        .query_materials(MaterialQuery {
            low_stock_only: true,
            ..Default::default()
        })
        .await?)
}

pub async fn add_product_material(
    state: &AppState,
    product_id: Uuid,
    material_id: Uuid,
    consumed_quantity: Decimal,
) -> AppResult<ProductMaterial> {
    validate_consumed_quantity(consumed_quantity)?;
    get_product(state, product_id).await?;
    get_material(state, material_id).await?;

    let line = state
        .gateway
        .insert_product_material(ProductMaterial {
            id: Uuid::new_v4(),
            product_id,
            material_id,
            consumed_quantity,
        })
        .await?;
    Ok(line)
}

pub async fn list_product_materials(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<Vec<ProductMaterial>> {
    get_product(state, product_id).await?;
    Ok(state.gateway.list_product_materials(product_id).await?)
}

pub async fn remove_product_material(
    state: &AppState,
    product_id: Uuid,
    line_id: Uuid,
) -> AppResult<()> {
    if !state
        .gateway
        .delete_product_material(product_id, line_id)
        .await?
    {
        return Err(AppError::NotFound("product material"));
    }
    Ok(())
}
