//! Draft checks that run before anything reaches the gateway.
//!
//! Every function here is pure: same draft in, same verdict out.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    dto::{materials::MaterialDraft, orders::OrderDraft, products::ProductDraft},
    models::{Availability, MaterialFields, MaterialUnit, ProductFields, ProductKind},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),

    #[error("sale price {sale_price} does not exceed production cost {production_cost}")]
    PriceBelowCost {
        sale_price: Decimal,
        production_cost: Decimal,
    },

    #[error("invalid `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Product fields that passed [`validate_product_draft`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProduct(ProductFields);

impl ValidatedProduct {
    pub fn fields(&self) -> &ProductFields {
        &self.0
    }

    pub fn into_fields(self) -> ProductFields {
        self.0
    }
}

/// Material fields that passed [`validate_material_draft`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMaterial(MaterialFields);

impl ValidatedMaterial {
    pub fn fields(&self) -> &MaterialFields {
        &self.0
    }

    pub fn into_fields(self) -> MaterialFields {
        self.0
    }
}

pub fn validate_product_draft(draft: &ProductDraft) -> Result<ValidatedProduct, ValidationError> {
    let name = required_text(draft.name.as_deref(), "name")?;
    let kind = required_text(draft.kind.as_deref(), "kind")?;
    let sale_price = draft
        .sale_price
        .ok_or(ValidationError::MissingRequiredField("sale_price"))?;

    let kind: ProductKind = parse_token(kind, "kind")?;
    let availability = match optional_text(draft.availability.as_deref()) {
        Some(token) => parse_token(&token, "availability")?,
        None => Availability::default(),
    };

    non_negative_decimal(sale_price, "sale_price")?;
    check_money(sale_price, "sale_price")?;
    if let Some(cost) = draft.production_cost {
        non_negative_decimal(cost, "production_cost")?;
        check_money(cost, "production_cost")?;
    }
    if let Some(minutes) = draft.production_minutes {
        non_negative_int(minutes, "production_minutes")?;
    }
    let current_stock = draft.current_stock.unwrap_or(0);
    non_negative_int(current_stock, "current_stock")?;

    // A missing cost counts as zero and never trips the check.
    let production_cost = draft.production_cost.unwrap_or(Decimal::ZERO);
    if production_cost > Decimal::ZERO && sale_price <= production_cost {
        return Err(ValidationError::PriceBelowCost {
            sale_price,
            production_cost,
        });
    }

    Ok(ValidatedProduct(ProductFields {
        name: name.to_string(),
        kind,
        size: optional_text(draft.size.as_deref()),
        sale_price,
        production_cost: draft.production_cost,
        production_minutes: draft.production_minutes,
        description: optional_text(draft.description.as_deref()),
        availability,
        current_stock,
        image_url: optional_text(draft.image_url.as_deref()),
    }))
}

pub fn validate_material_draft(
    draft: &MaterialDraft,
) -> Result<ValidatedMaterial, ValidationError> {
    let name = required_text(draft.name.as_deref(), "name")?;
    let unit = required_text(draft.unit.as_deref(), "unit")?;
    let unit: MaterialUnit = parse_token(unit, "unit")?;

    if let Some(cost) = draft.unit_cost {
        non_negative_decimal(cost, "unit_cost")?;
        check_money(cost, "unit_cost")?;
    }
    let available_quantity = draft.available_quantity.unwrap_or(Decimal::ZERO);
    non_negative_decimal(available_quantity, "available_quantity")?;
    check_quantity(available_quantity, "available_quantity")?;
    let minimum_threshold = draft.minimum_threshold.unwrap_or(Decimal::ZERO);
    non_negative_decimal(minimum_threshold, "minimum_threshold")?;
    check_quantity(minimum_threshold, "minimum_threshold")?;

    Ok(ValidatedMaterial(MaterialFields {
        name: name.to_string(),
        unit,
        unit_cost: draft.unit_cost,
        available_quantity,
        minimum_threshold,
    }))
}

pub fn validate_order_draft(draft: &OrderDraft) -> Result<(), ValidationError> {
    for line in &draft.lines {
        if line.quantity <= 0 {
            return Err(ValidationError::InvalidValue {
                field: "quantity",
                reason: format!("must be greater than 0, got {}", line.quantity),
            });
        }
        if let Some(price) = line.unit_price {
            non_negative_decimal(price, "unit_price")?;
            check_money(price, "unit_price")?;
        }
    }
    if let Some(total) = draft.total_value {
        non_negative_decimal(total, "total_value")?;
        check_money(total, "total_value")?;
    }
    Ok(())
}

pub fn validate_consumed_quantity(quantity: Decimal) -> Result<(), ValidationError> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            field: "consumed_quantity",
            reason: format!("must be greater than 0, got {quantity}"),
        });
    }
    check_quantity(quantity, "consumed_quantity")
}

/// Money columns hold 12 digits, 2 of them after the point.
pub fn check_money(value: Decimal, field: &'static str) -> Result<(), ValidationError> {
    check_fits(value, field, MONEY_SCALE, Decimal::from(MONEY_LIMIT))
}

/// Quantity columns hold 12 digits, 3 of them after the point.
pub fn check_quantity(value: Decimal, field: &'static str) -> Result<(), ValidationError> {
    check_fits(value, field, QUANTITY_SCALE, Decimal::from(QUANTITY_LIMIT))
}

const MONEY_SCALE: u32 = 2;
const MONEY_LIMIT: i64 = 10_000_000_000;
const QUANTITY_SCALE: u32 = 3;
const QUANTITY_LIMIT: i64 = 1_000_000_000;

fn check_fits(
    value: Decimal,
    field: &'static str,
    scale: u32,
    limit: Decimal,
) -> Result<(), ValidationError> {
    if value.normalize().scale() > scale {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("at most {scale} decimal places allowed, got {value}"),
        });
    }
    if value.abs() >= limit {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("must be below {limit}, got {value}"),
        });
    }
    Ok(())
}

fn required_text<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingRequiredField(field)),
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_token<T>(token: &str, field: &'static str) -> Result<T, ValidationError>
where
    T: FromStr<Err = crate::models::UnknownToken>,
{
    token.parse::<T>().map_err(|err| ValidationError::InvalidValue {
        field,
        reason: err.to_string(),
    })
}

fn non_negative_decimal(value: Decimal, field: &'static str) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}

fn non_negative_int(value: i32, field: &'static str) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::InvalidValue {
            field,
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}
