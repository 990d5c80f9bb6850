use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Material, ProductMaterial};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MaterialDraft {
    pub name: Option<String>,
    /// `g`, `ml`, `m` or `un`.
    pub unit: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub available_quantity: Option<Decimal>,
    pub minimum_threshold: Option<Decimal>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuantityAdjustRequest {
    pub delta: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCompositionRequest {
    pub material_id: Uuid,
    pub consumed_quantity: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MaterialList {
    #[schema(value_type = Vec<Material>)]
    pub items: Vec<Material>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CompositionList {
    #[schema(value_type = Vec<ProductMaterial>)]
    pub items: Vec<ProductMaterial>,
}
