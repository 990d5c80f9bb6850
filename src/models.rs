use std::{fmt, str::FromStr};

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Current time at the precision Postgres `TIMESTAMPTZ` keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToken {
    pub kind: &'static str,
    pub token: String,
}

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.token)
    }
}

impl std::error::Error for UnknownToken {}

/// Declares a string-token enum: serde, `as_str`, `FromStr` and `Display` all
/// share one token table, which is also what the database columns store.
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(UnknownToken {
                        kind: $label,
                        token: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

token_enum! {
    /// What the workshop makes.
    ProductKind, "product kind" {
        Candle => "vela",
        StainedGlass => "vitral",
    }
}

token_enum! {
    Availability, "availability" {
        ReadyStock => "pronta_entrega",
        MadeToOrder => "sob_encomenda",
    }
}

impl Default for Availability {
    fn default() -> Self {
        Availability::MadeToOrder
    }
}

token_enum! {
    MaterialUnit, "material unit" {
        Gram => "g",
        Milliliter => "ml",
        Meter => "m",
        Unit => "un",
    }
}

token_enum! {
    /// Order lifecycle. Moves forward only: in production, ready, delivered.
    OrderStatus, "order status" {
        InProduction => "em_producao",
        Ready => "pronto",
        Delivered => "entregue",
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::InProduction
    }
}

impl OrderStatus {
    fn rank(&self) -> u8 {
        match self {
            OrderStatus::InProduction => 0,
            OrderStatus::Ready => 1,
            OrderStatus::Delivered => 2,
        }
    }

    /// `true` when `next` is strictly later in the lifecycle. Skipping a step
    /// (in production straight to delivered) is allowed.
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        next.rank() > self.rank()
    }
}

/// Mutable part of a product. Update replaces all of it at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductFields {
    pub name: String,
    pub kind: ProductKind,
    pub size: Option<String>,
    pub sale_price: Decimal,
    pub production_cost: Option<Decimal>,
    pub production_minutes: Option<i32>,
    pub description: Option<String>,
    pub availability: Availability,
    pub current_stock: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub kind: ProductKind,
    pub size: Option<String>,
    pub sale_price: Decimal,
    pub production_cost: Option<Decimal>,
    pub production_minutes: Option<i32>,
    pub description: Option<String>,
    pub availability: Availability,
    pub current_stock: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(id: Uuid, created_at: DateTime<Utc>, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            kind: fields.kind,
            size: fields.size,
            sale_price: fields.sale_price,
            production_cost: fields.production_cost,
            production_minutes: fields.production_minutes,
            description: fields.description,
            availability: fields.availability,
            current_stock: fields.current_stock,
            image_url: fields.image_url,
            created_at,
        }
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            kind: self.kind,
            size: self.size.clone(),
            sale_price: self.sale_price,
            production_cost: self.production_cost,
            production_minutes: self.production_minutes,
            description: self.description.clone(),
            availability: self.availability,
            current_stock: self.current_stock,
            image_url: self.image_url.clone(),
        }
    }

    pub fn with_fields(self, fields: ProductFields) -> Self {
        Product::new(self.id, self.created_at, fields)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MaterialFields {
    pub name: String,
    pub unit: MaterialUnit,
    pub unit_cost: Option<Decimal>,
    pub available_quantity: Decimal,
    pub minimum_threshold: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Material {
    pub id: Uuid,
    pub name: String,
    pub unit: MaterialUnit,
    pub unit_cost: Option<Decimal>,
    pub available_quantity: Decimal,
    pub minimum_threshold: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Material {
    pub fn new(id: Uuid, created_at: DateTime<Utc>, fields: MaterialFields) -> Self {
        Self {
            id,
            name: fields.name,
            unit: fields.unit,
            unit_cost: fields.unit_cost,
            available_quantity: fields.available_quantity,
            minimum_threshold: fields.minimum_threshold,
            created_at,
        }
    }

    pub fn fields(&self) -> MaterialFields {
        MaterialFields {
            name: self.name.clone(),
            unit: self.unit,
            unit_cost: self.unit_cost,
            available_quantity: self.available_quantity,
            minimum_threshold: self.minimum_threshold,
        }
    }

    pub fn with_fields(self, fields: MaterialFields) -> Self {
        Material::new(self.id, self.created_at, fields)
    }

    pub fn is_low_stock(&self) -> bool {
        self.available_quantity < self.minimum_threshold
    }
}

/// One composition line: how much of a material one unit of a product uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductMaterial {
    pub id: Uuid,
    pub product_id: Uuid,
    pub material_id: Uuid,
    pub consumed_quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub client_name: Option<String>,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub observations: Option<String>,
    pub total_value: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Price at order time; later product price changes do not touch it.
    pub unit_price: Decimal,
}

/// Order line joined with the name of the product it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResolvedOrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
}
