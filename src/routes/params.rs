use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::models::{Availability, OrderStatus, ProductKind};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct ProductListQuery {
    pub kind: Option<ProductKind>,
    pub availability: Option<Availability>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub limit: Option<u64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct RecentOrdersQuery {
    /// Defaults to the configured dashboard limit.
    pub limit: Option<u64>,
}
