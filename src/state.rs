use std::sync::Arc;

use crate::{
    config::DEFAULT_RECENT_ORDERS,
    gateway::{Gateway, InMemoryGateway},
};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub recent_orders_limit: u64,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>, recent_orders_limit: u64) -> Self {
        Self {
            gateway,
            recent_orders_limit,
        }
    }

    /// State over a fresh in-memory gateway with default settings.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryGateway::new()), DEFAULT_RECENT_ORDERS)
    }
}
