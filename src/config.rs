use std::env;

use anyhow::Context;

pub const DEFAULT_RECENT_ORDERS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// How many orders the dashboard lists under "recent orders".
    pub recent_orders_limit: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let recent_orders_limit = env::var("DASHBOARD_RECENT_LIMIT")
            .ok()
            .and_then(|n| n.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_RECENT_ORDERS);
        Ok(Self {
            port,
            database_url,
            host,
            recent_orders_limit,
        })
    }
}
