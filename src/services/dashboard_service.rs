use crate::{
    dto::dashboard::DashboardSummary,
    error::AppResult,
    models::OrderStatus,
    services::{catalog_service, order_service},
    state::AppState,
};

/// Everything the dashboard page shows, read fresh from the gateway.
pub async fn summary(state: &AppState) -> AppResult<DashboardSummary> {
    let available_stock = catalog_service::total_available_stock(state).await?;
    let orders_in_production =
        order_service::count_by_status(state, OrderStatus::InProduction).await?;
    let low_stock_materials = catalog_service::low_stock_materials(state).await?.len();
    let total_revenue = order_service::total_revenue(state).await?;
    let recent_orders = order_service::recent_orders(state, state.recent_orders_limit).await?;

    tracing::debug!(
        available_stock,
        orders_in_production,
        low_stock_materials,
        "dashboard summary computed"
    );

    Ok(DashboardSummary {
        available_stock,
        orders_in_production,
        low_stock_materials,
        total_revenue,
        recent_orders,
    })
}
