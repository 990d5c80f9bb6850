use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    dto::orders::{OrderDraft, OrderSummary},
    error::{AppError, AppResult},
    gateway::OrderQuery,
    models::{Order, OrderLine, OrderStatus, ResolvedOrderLine, now},
    services::catalog_service,
    state::AppState,
    validation::{ValidationError, check_money, validate_order_draft},
};

/// Records an order with its lines.
///
/// Lines without a unit price take the product's current sale price, and a
/// draft without a total gets the sum of its lines. Order and lines are
/// written in one gateway call, so a failure leaves neither behind.
pub async fn record_order(state: &AppState, draft: OrderDraft) -> AppResult<OrderSummary> {
    validate_order_draft(&draft)?;

    let order_id = Uuid::new_v4();
    let created_at = now();

    let mut lines = Vec::with_capacity(draft.lines.len());
    let mut resolved = Vec::with_capacity(draft.lines.len());
    for line in &draft.lines {
        let product = catalog_service::get_product(state, line.product_id).await?;
        let unit_price = line.unit_price.unwrap_or(product.sale_price);
        let line_id = Uuid::new_v4();

        lines.push(OrderLine {
            id: line_id,
            order_id,
            product_id: product.id,
            quantity: line.quantity,
            unit_price,
        });
        resolved.push(ResolvedOrderLine {
            id: line_id,
            order_id,
            product_id: product.id,
            product_name: Some(product.name),
            quantity: line.quantity,
            unit_price,
        });
    }

    let total_value = match draft.total_value {
        Some(total) => total,
        None => lines_total(&lines)?,
    };

    let order = Order {
        id: order_id,
        client_name: non_blank(draft.client_name),
        order_date: draft.order_date.unwrap_or(created_at),
        status: draft.status.unwrap_or_default(),
        observations: non_blank(draft.observations),
        total_value,
        created_at,
    };

    let order = state.gateway.insert_order(order, lines).await?;
    tracing::info!(
        order_id = %order.id,
        lines = resolved.len(),
        total = %order.total_value,
        "order recorded"
    );

    Ok(OrderSummary {
        order,
        lines: resolved,
    })
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<OrderSummary> {
    let order = state
        .gateway
        .get_order(id)
        .await?
        .ok_or(AppError::NotFound("order"))?;
    let lines = state.gateway.order_lines_with_products(&[order.id]).await?;
    Ok(OrderSummary { order, lines })
}

pub async fn list_orders(
    state: &AppState,
    status: Option<OrderStatus>,
    limit: Option<u64>,
) -> AppResult<Vec<Order>> {
    Ok(state
        .gateway
        .query_orders(OrderQuery { status, limit })
        .await?)
}

pub async fn count_by_status(state: &AppState, status: OrderStatus) -> AppResult<u64> {
    Ok(state.gateway.count_orders(Some(status)).await?)
}

/// The `limit` most recent orders, newest first, each with its lines.
pub async fn recent_orders(state: &AppState, limit: u64) -> AppResult<Vec<OrderSummary>> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let orders = state
        .gateway
        .query_orders(OrderQuery {
            status: None,
            limit: Some(limit),
        })
        .await?;
    attach_lines(state, orders).await
}

/// Moves an order forward in its lifecycle. Going back, or "moving" to the
/// status it already has, is rejected.
pub async fn advance_status(state: &AppState, id: Uuid, next: OrderStatus) -> AppResult<Order> {
    let current = state
        .gateway
        .get_order(id)
        .await?
        .ok_or(AppError::NotFound("order"))?;

    if !current.status.can_advance_to(next) {
        return Err(AppError::InvalidStatusTransition {
            from: current.status,
            to: next,
        });
    }

    let order = state
        .gateway
        .update_order_status(id, next)
        .await?
        .ok_or(AppError::NotFound("order"))?;
    tracing::info!(order_id = %id, from = %current.status, to = %next, "order status changed");
    Ok(order)
}

pub async fn delete_order(state: &AppState, id: Uuid) -> AppResult<()> {
    if !state.gateway.delete_order(id).await? {
        return Err(AppError::NotFound("order"));
    }
    tracing::info!(order_id = %id, "order deleted");
    Ok(())
}

/// Sum of `total_value` over all orders.
pub async fn total_revenue(state: &AppState) -> AppResult<Decimal> {
    Ok(state.gateway.sum_order_totals().await?)
}

async fn attach_lines(state: &AppState, orders: Vec<Order>) -> AppResult<Vec<OrderSummary>> {
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut by_order: HashMap<Uuid, Vec<ResolvedOrderLine>> = HashMap::new();
    for line in state.gateway.order_lines_with_products(&ids).await? {
        by_order.entry(line.order_id).or_default().push(line);
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderSummary {
            lines: by_order.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect())
}

/// Sum of `quantity * unit_price`, rejected when it does not fit a money column.
fn lines_total(lines: &[OrderLine]) -> Result<Decimal, ValidationError> {
    let total = lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| {
            line.unit_price
                .checked_mul(Decimal::from(line.quantity))
                .and_then(|subtotal| acc.checked_add(subtotal))
        })
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "total_value",
            reason: "sum of order lines overflows".into(),
        })?;
    check_money(total, "total_value")?;
    Ok(total)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
