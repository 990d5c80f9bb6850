use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderDraft, OrderList, OrderSummary, OrderSummaryList, UpdateOrderStatusRequest},
    error::AppResult,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, RecentOrdersQuery},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(record_order))
        .route("/recent", get(recent_orders))
        .route("/{id}", get(get_order).delete(delete_order))
        .route("/{id}/status", patch(update_order_status))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "List orders, newest first", body = ApiResponse<OrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let items = order_service::list_orders(&state, query.status, query.limit).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders/recent",
    params(RecentOrdersQuery),
    responses(
        (status = 200, description = "Most recent orders with their lines", body = ApiResponse<OrderSummaryList>)
    ),
    tag = "Orders"
)]
pub async fn recent_orders(
    State(state): State<AppState>,
    Query(query): Query<RecentOrdersQuery>,
) -> AppResult<Json<ApiResponse<OrderSummaryList>>> {
    let limit = query.limit.unwrap_or(state.recent_orders_limit);
    let items = order_service::recent_orders(&state, limit).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Recent orders",
        OrderSummaryList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = OrderDraft,
    responses(
        (status = 201, description = "Order recorded with its lines", body = ApiResponse<OrderSummary>),
        (status = 404, description = "A line refers to an unknown product"),
        (status = 422, description = "Invalid quantity or price"),
    ),
    tag = "Orders"
)]
pub async fn record_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderSummary>>)> {
    let summary = order_service::record_order(&state, draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Order recorded",
            summary,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<OrderSummary>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let summary = order_service::get_order(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Order found",
        summary,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status moved forward", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Status would move backwards or stay the same"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = order_service::advance_status(&state, id, payload.status).await?;
    Ok(Json(ApiResponse::success(
        "Order updated",
        order,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Deleted order and its lines"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    order_service::delete_order(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
