use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::DashboardSummary,
    error::AppResult,
    response::{ApiResponse, Meta},
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard_summary))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Stock, order and material overview", body = ApiResponse<DashboardSummary>)
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_summary(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    let summary = dashboard_service::summary(&state).await?;
    Ok(Json(ApiResponse::success(
        "Dashboard",
        summary,
        Some(Meta::empty()),
    )))
}
