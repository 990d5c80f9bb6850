use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::materials::{MaterialDraft, MaterialList, QuantityAdjustRequest},
    error::AppResult,
    models::Material,
    response::{ApiResponse, Meta},
    services::catalog_service,
    state::AppState,
    validation::validate_material_draft,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route("/low-stock", get(list_low_stock))
        .route(
            "/{id}",
            get(get_material).put(update_material).delete(delete_material),
        )
        .route("/{id}/quantity", patch(adjust_quantity))
}

#[utoipa::path(
    get,
    path = "/api/materials",
    responses(
        (status = 200, description = "List materials, newest first", body = ApiResponse<MaterialList>)
    ),
    tag = "Materials"
)]
pub async fn list_materials(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MaterialList>>> {
    let items = catalog_service::list_materials(&state).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Materials",
        MaterialList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/materials/low-stock",
    responses(
        (status = 200, description = "Materials below their minimum threshold", body = ApiResponse<MaterialList>)
    ),
    tag = "Materials"
)]
pub async fn list_low_stock(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MaterialList>>> {
    let items = catalog_service::low_stock_materials(&state).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Low stock",
        MaterialList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "Get material", body = ApiResponse<Material>),
        (status = 404, description = "Material not found"),
    ),
    tag = "Materials"
)]
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let material = catalog_service::get_material(&state, id).await?;
    Ok(Json(ApiResponse::success("Material", material, None)))
}

#[utoipa::path(
    post,
    path = "/api/materials",
    request_body = MaterialDraft,
    responses(
        (status = 201, description = "Create material", body = ApiResponse<Material>),
        (status = 422, description = "Missing field or invalid value"),
    ),
    tag = "Materials"
)]
pub async fn create_material(
    State(state): State<AppState>,
    Json(draft): Json<MaterialDraft>,
) -> AppResult<(StatusCode, Json<ApiResponse<Material>>)> {
    let validated = validate_material_draft(&draft)?;
    let material = catalog_service::create_material(&state, validated).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Material created",
            material,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    request_body = MaterialDraft,
    responses(
        (status = 200, description = "Updated material", body = ApiResponse<Material>),
        (status = 404, description = "Material not found"),
        (status = 422, description = "Missing field or invalid value"),
    ),
    tag = "Materials"
)]
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<MaterialDraft>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let validated = validate_material_draft(&draft)?;
    let material = catalog_service::update_material(&state, id, validated).await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        material,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "Deleted material"),
        (status = 404, description = "Material not found"),
    ),
    tag = "Materials"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    catalog_service::delete_material(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/materials/{id}/quantity",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    request_body = QuantityAdjustRequest,
    responses(
        (status = 200, description = "Quantity adjusted", body = ApiResponse<Material>),
        (status = 400, description = "Zero delta or negative result"),
        (status = 404, description = "Material not found"),
    ),
    tag = "Materials"
)]
pub async fn adjust_quantity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuantityAdjustRequest>,
) -> AppResult<Json<ApiResponse<Material>>> {
    let material = catalog_service::adjust_material_quantity(&state, id, payload.delta).await?;
    Ok(Json(ApiResponse::success(
        "Quantity updated",
        material,
        Some(Meta::empty()),
    )))
}
