use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        materials::{AddCompositionRequest, CompositionList},
        products::{ProductDraft, ProductList, StockAdjustRequest},
    },
    error::AppResult,
    models::{Product, ProductMaterial},
    response::{ApiResponse, Meta},
    routes::params::ProductListQuery,
    services::catalog_service::{self, ProductFilter},
    state::AppState,
    validation::validate_product_draft,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/duplicate", post(duplicate_product))
        .route("/{id}/stock", patch(adjust_stock))
        .route(
            "/{id}/materials",
            get(list_product_materials).post(add_product_material),
        )
        .route("/{id}/materials/{line_id}", delete(remove_product_material))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "List products, newest first", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let filter = ProductFilter {
        kind: query.kind,
        availability: query.availability,
    };
    let items = catalog_service::list_products(&state, filter).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = catalog_service::get_product(&state, id).await?;
    Ok(Json(ApiResponse::success("Product", product, None)))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductDraft,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 422, description = "Missing field, invalid value or price not above cost"),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let validated = validate_product_draft(&draft)?;
    let product = catalog_service::create_product(&state, validated).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Product created",
            product,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = ProductDraft,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Missing field, invalid value or price not above cost"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ProductDraft>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let validated = validate_product_draft(&draft)?;
    let product = catalog_service::update_product(&state, id, validated).await?;
    Ok(Json(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/duplicate",
    params(
        ("id" = Uuid, Path, description = "Product to copy")
    ),
    responses(
        (status = 201, description = "Copy created with zero stock", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn duplicate_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let product = catalog_service::duplicate_product(&state, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Product duplicated",
            product,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is referenced by orders"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    catalog_service::delete_product(&state, id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/stock",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<Product>),
        (status = 400, description = "Zero delta or negative result"),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = catalog_service::adjust_product_stock(&state, id, payload.delta).await?;
    Ok(Json(ApiResponse::success(
        "Stock updated",
        product,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/materials",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Materials used by the product", body = ApiResponse<CompositionList>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn list_product_materials(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CompositionList>>> {
    let items = catalog_service::list_product_materials(&state, id).await?;
    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(
        "Product materials",
        CompositionList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    post,
    path = "/api/products/{id}/materials",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = AddCompositionRequest,
    responses(
        (status = 201, description = "Material added to the product", body = ApiResponse<ProductMaterial>),
        (status = 404, description = "Product or material not found"),
        (status = 422, description = "Consumed quantity not positive"),
    ),
    tag = "Products"
)]
pub async fn add_product_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddCompositionRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductMaterial>>)> {
    let line = catalog_service::add_product_material(
        &state,
        id,
        payload.material_id,
        payload.consumed_quantity,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Material added",
            line,
            Some(Meta::empty()),
        )),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}/materials/{line_id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("line_id" = Uuid, Path, description = "Composition line ID")
    ),
    responses(
        (status = 200, description = "Material removed from the product"),
        (status = 404, description = "Line not found"),
    ),
    tag = "Products"
)]
pub async fn remove_product_material(
    State(state): State<AppState>,
    Path((id, line_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    catalog_service::remove_product_material(&state, id, line_id).await?;
    Ok(Json(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
