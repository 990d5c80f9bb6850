use atelier_inventory_api::{
    dto::{
        materials::{AddCompositionRequest, MaterialDraft},
        orders::{OrderDraft, OrderLineDraft},
        products::{ProductDraft, StockAdjustRequest},
    },
    error::AppError,
    gateway::{Gateway, GatewayError},
    models::{Availability, Material, MaterialFields, MaterialUnit, ProductKind, now},
    routes::{self, params::ProductListQuery},
    services::{
        catalog_service::{self, ProductFilter},
        order_service,
    },
    state::AppState,
    validation::{ValidationError, validate_material_draft, validate_product_draft},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn dec(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}

fn candle_draft(name: &str, stock: i32) -> ProductDraft {
    ProductDraft {
        name: Some(name.into()),
        kind: Some("vela".into()),
        size: Some("200g".into()),
        sale_price: Some(dec("45.00")),
        production_cost: Some(dec("18.50")),
        description: Some("Cera de soja com lavanda".into()),
        availability: Some("pronta_entrega".into()),
        current_stock: Some(stock),
        ..Default::default()
    }
}

fn material_draft(name: &str, available: &str, minimum: &str) -> MaterialDraft {
    MaterialDraft {
        name: Some(name.into()),
        unit: Some("g".into()),
        unit_cost: Some(dec("0.06")),
        available_quantity: Some(dec(available)),
        minimum_threshold: Some(dec(minimum)),
    }
}

async fn create_candle(state: &AppState, name: &str, stock: i32) -> anyhow::Result<Uuid> {
    let validated = validate_product_draft(&candle_draft(name, stock))?;
    Ok(catalog_service::create_product(state, validated).await?.id)
}

#[tokio::test]
async fn created_product_reads_back_unchanged() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let validated = validate_product_draft(&candle_draft("Vela Lavanda", 10))?;
    let created = catalog_service::create_product(&state, validated).await?;

    let fetched = catalog_service::get_product(&state, created.id).await?;
    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Vela Lavanda");
    assert_eq!(fetched.kind, ProductKind::Candle);
    assert_eq!(fetched.availability, Availability::ReadyStock);
    assert_eq!(fetched.sale_price, dec("45.00"));
    assert_eq!(fetched.current_stock, 10);
    Ok(())
}

#[tokio::test]
async fn duplicate_appends_suffix_and_resets_stock() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let source = create_candle(&state, "Vela Lavanda", 12).await?;

    let copy = catalog_service::duplicate_product(&state, source).await?;
    assert_ne!(copy.id, source);
    assert_eq!(copy.name, "Vela Lavanda (Cópia)");
    assert_eq!(copy.current_stock, 0);
    assert_eq!(copy.sale_price, dec("45.00"));

    // The original is untouched.
    let original = catalog_service::get_product(&state, source).await?;
    assert_eq!(original.current_stock, 12);
    Ok(())
}

#[tokio::test]
async fn duplicate_of_unknown_product_is_not_found() {
    let state = AppState::in_memory();
    let result = catalog_service::duplicate_product(&state, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound("product"))));
}

#[tokio::test]
async fn total_available_stock_sums_positive_stock() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    for (name, stock) in [("Vela A", 5), ("Vela B", 0), ("Vela C", 3)] {
        create_candle(&state, name, stock).await?;
    }

    assert_eq!(catalog_service::total_available_stock(&state).await?, 8);
    Ok(())
}

#[tokio::test]
async fn total_available_stock_of_empty_catalog_is_zero() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    assert_eq!(catalog_service::total_available_stock(&state).await?, 0);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_of_missing_product_are_not_found() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let validated = validate_product_draft(&candle_draft("Vela", 1))?;

    let updated = catalog_service::update_product(&state, Uuid::new_v4(), validated).await;
    assert!(matches!(updated, Err(AppError::NotFound("product"))));

    let deleted = catalog_service::delete_product(&state, Uuid::new_v4()).await;
    assert!(matches!(deleted, Err(AppError::NotFound("product"))));
    Ok(())
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_identity() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let id = create_candle(&state, "Vela Canela", 4).await?;
    let before = catalog_service::get_product(&state, id).await?;

    let mut draft = candle_draft("Vela Canela Grande", 6);
    draft.sale_price = Some(dec("59.90"));
    let after = catalog_service::update_product(&state, id, validate_product_draft(&draft)?).await?;

    assert_eq!(after.id, id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.name, "Vela Canela Grande");
    assert_eq!(after.sale_price, dec("59.90"));
    assert_eq!(after.current_stock, 6);
    Ok(())
}

#[tokio::test]
async fn list_products_filters_by_kind_and_availability() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    create_candle(&state, "Vela Lavanda", 3).await?;
    let window = ProductDraft {
        name: Some("Vitral Mandala".into()),
        kind: Some("vitral".into()),
        sale_price: Some(dec("380.00")),
        ..Default::default()
    };
    catalog_service::create_product(&state, validate_product_draft(&window)?).await?;

    let all = catalog_service::list_products(&state, ProductFilter::default()).await?;
    assert_eq!(all.len(), 2);

    let windows = catalog_service::list_products(
        &state,
        ProductFilter {
            kind: Some(ProductKind::StainedGlass),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].availability, Availability::MadeToOrder);

    let ready = catalog_service::list_products(
        &state,
        ProductFilter {
            availability: Some(Availability::ReadyStock),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].name, "Vela Lavanda");
    Ok(())
}

#[tokio::test]
async fn stock_adjustment_rejects_zero_and_negative_results() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let id = create_candle(&state, "Vela", 2).await?;

    let product = catalog_service::adjust_product_stock(&state, id, 3).await?;
    assert_eq!(product.current_stock, 5);

    let zero = catalog_service::adjust_product_stock(&state, id, 0).await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));

    let negative = catalog_service::adjust_product_stock(&state, id, -6).await;
    assert!(matches!(negative, Err(AppError::BadRequest(_))));

    let product = catalog_service::get_product(&state, id).await?;
    assert_eq!(product.current_stock, 5);
    Ok(())
}

#[tokio::test]
async fn low_stock_lists_only_materials_under_threshold() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let wax = catalog_service::create_material(
        &state,
        validate_material_draft(&material_draft("Cera de soja", "1500", "2000"))?,
    )
    .await?;
    catalog_service::create_material(
        &state,
        validate_material_draft(&material_draft("Parafina", "2000", "2000"))?,
    )
    .await?;

    let low = catalog_service::low_stock_materials(&state).await?;
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].id, wax.id);
    assert_eq!(low[0].unit, MaterialUnit::Gram);

    // Restocking clears the warning.
    catalog_service::adjust_material_quantity(&state, wax.id, dec("600")).await?;
    assert!(catalog_service::low_stock_materials(&state).await?.is_empty());

    let overdraw = catalog_service::adjust_material_quantity(&state, wax.id, dec("-5000")).await;
    assert!(matches!(overdraw, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn material_adjustment_out_of_range_is_rejected() -> anyhow::Result<()> {
    let state = AppState::in_memory();

    // Stored directly so the quantity sits at the edge of `Decimal`.
    let full = state
        .gateway
        .insert_material(Material::new(
            Uuid::new_v4(),
            now(),
            MaterialFields {
                name: "Cera de soja".into(),
                unit: MaterialUnit::Gram,
                unit_cost: None,
                available_quantity: Decimal::MAX,
                minimum_threshold: Decimal::ZERO,
            },
        ))
        .await?;
    let result = catalog_service::adjust_material_quantity(&state, full.id, Decimal::ONE).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let wax = catalog_service::create_material(
        &state,
        validate_material_draft(&material_draft("Parafina", "999999999", "10"))?,
    )
    .await?;
    let result = catalog_service::adjust_material_quantity(&state, wax.id, dec("1")).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::InvalidValue {
            field: "available_quantity",
            ..
        }))
    ));
    assert_eq!(
        catalog_service::get_material(&state, wax.id).await?.available_quantity,
        dec("999999999")
    );
    Ok(())
}

#[tokio::test]
async fn composition_lines_follow_their_product() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_candle(&state, "Vela Lavanda", 1).await?;
    let wax = catalog_service::create_material(
        &state,
        validate_material_draft(&material_draft("Cera de soja", "5000", "2000"))?,
    )
    .await?;

    let line = catalog_service::add_product_material(&state, product, wax.id, dec("180")).await?;
    let lines = catalog_service::list_product_materials(&state, product).await?;
    assert_eq!(lines, vec![line.clone()]);

    let invalid = catalog_service::add_product_material(&state, product, wax.id, Decimal::ZERO).await;
    assert!(matches!(
        invalid,
        Err(AppError::Validation(ValidationError::InvalidValue {
            field: "consumed_quantity",
            ..
        }))
    ));

    let unknown = catalog_service::add_product_material(&state, product, Uuid::new_v4(), dec("1")).await;
    assert!(matches!(unknown, Err(AppError::NotFound("material"))));

    catalog_service::remove_product_material(&state, product, line.id).await?;
    assert!(catalog_service::list_product_materials(&state, product).await?.is_empty());

    let again = catalog_service::remove_product_material(&state, product, line.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn deleting_material_in_use_drops_its_lines() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_candle(&state, "Vela", 1).await?;
    let wick = catalog_service::create_material(
        &state,
        validate_material_draft(&material_draft("Pavio", "100", "10"))?,
    )
    .await?;
    catalog_service::add_product_material(&state, product, wick.id, dec("1")).await?;

    catalog_service::delete_material(&state, wick.id).await?;
    assert!(catalog_service::list_product_materials(&state, product).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn product_handlers_return_created_and_wrapped_payloads() -> anyhow::Result<()> {
    let state = AppState::in_memory();

    let (status, Json(created)) = routes::products::create_product(
        State(state.clone()),
        Json(candle_draft("Vela Lavanda", 5)),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let product = created.data.expect("created product");

    let (status, Json(copied)) =
        routes::products::duplicate_product(State(state.clone()), Path(product.id)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copied.data.expect("copy").current_stock, 0);

    let Json(listing) = routes::products::list_products(
        State(state.clone()),
        Query(ProductListQuery::default()),
    )
    .await?;
    assert_eq!(listing.meta.and_then(|m| m.total), Some(2));

    let Json(adjusted) = routes::products::adjust_stock(
        State(state.clone()),
        Path(product.id),
        Json(StockAdjustRequest { delta: -2 }),
    )
    .await?;
    assert_eq!(adjusted.data.expect("adjusted").current_stock, 3);

    let (_, Json(created)) = routes::materials::create_material(
        State(state.clone()),
        Json(material_draft("Cera", "10", "1")),
    )
    .await?;
    let wax = created.data.expect("material");
    let (status, _) = routes::products::add_product_material(
        State(state.clone()),
        Path(product.id),
        Json(AddCompositionRequest {
            material_id: wax.id,
            consumed_quantity: dec("0.5"),
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn invalid_product_draft_is_rejected_before_storage() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let mut draft = candle_draft("Vela", 1);
    draft.sale_price = Some(dec("18.50"));

    let result = routes::products::create_product(State(state.clone()), Json(draft)).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::PriceBelowCost { .. }))
    ));

    let all = catalog_service::list_products(&state, ProductFilter::default()).await?;
    assert!(all.is_empty());
    Ok(())
}

#[tokio::test]
async fn product_with_orders_cannot_be_deleted() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let id = create_candle(&state, "Vela", 3).await?;
    order_service::record_order(
        &state,
        OrderDraft {
            lines: vec![OrderLineDraft {
                product_id: id,
                quantity: 1,
                unit_price: None,
            }],
            ..Default::default()
        },
    )
    .await?;

    let result = catalog_service::delete_product(&state, id).await;
    assert!(matches!(
        result,
        Err(AppError::Gateway(GatewayError::ConstraintViolation(_)))
    ));
    Ok(())
}
