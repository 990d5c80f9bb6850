use std::sync::Arc;

use atelier_inventory_api::{
    db::{MIGRATIONS_DIR, create_orm_conn, run_migrations},
    dto::{
        materials::MaterialDraft,
        orders::{OrderDraft, OrderLineDraft},
        products::ProductDraft,
    },
    error::AppError,
    gateway::{Gateway, GatewayError, SeaOrmGateway},
    models::{
        Availability, Order, OrderLine, OrderStatus, Product, ProductFields, ProductKind, now,
    },
    routes::{self, params::RecentOrdersQuery},
    services::{catalog_service, dashboard_service, order_service},
    state::AppState,
    validation::{ValidationError, validate_material_draft, validate_product_draft},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

fn dec(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}

async fn create_product(state: &AppState, name: &str, price: &str, stock: i32) -> anyhow::Result<Uuid> {
    let draft = ProductDraft {
        name: Some(name.into()),
        kind: Some("vela".into()),
        sale_price: Some(dec(price)),
        availability: Some("pronta_entrega".into()),
        current_stock: Some(stock),
        ..Default::default()
    };
    Ok(catalog_service::create_product(state, validate_product_draft(&draft)?)
        .await?
        .id)
}

fn line(product_id: Uuid, quantity: i32) -> OrderLineDraft {
    OrderLineDraft {
        product_id,
        quantity,
        unit_price: None,
    }
}

fn order_for(client: &str, lines: Vec<OrderLineDraft>) -> OrderDraft {
    OrderDraft {
        client_name: Some(client.into()),
        lines,
        ..Default::default()
    }
}

#[tokio::test]
async fn recorded_order_snapshots_prices_and_totals_lines() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let lavender = create_product(&state, "Vela Lavanda", "45.00", 10).await?;
    let cinnamon = create_product(&state, "Vela Canela", "59.90", 4).await?;

    let summary = order_service::record_order(
        &state,
        OrderDraft {
            client_name: Some("  Maria Souza ".into()),
            observations: Some("   ".into()),
            lines: vec![
                line(lavender, 2),
                OrderLineDraft {
                    product_id: cinnamon,
                    quantity: 1,
                    unit_price: Some(dec("50.00")),
                },
            ],
            ..Default::default()
        },
    )
    .await?;

    assert_eq!(summary.order.client_name.as_deref(), Some("Maria Souza"));
    assert_eq!(summary.order.observations, None);
    assert_eq!(summary.order.status, OrderStatus::InProduction);
    assert_eq!(summary.order.total_value, dec("140.00"));
    assert_eq!(summary.lines.len(), 2);
    assert_eq!(summary.lines[0].unit_price, dec("45.00"));
    assert_eq!(summary.lines[0].product_name.as_deref(), Some("Vela Lavanda"));

    // Later price changes do not touch recorded lines.
    let draft = ProductDraft {
        name: Some("Vela Lavanda".into()),
        kind: Some("vela".into()),
        sale_price: Some(dec("99.00")),
        current_stock: Some(10),
        ..Default::default()
    };
    catalog_service::update_product(&state, lavender, validate_product_draft(&draft)?).await?;

    let fetched = order_service::get_order(&state, summary.order.id).await?;
    assert_eq!(fetched.order, summary.order);
    let lavender_line = fetched
        .lines
        .iter()
        .find(|l| l.product_id == lavender)
        .expect("lavender line");
    assert_eq!(lavender_line.unit_price, dec("45.00"));
    Ok(())
}

#[tokio::test]
async fn explicit_total_is_kept() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_product(&state, "Vela", "45.00", 1).await?;

    let mut draft = order_for("Ana", vec![line(product, 2)]);
    draft.total_value = Some(dec("80.00"));
    let summary = order_service::record_order(&state, draft).await?;
    assert_eq!(summary.order.total_value, dec("80.00"));
    Ok(())
}

#[tokio::test]
async fn order_with_unknown_product_is_not_recorded() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_product(&state, "Vela", "45.00", 1).await?;

    let result = order_service::record_order(
        &state,
        order_for("Ana", vec![line(product, 1), line(Uuid::new_v4(), 1)]),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound("product"))));
    assert!(order_service::list_orders(&state, None, None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn non_positive_quantity_is_rejected() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_product(&state, "Vela", "45.00", 1).await?;

    let result = order_service::record_order(&state, order_for("Ana", vec![line(product, 0)])).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::InvalidValue {
            field: "quantity",
            ..
        }))
    ));
    Ok(())
}

#[tokio::test]
async fn oversized_line_totals_are_rejected_without_panicking() -> anyhow::Result<()> {
    let state = AppState::in_memory();

    // Sale price written straight through the gateway, past validation.
    let huge = state
        .gateway
        .insert_product(Product::new(
            Uuid::new_v4(),
            now(),
            ProductFields {
                name: "Vitral Catedral".into(),
                kind: ProductKind::StainedGlass,
                size: None,
                sale_price: Decimal::MAX,
                production_cost: None,
                production_minutes: None,
                description: None,
                availability: Availability::MadeToOrder,
                current_stock: 0,
                image_url: None,
            },
        ))
        .await?;
    let result = order_service::record_order(&state, order_for("Ana", vec![line(huge.id, 2)])).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::InvalidValue {
            field: "total_value",
            ..
        }))
    ));

    let product = create_product(&state, "Vela", "10.00", 1).await?;
    let max_price = order_for(
        "Ana",
        vec![OrderLineDraft {
            product_id: product,
            quantity: 2,
            unit_price: Some(Decimal::MAX),
        }],
    );
    let result = order_service::record_order(&state, max_price).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::InvalidValue {
            field: "unit_price",
            ..
        }))
    ));

    // Each line fits, the sum does not.
    let near_limit = order_for(
        "Ana",
        vec![OrderLineDraft {
            product_id: product,
            quantity: 2,
            unit_price: Some(dec("9999999999.99")),
        }],
    );
    let result = order_service::record_order(&state, near_limit).await;
    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::InvalidValue {
            field: "total_value",
            ..
        }))
    ));

    assert!(order_service::list_orders(&state, None, None).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn recent_orders_are_capped_and_newest_first() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_product(&state, "Vela", "10.00", 1).await?;
    for i in 0..7 {
        order_service::record_order(&state, order_for(&format!("Cliente {i}"), vec![line(product, 1)]))
            .await?;
    }

    let recent = order_service::recent_orders(&state, 5).await?;
    assert_eq!(recent.len(), 5);
    assert!(
        recent
            .windows(2)
            .all(|pair| pair[0].order.created_at >= pair[1].order.created_at)
    );
    assert!(recent.iter().all(|s| s.lines.len() == 1));

    assert!(order_service::recent_orders(&state, 0).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn status_moves_forward_only() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let id = order_service::record_order(&state, order_for("Ana", vec![])).await?.order.id;

    let ready = order_service::advance_status(&state, id, OrderStatus::Ready).await?;
    assert_eq!(ready.status, OrderStatus::Ready);

    let back = order_service::advance_status(&state, id, OrderStatus::InProduction).await;
    assert!(matches!(
        back,
        Err(AppError::InvalidStatusTransition {
            from: OrderStatus::Ready,
            to: OrderStatus::InProduction,
        })
    ));

    let same = order_service::advance_status(&state, id, OrderStatus::Ready).await;
    assert!(matches!(same, Err(AppError::InvalidStatusTransition { .. })));

    let delivered = order_service::advance_status(&state, id, OrderStatus::Delivered).await?;
    assert_eq!(delivered.status, OrderStatus::Delivered);

    let missing = order_service::advance_status(&state, Uuid::new_v4(), OrderStatus::Ready).await;
    assert!(matches!(missing, Err(AppError::NotFound("order"))));
    Ok(())
}

#[tokio::test]
async fn counts_and_revenue_track_orders() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_product(&state, "Vela", "30.00", 1).await?;

    let first = order_service::record_order(&state, order_for("A", vec![line(product, 1)])).await?;
    order_service::record_order(&state, order_for("B", vec![line(product, 2)])).await?;
    order_service::advance_status(&state, first.order.id, OrderStatus::Delivered).await?;

    assert_eq!(order_service::count_by_status(&state, OrderStatus::InProduction).await?, 1);
    assert_eq!(order_service::count_by_status(&state, OrderStatus::Delivered).await?, 1);
    assert_eq!(order_service::count_by_status(&state, OrderStatus::Ready).await?, 0);
    assert_eq!(order_service::total_revenue(&state).await?, dec("90.00"));

    order_service::delete_order(&state, first.order.id).await?;
    assert_eq!(order_service::total_revenue(&state).await?, dec("60.00"));
    let again = order_service::delete_order(&state, first.order.id).await;
    assert!(matches!(again, Err(AppError::NotFound("order"))));
    Ok(())
}

#[tokio::test]
async fn dashboard_summary_reflects_catalog_and_orders() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let lavender = create_product(&state, "Vela Lavanda", "45.00", 5).await?;
    create_product(&state, "Vela Canela", "59.90", 3).await?;
    let material = MaterialDraft {
        name: Some("Cera de soja".into()),
        unit: Some("g".into()),
        available_quantity: Some(dec("100")),
        minimum_threshold: Some(dec("2000")),
        ..Default::default()
    };
    catalog_service::create_material(&state, validate_material_draft(&material)?).await?;

    order_service::record_order(&state, order_for("Ana", vec![line(lavender, 2)])).await?;

    let summary = dashboard_service::summary(&state).await?;
    assert_eq!(summary.available_stock, 8);
    assert_eq!(summary.orders_in_production, 1);
    assert_eq!(summary.low_stock_materials, 1);
    assert_eq!(summary.total_revenue, dec("90.00"));
    assert_eq!(summary.recent_orders.len(), 1);
    Ok(())
}

#[tokio::test]
async fn order_handlers_wrap_results() -> anyhow::Result<()> {
    let state = AppState::in_memory();
    let product = create_product(&state, "Vela", "12.00", 1).await?;

    let (status, Json(created)) = routes::orders::record_order(
        State(state.clone()),
        Json(order_for("Ana", vec![line(product, 3)])),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    let summary = created.data.expect("order summary");
    assert_eq!(summary.order.total_value, dec("36.00"));

    let Json(recent) =
        routes::orders::recent_orders(State(state.clone()), Query(RecentOrdersQuery::default()))
            .await?;
    assert_eq!(recent.data.expect("recent").items.len(), 1);

    let Json(fetched) =
        routes::orders::get_order(State(state.clone()), Path(summary.order.id)).await?;
    assert_eq!(fetched.data.expect("order").lines.len(), 1);

    let Json(dashboard) = routes::dashboard::dashboard_summary(State(state.clone())).await?;
    assert_eq!(dashboard.data.expect("dashboard").orders_in_production, 1);
    Ok(())
}

// Same flow against Postgres through the sea-orm gateway.
#[tokio::test]
async fn postgres_order_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let lavender = create_product(&state, "Vela Lavanda", "45.00", 5).await?;
    let copy = catalog_service::duplicate_product(&state, lavender).await?;
    assert_eq!(copy.name, "Vela Lavanda (Cópia)");
    assert_eq!(catalog_service::total_available_stock(&state).await?, 5);

    let summary = order_service::record_order(
        &state,
        order_for("Maria", vec![line(lavender, 2), line(copy.id, 1)]),
    )
    .await?;
    assert_eq!(summary.order.total_value, dec("135.00"));

    let fetched = order_service::get_order(&state, summary.order.id).await?;
    assert_eq!(fetched.order, summary.order);
    assert_eq!(fetched.lines.len(), 2);

    let failed = order_service::record_order(
        &state,
        order_for("Maria", vec![line(lavender, 1), line(Uuid::new_v4(), 1)]),
    )
    .await;
    assert!(failed.is_err());
    assert_eq!(order_service::list_orders(&state, None, None).await?.len(), 1);

    order_service::advance_status(&state, summary.order.id, OrderStatus::Ready).await?;
    assert_eq!(order_service::count_by_status(&state, OrderStatus::Ready).await?, 1);
    assert_eq!(order_service::total_revenue(&state).await?, dec("135.00"));

    let blocked = catalog_service::delete_product(&state, lavender).await;
    assert!(blocked.is_err());

    order_service::delete_order(&state, summary.order.id).await?;
    catalog_service::delete_product(&state, lavender).await?;

    // Every product field survives the trip through Postgres.
    let window = ProductDraft {
        name: Some("Vitral Mandala".into()),
        kind: Some("vitral".into()),
        size: Some("30x30cm".into()),
        sale_price: Some(dec("380.00")),
        production_cost: Some(dec("150.50")),
        production_minutes: Some(600),
        description: Some("Vidro catedral e chumbo".into()),
        availability: Some("sob_encomenda".into()),
        current_stock: Some(1),
        image_url: Some("https://example.com/mandala.jpg".into()),
    };
    let created = catalog_service::create_product(&state, validate_product_draft(&window)?).await?;
    let read_back = catalog_service::get_product(&state, created.id).await?;
    assert_eq!(read_back, created);

    // Low stock compares two columns of the same row.
    let short = MaterialDraft {
        name: Some("Chumbo".into()),
        unit: Some("m".into()),
        available_quantity: Some(dec("2")),
        minimum_threshold: Some(dec("5")),
        ..Default::default()
    };
    let stocked = MaterialDraft {
        name: Some("Vidro catedral".into()),
        unit: Some("m".into()),
        available_quantity: Some(dec("10")),
        minimum_threshold: Some(dec("3")),
        ..Default::default()
    };
    let short = catalog_service::create_material(&state, validate_material_draft(&short)?).await?;
    catalog_service::create_material(&state, validate_material_draft(&stocked)?).await?;
    let low: Vec<Uuid> = catalog_service::low_stock_materials(&state)
        .await?
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(low, vec![short.id]);

    // A failing line rolls back the order row written in the same transaction.
    let order = empty_order_at(now());
    let lines = vec![
        OrderLine {
            id: Uuid::new_v4(),
            order_id: order.id,
            product_id: created.id,
            quantity: 1,
            unit_price: created.sale_price,
        },
        OrderLine {
            id: Uuid::new_v4(),
            order_id: order.id,
            product_id: Uuid::new_v4(),
            quantity: 1,
            unit_price: dec("1.00"),
        },
    ];
    let err = state.gateway.insert_order(order.clone(), lines).await;
    assert!(matches!(err, Err(GatewayError::ConstraintViolation(_))));
    assert!(state.gateway.get_order(order.id).await?.is_none());
    assert!(
        state
            .gateway
            .order_lines_with_products(&[order.id])
            .await?
            .is_empty()
    );

    // Newest first, equal timestamps ordered by id.
    let base = now();
    let older = empty_order_at(base - chrono::Duration::minutes(5));
    let tied_a = empty_order_at(base);
    let tied_b = empty_order_at(base);
    for order in [older.clone(), tied_a.clone(), tied_b.clone()] {
        state.gateway.insert_order(order, Vec::new()).await?;
    }
    let (first, second) = if tied_a.id < tied_b.id {
        (tied_a.id, tied_b.id)
    } else {
        (tied_b.id, tied_a.id)
    };
    let recent: Vec<Uuid> = order_service::recent_orders(&state, 5)
        .await?
        .iter()
        .map(|s| s.order.id)
        .collect();
    assert_eq!(recent, vec![first, second, older.id]);
    Ok(())
}

fn empty_order_at(created_at: chrono::DateTime<chrono::Utc>) -> Order {
    Order {
        id: Uuid::new_v4(),
        client_name: None,
        order_date: created_at,
        status: OrderStatus::InProduction,
        observations: None,
        total_value: Decimal::ZERO,
        created_at,
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm, MIGRATIONS_DIR).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_lines, orders, product_materials, materials, products CASCADE",
    ))
    .await?;

    Ok(AppState::new(Arc::new(SeaOrmGateway::new(orm)), 5))
}
