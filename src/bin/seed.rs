use std::sync::Arc;

use atelier_inventory_api::{
    config::AppConfig,
    db::{MIGRATIONS_DIR, create_orm_conn, run_migrations},
    dto::{
        materials::MaterialDraft,
        orders::{OrderDraft, OrderLineDraft},
        products::ProductDraft,
    },
    gateway::SeaOrmGateway,
    services::{catalog_service, order_service},
    state::AppState,
    validation::{validate_material_draft, validate_product_draft},
};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm, MIGRATIONS_DIR).await?;
    let state = AppState::new(
        Arc::new(SeaOrmGateway::new(orm)),
        config.recent_orders_limit,
    );

    let materials = seed_materials(&state).await?;
    let products = seed_products(&state).await?;

    let wax = materials[0].id;
    catalog_service::add_product_material(&state, products[0].id, wax, dec("180")?).await?;
    catalog_service::add_product_material(&state, products[1].id, wax, dec("250")?).await?;

    let order = order_service::record_order(
        &state,
        OrderDraft {
            client_name: Some("Maria Souza".into()),
            observations: Some("Embalar para presente".into()),
            lines: vec![
                OrderLineDraft {
                    product_id: products[0].id,
                    quantity: 2,
                    unit_price: None,
                },
                OrderLineDraft {
                    product_id: products[2].id,
                    quantity: 1,
                    unit_price: None,
                },
            ],
            ..Default::default()
        },
    )
    .await?;

    println!(
        "Seed completed. {} materials, {} products, order {}",
        materials.len(),
        products.len(),
        order.order.id
    );
    Ok(())
}

fn dec(value: &str) -> anyhow::Result<Decimal> {
    Ok(value.parse()?)
}

async fn seed_materials(
    state: &AppState,
) -> anyhow::Result<Vec<atelier_inventory_api::models::Material>> {
    let materials = vec![
        ("Cera de soja", "g", "0.06", "5000", "2000"),
        ("Essência de lavanda", "ml", "0.90", "80", "100"),
        ("Pavio de algodão", "un", "0.35", "300", "50"),
        ("Vidro catedral", "m", "95.00", "4", "2"),
    ];

    let mut created = Vec::new();
    for (name, unit, cost, available, minimum) in materials {
        let draft = MaterialDraft {
            name: Some(name.into()),
            unit: Some(unit.into()),
            unit_cost: Some(dec(cost)?),
            available_quantity: Some(dec(available)?),
            minimum_threshold: Some(dec(minimum)?),
        };
        let validated = validate_material_draft(&draft)?;
        created.push(catalog_service::create_material(state, validated).await?);
    }

    println!("Seeded materials");
    Ok(created)
}

async fn seed_products(
    state: &AppState,
) -> anyhow::Result<Vec<atelier_inventory_api::models::Product>> {
    let products = vec![
        ("Vela Lavanda", "vela", "200g", "45.00", "18.50", 10, "pronta_entrega"),
        ("Vela Canela", "vela", "300g", "59.90", "24.00", 4, "pronta_entrega"),
        ("Vitral Mandala", "vitral", "30x30cm", "380.00", "150.00", 0, "sob_encomenda"),
    ];

    let mut created = Vec::new();
    for (name, kind, size, price, cost, stock, availability) in products {
        let draft = ProductDraft {
            name: Some(name.into()),
            kind: Some(kind.into()),
            size: Some(size.into()),
            sale_price: Some(dec(price)?),
            production_cost: Some(dec(cost)?),
            availability: Some(availability.into()),
            current_stock: Some(stock),
            ..Default::default()
        };
        let validated = validate_product_draft(&draft)?;
        created.push(catalog_service::create_product(state, validated).await?);
    }

    println!("Seeded products");
    Ok(created)
}
