use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        dashboard::DashboardSummary,
        materials::{
            AddCompositionRequest, CompositionList, MaterialDraft, MaterialList,
            QuantityAdjustRequest,
        },
        orders::{
            OrderDraft, OrderLineDraft, OrderList, OrderSummary, OrderSummaryList,
            UpdateOrderStatusRequest,
        },
        products::{ProductDraft, ProductList, StockAdjustRequest},
    },
    models::{
        Availability, Material, MaterialUnit, Order, OrderStatus, Product, ProductKind,
        ProductMaterial, ResolvedOrderLine,
    },
    response::{ApiResponse, Meta},
    routes::{dashboard, health, materials, orders, params, products},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::duplicate_product,
        products::delete_product,
        products::adjust_stock,
        products::list_product_materials,
        products::add_product_material,
        products::remove_product_material,
        materials::list_materials,
        materials::list_low_stock,
        materials::get_material,
        materials::create_material,
        materials::update_material,
        materials::delete_material,
        materials::adjust_quantity,
        orders::list_orders,
        orders::recent_orders,
        orders::record_order,
        orders::get_order,
        orders::update_order_status,
        orders::delete_order,
        dashboard::dashboard_summary
    ),
    components(
        schemas(
            Product,
            ProductKind,
            Availability,
            Material,
            MaterialUnit,
            ProductMaterial,
            Order,
            OrderStatus,
            ResolvedOrderLine,
            ProductDraft,
            ProductList,
            StockAdjustRequest,
            MaterialDraft,
            MaterialList,
            QuantityAdjustRequest,
            AddCompositionRequest,
            CompositionList,
            OrderDraft,
            OrderLineDraft,
            OrderList,
            OrderSummary,
            OrderSummaryList,
            UpdateOrderStatusRequest,
            DashboardSummary,
            params::ProductListQuery,
            params::OrderListQuery,
            params::RecentOrdersQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Material>,
            ApiResponse<MaterialList>,
            ApiResponse<OrderSummary>,
            ApiResponse<OrderList>,
            ApiResponse<DashboardSummary>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Materials", description = "Material stock endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Dashboard", description = "Overview metrics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
