pub mod materials;
pub mod order_lines;
pub mod orders;
pub mod product_materials;
pub mod products;

pub use materials::Entity as Materials;
pub use order_lines::Entity as OrderLines;
pub use orders::Entity as Orders;
pub use product_materials::Entity as ProductMaterials;
pub use products::Entity as Products;
