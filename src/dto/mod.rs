pub mod dashboard;
pub mod materials;
pub mod orders;
pub mod products;
