//! Repository implementations

mod catalog;
mod cuenta_contable;
mod orden_compra;

pub use catalog::CatalogRepo;
pub use cuenta_contable::CuentaContableRepo;
pub use orden_compra::OrdenCompraRepo;
