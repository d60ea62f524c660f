//! Build composition: validation, pricing, ownership and persistence of
//! user builds made of catalog components.

pub mod access;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod model;
pub mod selection;
pub mod store;

#[cfg(test)]
mod memory;

pub use access::Page;
pub use catalog::{Catalog, SeaOrmCatalog};
pub use engine::BuildEngine;
pub use error::{BuildError, StoreError};
pub use model::*;
pub use store::{BuildStore, SeaOrmBuildStore};
