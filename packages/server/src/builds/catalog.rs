use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::error::StoreError;
use super::model::{CatalogComponent, ComponentCategory};
use crate::entity::component;

/// Source of truth for component identity and price.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve the given ids. Unknown ids are simply absent from the map.
    async fn resolve_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, CatalogComponent>, StoreError>;
}

/// Catalog backed by the `component` table.
pub struct SeaOrmCatalog {
    db: DatabaseConnection,
}

impl SeaOrmCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Catalog for SeaOrmCatalog {
    async fn resolve_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, CatalogComponent>, StoreError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = component::Entity::find()
            .filter(component::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| catalog_component(row).map(|c| (c.id, c)))
            .collect()
    }
}

/// Convert a catalog row into the engine's view of a component.
pub fn catalog_component(row: component::Model) -> Result<CatalogComponent, StoreError> {
    let category = row
        .category
        .parse::<ComponentCategory>()
        .map_err(DbErr::Custom)?;
    let image = row
        .images
        .as_array()
        .and_then(|images| images.first())
        .and_then(|first| first.as_str())
        .map(str::to_string);
    let specs = if row.specs.is_object() {
        row.specs
    } else {
        serde_json::json!({})
    };

    Ok(CatalogComponent {
        id: row.id,
        name: row.name,
        brand: row.brand,
        model: row.model,
        category,
        price: row.price,
        currency: row.currency,
        image,
        specs,
    })
}
