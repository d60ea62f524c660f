use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "component")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub brand: String,
    pub model: String,

    /// One of the `ComponentCategory` names, e.g. `CPU`, `GPU`.
    #[sea_orm(indexed)]
    pub category: String,

    /// Minor currency units.
    pub price: i64,
    pub currency: String,

    /// Free-form characteristics object.
    #[sea_orm(column_type = "JsonBinary")]
    pub specs: Json,

    /// JSON array of image URLs. The first one is the cover image.
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,

    #[sea_orm(has_many, via = "build_component")]
    pub builds: HasMany<super::build::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
