use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "build")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,

    /// Sum of price x quantity over the members, as of the last write.
    pub total_price: i64,

    #[sea_orm(default_value = false, indexed)]
    pub is_public: bool,

    #[sea_orm(indexed)]
    pub owner_id: i32,
    #[sea_orm(belongs_to, from = "owner_id", to = "id")]
    pub owner: HasOne<super::user::Entity>,

    #[sea_orm(has_many, via = "build_component")]
    pub components: HasMany<super::component::Entity>,

    /// Source build when this one was created by copying. Not a foreign key:
    /// the source may be deleted later.
    pub copied_from: Option<Uuid>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
