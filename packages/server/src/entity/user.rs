use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The role assigned to newly registered users.
pub const DEFAULT_ROLE: &str = "user";

/// Role allowed to manage the component catalog.
pub const ADMIN_ROLE: &str = "admin";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    pub password: String,

    /// Shown as the owner name of a build. Falls back to `username`.
    pub display_name: Option<String>,

    pub role: String,

    #[sea_orm(has_many)]
    pub builds: HasMany<super::build::Entity>,

    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn public_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.username)
            .to_string()
    }
}

impl ActiveModelBehavior for ActiveModel {}
