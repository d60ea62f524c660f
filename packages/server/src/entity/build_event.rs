use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit trail of build mutations. Written only when `builds.audit_events`
/// is enabled, inside the transaction of the mutation it records.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "build_event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Kept after the build is deleted, so no foreign key.
    #[sea_orm(indexed)]
    pub build_id: Uuid,

    pub actor_id: i32,

    /// One of: created, updated, components_replaced, deleted
    pub kind: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub detail: Json,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
