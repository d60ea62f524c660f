use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::error::StoreError;
use super::model::{
    BuildChanges, BuildMember, BuildRecord, NewBuild, OwnerProfile, PublicSort, SortField,
    SortOrder,
};
use crate::entity::{build, build_component, build_event, user};

/// Persistence boundary of the build engine.
///
/// `insert`, `update` and `delete_cascade` are each atomic: member rows are
/// written in the same transaction as the build row they belong to.
#[async_trait]
pub trait BuildStore: Send + Sync {
    async fn find_with_components(&self, id: Uuid) -> Result<Option<BuildRecord>, StoreError>;

    /// Builds of `owner_id`, most recently updated first.
    async fn list_owned(
        &self,
        owner_id: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<BuildRecord>, StoreError>;

    async fn list_public(
        &self,
        sort: PublicSort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<BuildRecord>, StoreError>;

    async fn count_owned(&self, owner_id: i32) -> Result<u64, StoreError>;

    async fn count_public(&self) -> Result<u64, StoreError>;

    async fn insert(
        &self,
        build: NewBuild,
        members: Vec<BuildMember>,
    ) -> Result<BuildRecord, StoreError>;

    /// Apply scalar changes. When `members` is given, the whole member set
    /// is deleted and replaced by it.
    async fn update(
        &self,
        id: Uuid,
        changes: BuildChanges,
        members: Option<Vec<BuildMember>>,
    ) -> Result<BuildRecord, StoreError>;

    /// Remove all member rows, then the build row.
    async fn delete_cascade(&self, id: Uuid) -> Result<(), StoreError>;

    async fn owner_profiles(
        &self,
        owner_ids: &[i32],
    ) -> Result<HashMap<i32, OwnerProfile>, StoreError>;
}

type TxnFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'c>>;

/// `BuildStore` on top of a SeaORM connection pool.
pub struct SeaOrmBuildStore {
    db: DatabaseConnection,
    audit_events: bool,
}

impl SeaOrmBuildStore {
    pub fn new(db: DatabaseConnection, audit_events: bool) -> Self {
        Self { db, audit_events }
    }

    /// Run `f` inside one transaction. Any error rolls the whole unit back.
    pub async fn run_in_transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, T> + Send,
    {
        let txn = self.db.begin().await?;
        let value = f(&txn).await?;
        txn.commit().await?;
        Ok(value)
    }

    async fn attach_members(
        &self,
        builds: Vec<build::Model>,
    ) -> Result<Vec<BuildRecord>, StoreError> {
        let ids: Vec<Uuid> = builds.iter().map(|b| b.id).collect();
        let rows = if ids.is_empty() {
            Vec::new()
        } else {
            build_component::Entity::find()
                .filter(build_component::Column::BuildId.is_in(ids))
                .order_by_asc(build_component::Column::Position)
                .all(&self.db)
                .await?
        };

        let mut grouped: HashMap<Uuid, Vec<BuildMember>> = HashMap::new();
        for row in rows {
            grouped.entry(row.build_id).or_default().push(BuildMember {
                component_id: row.component_id,
                quantity: row.quantity,
            });
        }

        Ok(builds
            .into_iter()
            .map(|b| {
                let members = grouped.remove(&b.id).unwrap_or_default();
                to_record(b, members)
            })
            .collect())
    }
}

#[async_trait]
impl BuildStore for SeaOrmBuildStore {
    async fn find_with_components(&self, id: Uuid) -> Result<Option<BuildRecord>, StoreError> {
        let Some(model) = build::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let members = load_members(&self.db, id).await?;
        Ok(Some(to_record(model, members)))
    }

    async fn list_owned(
        &self,
        owner_id: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<BuildRecord>, StoreError> {
        let builds = build::Entity::find()
            .filter(build::Column::OwnerId.eq(owner_id))
            .order_by(build::Column::UpdatedAt, Order::Desc)
            .order_by(build::Column::Id, Order::Desc)
            .offset(Some(offset))
            .limit(Some(limit))
            .all(&self.db)
            .await?;
        self.attach_members(builds).await
    }

    async fn list_public(
        &self,
        sort: PublicSort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<BuildRecord>, StoreError> {
        let column = match sort.field {
            SortField::CreatedAt => build::Column::CreatedAt,
            SortField::Name => build::Column::Name,
            SortField::TotalPrice => build::Column::TotalPrice,
        };
        let order = match sort.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let builds = build::Entity::find()
            .filter(build::Column::IsPublic.eq(true))
            .order_by(column, order.clone())
            .order_by(build::Column::Id, order)
            .offset(Some(offset))
            .limit(Some(limit))
            .all(&self.db)
            .await?;
        self.attach_members(builds).await
    }

    async fn count_owned(&self, owner_id: i32) -> Result<u64, StoreError> {
        Ok(build::Entity::find()
            .filter(build::Column::OwnerId.eq(owner_id))
            .count(&self.db)
            .await?)
    }

    async fn count_public(&self) -> Result<u64, StoreError> {
        Ok(build::Entity::find()
            .filter(build::Column::IsPublic.eq(true))
            .count(&self.db)
            .await?)
    }

    async fn insert(
        &self,
        new_build: NewBuild,
        members: Vec<BuildMember>,
    ) -> Result<BuildRecord, StoreError> {
        let audit = self.audit_events;
        self.run_in_transaction(move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                let id = Uuid::now_v7();
                let model = build::ActiveModel {
                    id: Set(id),
                    name: Set(new_build.name),
                    description: Set(new_build.description),
                    total_price: Set(new_build.total_price),
                    is_public: Set(new_build.is_public),
                    owner_id: Set(new_build.owner_id),
                    copied_from: Set(new_build.copied_from),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(txn)
                .await?;

                insert_members(txn, id, &members).await?;

                if audit {
                    record_event(
                        txn,
                        id,
                        model.owner_id,
                        "created",
                        json!({
                            "total_price": model.total_price,
                            "components": members.len(),
                            "copied_from": model.copied_from,
                        }),
                    )
                    .await?;
                }

                debug!(build_id = %id, members = members.len(), "build inserted");
                Ok(to_record(model, members))
            })
        })
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BuildChanges,
        members: Option<Vec<BuildMember>>,
    ) -> Result<BuildRecord, StoreError> {
        let audit = self.audit_events;
        self.run_in_transaction(move |txn| {
            Box::pin(async move {
                let existing = build::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or(StoreError::Missing(id))?;

                let mut changed = Vec::new();
                let mut active: build::ActiveModel = existing.into();
                if let Some(name) = changes.name {
                    active.name = Set(name);
                    changed.push("name");
                }
                if let Some(description) = changes.description {
                    active.description = Set(description);
                    changed.push("description");
                }
                if let Some(is_public) = changes.is_public {
                    active.is_public = Set(is_public);
                    changed.push("is_public");
                }
                if let Some(total_price) = changes.total_price {
                    active.total_price = Set(total_price);
                    changed.push("total_price");
                }
                active.updated_at = Set(Utc::now());
                let model = active.update(txn).await?;

                let replaced = members.is_some();
                let members = match members {
                    Some(members) => {
                        build_component::Entity::delete_many()
                            .filter(build_component::Column::BuildId.eq(id))
                            .exec(txn)
                            .await?;
                        insert_members(txn, id, &members).await?;
                        members
                    }
                    None => load_members(txn, id).await?,
                };

                if audit {
                    let kind = if replaced {
                        "components_replaced"
                    } else {
                        "updated"
                    };
                    record_event(
                        txn,
                        id,
                        model.owner_id,
                        kind,
                        json!({
                            "fields": changed,
                            "total_price": model.total_price,
                            "components": members.len(),
                        }),
                    )
                    .await?;
                }

                Ok(to_record(model, members))
            })
        })
        .await
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), StoreError> {
        let audit = self.audit_events;
        self.run_in_transaction(move |txn| {
            Box::pin(async move {
                let existing = build::Entity::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or(StoreError::Missing(id))?;

                let removed = build_component::Entity::delete_many()
                    .filter(build_component::Column::BuildId.eq(id))
                    .exec(txn)
                    .await?;
                build::Entity::delete_by_id(id).exec(txn).await?;

                if audit {
                    record_event(
                        txn,
                        id,
                        existing.owner_id,
                        "deleted",
                        json!({
                            "name": existing.name,
                            "components": removed.rows_affected,
                        }),
                    )
                    .await?;
                }

                Ok(())
            })
        })
        .await
    }

    async fn owner_profiles(
        &self,
        owner_ids: &[i32],
    ) -> Result<HashMap<i32, OwnerProfile>, StoreError> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(owner_ids.to_vec()))
            .all(&self.db)
            .await?;

        Ok(users
            .into_iter()
            .map(|u| {
                let profile = OwnerProfile {
                    id: u.id,
                    display_name: u.public_name(),
                };
                (u.id, profile)
            })
            .collect())
    }
}

fn to_record(model: build::Model, members: Vec<BuildMember>) -> BuildRecord {
    BuildRecord {
        id: model.id,
        name: model.name,
        description: model.description,
        total_price: model.total_price,
        is_public: model.is_public,
        owner_id: model.owner_id,
        copied_from: model.copied_from,
        created_at: model.created_at,
        updated_at: model.updated_at,
        members,
    }
}

async fn load_members<C: ConnectionTrait>(db: &C, build_id: Uuid) -> Result<Vec<BuildMember>, DbErr> {
    let rows = build_component::Entity::find()
        .filter(build_component::Column::BuildId.eq(build_id))
        .order_by_asc(build_component::Column::Position)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| BuildMember {
            component_id: row.component_id,
            quantity: row.quantity,
        })
        .collect())
}

async fn insert_members(
    txn: &DatabaseTransaction,
    build_id: Uuid,
    members: &[BuildMember],
) -> Result<(), DbErr> {
    if members.is_empty() {
        return Ok(());
    }

    let rows = members
        .iter()
        .enumerate()
        .map(|(position, member)| build_component::ActiveModel {
            build_id: Set(build_id),
            component_id: Set(member.component_id),
            quantity: Set(member.quantity),
            position: Set(position as i32),
            ..Default::default()
        });

    build_component::Entity::insert_many(rows)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

async fn record_event(
    txn: &DatabaseTransaction,
    build_id: Uuid,
    actor_id: i32,
    kind: &str,
    detail: serde_json::Value,
) -> Result<(), DbErr> {
    build_event::ActiveModel {
        build_id: Set(build_id),
        actor_id: Set(actor_id),
        kind: Set(kind.to_string()),
        detail: Set(detail),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(())
}
