//! In-process `BuildStore` and `Catalog` used by the engine tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;
use uuid::Uuid;

use super::catalog::Catalog;
use super::error::StoreError;
use super::model::{
    BuildChanges, BuildMember, BuildRecord, CatalogComponent, ComponentCategory, NewBuild,
    OwnerProfile, PublicSort, SortField, SortOrder,
};
use super::store::BuildStore;

#[derive(Default)]
pub struct MemoryCatalog {
    components: Mutex<HashMap<Uuid, CatalogComponent>>,
}

impl MemoryCatalog {
    pub fn add(&self, category: ComponentCategory, name: &str, price: i64) -> Uuid {
        let id = Uuid::now_v7();
        let component = CatalogComponent {
            id,
            name: name.to_string(),
            brand: "Acme".into(),
            model: name.to_string(),
            category,
            price,
            currency: "KZT".into(),
            image: None,
            specs: serde_json::json!({}),
        };
        self.components.lock().unwrap().insert(id, component);
        id
    }

    pub fn set_price(&self, id: Uuid, price: i64) {
        if let Some(c) = self.components.lock().unwrap().get_mut(&id) {
            c.price = price;
        }
    }

    pub fn remove(&self, id: Uuid) {
        self.components.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn resolve_many(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, CatalogComponent>, StoreError> {
        let components = self.components.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| components.get(id).map(|c| (*id, c.clone())))
            .collect())
    }
}

/// Every write runs against a staged copy of the builds that replaces the
/// live map only on commit. `fail_commits` makes the commit fail after the
/// staged writes are done, so a failed call must leave the store untouched.
#[derive(Default)]
pub struct MemoryBuildStore {
    builds: Mutex<HashMap<Uuid, BuildRecord>>,
    users: Mutex<HashMap<i32, OwnerProfile>>,
    fail_commits: AtomicBool,
}

impl MemoryBuildStore {
    pub fn add_user(&self, id: i32, display_name: &str) {
        self.users.lock().unwrap().insert(
            id,
            OwnerProfile {
                id,
                display_name: display_name.to_string(),
            },
        );
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn build_count(&self) -> usize {
        self.builds.lock().unwrap().len()
    }

    pub fn member_rows(&self) -> usize {
        self.builds
            .lock()
            .unwrap()
            .values()
            .map(|b| b.members.len())
            .sum()
    }

    fn transact<T>(
        &self,
        f: impl FnOnce(&mut HashMap<Uuid, BuildRecord>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut builds = self.builds.lock().unwrap();
        let mut staged = builds.clone();
        let value = f(&mut staged)?;
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Db(DbErr::Custom("commit failed".into())));
        }
        *builds = staged;
        Ok(value)
    }

    fn page(builds: Vec<BuildRecord>, offset: u64, limit: u64) -> Vec<BuildRecord> {
        builds
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }
}

#[async_trait]
impl BuildStore for MemoryBuildStore {
    async fn find_with_components(&self, id: Uuid) -> Result<Option<BuildRecord>, StoreError> {
        Ok(self.builds.lock().unwrap().get(&id).cloned())
    }

    async fn list_owned(
        &self,
        owner_id: i32,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<BuildRecord>, StoreError> {
        let mut owned: Vec<BuildRecord> = self
            .builds
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        Ok(Self::page(owned, offset, limit))
    }

    async fn list_public(
        &self,
        sort: PublicSort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<BuildRecord>, StoreError> {
        let mut public: Vec<BuildRecord> = self
            .builds
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.is_public)
            .cloned()
            .collect();
        public.sort_by(|a, b| {
            let ordering = match sort.field {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::Name => a.name.cmp(&b.name),
                SortField::TotalPrice => a.total_price.cmp(&b.total_price),
            }
            .then(a.id.cmp(&b.id));
            match sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        Ok(Self::page(public, offset, limit))
    }

    async fn count_owned(&self, owner_id: i32) -> Result<u64, StoreError> {
        let builds = self.builds.lock().unwrap();
        Ok(builds.values().filter(|b| b.owner_id == owner_id).count() as u64)
    }

    async fn count_public(&self) -> Result<u64, StoreError> {
        let builds = self.builds.lock().unwrap();
        Ok(builds.values().filter(|b| b.is_public).count() as u64)
    }

    async fn insert(
        &self,
        build: NewBuild,
        members: Vec<BuildMember>,
    ) -> Result<BuildRecord, StoreError> {
        let now = Utc::now();
        let record = BuildRecord {
            id: Uuid::now_v7(),
            name: build.name,
            description: build.description,
            total_price: build.total_price,
            is_public: build.is_public,
            owner_id: build.owner_id,
            copied_from: build.copied_from,
            created_at: now,
            updated_at: now,
            members,
        };
        self.transact(|builds| {
            builds.insert(record.id, record.clone());
            Ok(record)
        })
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BuildChanges,
        members: Option<Vec<BuildMember>>,
    ) -> Result<BuildRecord, StoreError> {
        self.transact(|builds| {
            let record = builds.get_mut(&id).ok_or(StoreError::Missing(id))?;

            if let Some(name) = changes.name {
                record.name = name;
            }
            if let Some(description) = changes.description {
                record.description = description;
            }
            if let Some(is_public) = changes.is_public {
                record.is_public = is_public;
            }
            if let Some(total_price) = changes.total_price {
                record.total_price = total_price;
            }
            if let Some(members) = members {
                record.members = members;
            }
            record.updated_at = Utc::now();
            Ok(record.clone())
        })
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<(), StoreError> {
        self.transact(|builds| {
            builds
                .remove(&id)
                .map(|_| ())
                .ok_or(StoreError::Missing(id))
        })
    }

    async fn owner_profiles(
        &self,
        owner_ids: &[i32],
    ) -> Result<HashMap<i32, OwnerProfile>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(owner_ids
            .iter()
            .filter_map(|id| users.get(id).map(|p| (*id, p.clone())))
            .collect())
    }
}
