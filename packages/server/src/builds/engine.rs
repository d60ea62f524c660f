use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::access::{Page, PageRequest, require_owner, require_principal, require_read};
use super::catalog::Catalog;
use super::error::BuildError;
use super::model::{
    BuildChanges, BuildMember, BuildPatch, BuildRecord, CatalogComponent, ComposedBuild,
    ComposedMember, CreateBuild, NewBuild, OwnerProfile, Principal, PublicSort, Selection,
};
use super::selection::{
    merge_selections, missing_components, normalize_description, normalize_name,
    price_selections,
};
use super::store::BuildStore;

/// Composes builds from catalog components and keeps their membership and
/// total price consistent.
///
/// Every mutating operation maps to exactly one store transaction; all
/// validation and catalog resolution happens before it.
pub struct BuildEngine {
    store: Arc<dyn BuildStore>,
    catalog: Arc<dyn Catalog>,
}

impl BuildEngine {
    pub fn new(store: Arc<dyn BuildStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    /// The caller's own builds, most recently updated first.
    #[instrument(skip(self, requester))]
    pub async fn list_owned(
        &self,
        requester: Option<&Principal>,
        page: u64,
        limit: u64,
    ) -> Result<Page<ComposedBuild>, BuildError> {
        let principal = require_principal(requester)?;
        let request = PageRequest::new(page, limit)?;

        let records = self
            .store
            .list_owned(principal.id, request.offset()?, request.limit)
            .await?;
        let total = self.store.count_owned(principal.id).await?;

        Ok(Page {
            items: self.compose_many(records).await?,
            page: request.page,
            limit: request.limit,
            total,
        })
    }

    /// Public builds of every user.
    #[instrument(skip(self))]
    pub async fn list_public(
        &self,
        page: u64,
        limit: u64,
        sort: PublicSort,
    ) -> Result<Page<ComposedBuild>, BuildError> {
        let request = PageRequest::new(page, limit)?;

        let records = self
            .store
            .list_public(sort, request.offset()?, request.limit)
            .await?;
        let total = self.store.count_public().await?;

        Ok(Page {
            items: self.compose_many(records).await?,
            page: request.page,
            limit: request.limit,
            total,
        })
    }

    #[instrument(skip(self, requester), fields(build_id = %id))]
    pub async fn get_by_id(
        &self,
        id: Uuid,
        requester: Option<&Principal>,
    ) -> Result<ComposedBuild, BuildError> {
        let record = self.find(id).await?;
        require_read(&record, requester)?;
        self.compose_one(record).await
    }

    #[instrument(skip(self, requester, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        requester: Option<&Principal>,
        input: CreateBuild,
    ) -> Result<ComposedBuild, BuildError> {
        let principal = require_principal(requester)?;
        self.create_as(principal, input, None).await
    }

    /// Patch scalar fields and optionally replace the whole component set.
    ///
    /// A replaced set is priced at current catalog prices. Without
    /// `selections` the stored total price is left untouched.
    #[instrument(skip(self, requester, patch), fields(build_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        requester: Option<&Principal>,
        patch: BuildPatch,
    ) -> Result<ComposedBuild, BuildError> {
        let principal = require_principal(requester)?;

        let name = patch.name.as_deref().map(normalize_name).transpose()?;
        let description = match &patch.description {
            Some(description) => Some(normalize_description(description.as_deref())?),
            None => None,
        };
        let selections = patch
            .selections
            .as_deref()
            .map(merge_selections)
            .transpose()?;

        let existing = self.find(id).await?;
        require_owner(&existing, principal)?;

        if patch.is_empty() {
            return self.compose_one(existing).await;
        }

        let (total_price, members) = match selections {
            Some(ref selections) => {
                let (total, members) = self.price(selections).await?;
                (Some(total), Some(members))
            }
            None => (None, None),
        };

        let changes = BuildChanges {
            name,
            description,
            is_public: patch.is_public,
            total_price,
        };
        let record = self.store.update(id, changes, members).await?;

        info!(
            total_price = record.total_price,
            replaced = selections.is_some(),
            "build updated"
        );
        self.compose_one(record).await
    }

    #[instrument(skip(self, requester), fields(build_id = %id))]
    pub async fn delete(&self, id: Uuid, requester: Option<&Principal>) -> Result<(), BuildError> {
        let principal = require_principal(requester)?;
        let existing = self.find(id).await?;
        require_owner(&existing, principal)?;

        self.store.delete_cascade(id).await?;
        info!("build deleted");
        Ok(())
    }

    /// Duplicate a public build into a new private build owned by the caller.
    #[instrument(skip(self, requester), fields(build_id = %id))]
    pub async fn copy(
        &self,
        id: Uuid,
        requester: Option<&Principal>,
        new_name: &str,
    ) -> Result<ComposedBuild, BuildError> {
        let principal = require_principal(requester)?;
        normalize_name(new_name)?;

        let source = self.find(id).await?;
        if !source.is_public {
            return Err(BuildError::Forbidden("Cannot copy a private build".into()));
        }

        let ids: Vec<Uuid> = source.members.iter().map(|m| m.component_id).collect();
        let resolved = self.catalog.resolve_many(&ids).await?;
        let selections = selections_from_members(&source.members, &resolved)?;

        let input = CreateBuild {
            name: new_name.to_string(),
            description: Some(format!("Copy of build: {}", source.name)),
            is_public: Some(false),
            selections,
        };
        self.create_as(principal, input, Some(source.id)).await
    }

    async fn create_as(
        &self,
        principal: &Principal,
        input: CreateBuild,
        copied_from: Option<Uuid>,
    ) -> Result<ComposedBuild, BuildError> {
        let name = normalize_name(&input.name)?;
        let description = normalize_description(input.description.as_deref())?;
        let selections = merge_selections(&input.selections)?;
        let (total_price, members) = self.price(&selections).await?;

        let new_build = NewBuild {
            owner_id: principal.id,
            name,
            description,
            is_public: input.is_public.unwrap_or(false),
            total_price,
            copied_from,
        };
        let record = self.store.insert(new_build, members).await?;

        info!(build_id = %record.id, total_price, "build created");
        self.compose_one(record).await
    }

    async fn find(&self, id: Uuid) -> Result<BuildRecord, BuildError> {
        self.store
            .find_with_components(id)
            .await?
            .ok_or_else(BuildError::build_not_found)
    }

    /// Resolve the selections and compute the member rows and total price.
    async fn price(&self, selections: &[Selection]) -> Result<(i64, Vec<BuildMember>), BuildError> {
        let ids: Vec<Uuid> = selections.iter().map(|s| s.component_id).collect();
        let resolved = self.catalog.resolve_many(&ids).await?;

        let missing = missing_components(selections, &resolved);
        if !missing.is_empty() {
            return Err(BuildError::ComponentsNotFound(missing));
        }

        price_selections(selections, &resolved)
    }

    async fn compose_one(&self, record: BuildRecord) -> Result<ComposedBuild, BuildError> {
        self.compose_many(vec![record])
            .await?
            .pop()
            .ok_or_else(BuildError::build_not_found)
    }

    async fn compose_many(
        &self,
        records: Vec<BuildRecord>,
    ) -> Result<Vec<ComposedBuild>, BuildError> {
        let component_ids: Vec<Uuid> = records
            .iter()
            .flat_map(|r| r.members.iter().map(|m| m.component_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let owner_ids: Vec<i32> = records
            .iter()
            .map(|r| r.owner_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let components = self.catalog.resolve_many(&component_ids).await?;
        let owners = self.store.owner_profiles(&owner_ids).await?;

        Ok(records
            .into_iter()
            .map(|record| compose(record, &components, &owners))
            .collect())
    }
}

fn selections_from_members(
    members: &[BuildMember],
    resolved: &HashMap<Uuid, CatalogComponent>,
) -> Result<Vec<Selection>, BuildError> {
    let missing: Vec<Uuid> = members
        .iter()
        .map(|m| m.component_id)
        .filter(|id| !resolved.contains_key(id))
        .collect();
    if !missing.is_empty() {
        return Err(BuildError::ComponentsNotFound(missing));
    }

    Ok(members
        .iter()
        .filter_map(|m| {
            resolved.get(&m.component_id).map(|c| Selection {
                category: c.category,
                component_id: m.component_id,
                quantity: m.quantity,
            })
        })
        .collect())
}

fn compose(
    record: BuildRecord,
    components: &HashMap<Uuid, CatalogComponent>,
    owners: &HashMap<i32, OwnerProfile>,
) -> ComposedBuild {
    let owner = owners.get(&record.owner_id).cloned().unwrap_or_else(|| {
        warn!(build_id = %record.id, owner_id = record.owner_id, "build owner not found");
        OwnerProfile {
            id: record.owner_id,
            display_name: String::new(),
        }
    });

    let members = record
        .members
        .iter()
        .filter_map(|member| match components.get(&member.component_id) {
            Some(component) => Some(ComposedMember {
                category: component.category,
                component: component.clone(),
                quantity: member.quantity,
            }),
            None => {
                warn!(
                    build_id = %record.id,
                    component_id = %member.component_id,
                    "build member no longer resolves in the catalog"
                );
                None
            }
        })
        .collect();

    ComposedBuild {
        id: record.id,
        name: record.name,
        description: record.description,
        total_price: record.total_price,
        is_public: record.is_public,
        copied_from: record.copied_from,
        created_at: record.created_at,
        updated_at: record.updated_at,
        owner,
        components: members,
    }
}
