use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::builds::{
    BuildPatch, CatalogComponent, ComponentCategory, ComposedBuild, ComposedMember, CreateBuild,
    OwnerProfile, Page, PublicSort, Selection, SortField, SortOrder,
};
use crate::error::AppError;

pub use super::shared::Pagination;
use super::shared::double_option;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

fn default_quantity() -> i32 {
    1
}

/// One component of a build as submitted by the client.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SelectionRequest {
    /// Category the component is placed under. Must match the catalog.
    pub category: ComponentCategory,
    /// Catalog component ID.
    pub component_id: Uuid,
    /// Number of units (1-99, defaults to 1).
    #[serde(default = "default_quantity")]
    #[schema(example = 1)]
    pub quantity: i32,
}

impl From<SelectionRequest> for Selection {
    fn from(s: SelectionRequest) -> Self {
        Self {
            category: s.category,
            component_id: s.component_id,
            quantity: s.quantity,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateBuildRequest {
    /// Build name (3-100 characters after trimming).
    #[schema(example = "Quiet 1440p gaming")]
    pub name: String,
    /// Optional description (up to 1000 characters).
    pub description: Option<String>,
    /// Whether other users may see and copy the build. Defaults to `false`.
    pub is_public: Option<bool>,
    /// Selected components in display order. Duplicate component IDs are
    /// merged by summing their quantities.
    pub components: Vec<SelectionRequest>,
}

impl From<CreateBuildRequest> for CreateBuild {
    fn from(r: CreateBuildRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            is_public: r.is_public,
            selections: r.components.into_iter().map(Selection::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateBuildRequest {
    pub name: Option<String>,
    /// `null` clears the description.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    /// When present, replaces the whole component set and re-prices the build.
    pub components: Option<Vec<SelectionRequest>>,
}

impl From<UpdateBuildRequest> for BuildPatch {
    fn from(r: UpdateBuildRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            is_public: r.is_public,
            selections: r
                .components
                .map(|c| c.into_iter().map(Selection::from).collect()),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CopyBuildRequest {
    /// Name of the new build (3-100 characters after trimming).
    #[schema(example = "My take on it")]
    pub name: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BuildListQuery {
    /// Page number, 1-based (default 1).
    pub page: Option<u64>,
    /// Page size, 1-50 (default 10).
    pub limit: Option<u64>,
}

impl BuildListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublicBuildListQuery {
    /// Page number, 1-based (default 1).
    pub page: Option<u64>,
    /// Page size, 1-50 (default 10).
    pub limit: Option<u64>,
    /// `created_at` (default), `name` or `total_price`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_order: Option<String>,
}

impl PublicBuildListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn sort(&self) -> Result<PublicSort, AppError> {
        let field: SortField = match &self.sort_by {
            Some(s) => s.parse().map_err(AppError::Validation)?,
            None => Default::default(),
        };
        let order: SortOrder = match &self.sort_order {
            Some(s) => s.parse().map_err(AppError::Validation)?,
            None => Default::default(),
        };
        Ok(PublicSort { field, order })
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OwnerResponse {
    pub id: i32,
    #[schema(example = "Alice")]
    pub display_name: String,
}

impl From<OwnerProfile> for OwnerResponse {
    fn from(p: OwnerProfile) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name,
        }
    }
}

/// Catalog details of a build member.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ComponentSummary {
    pub id: Uuid,
    #[schema(example = "Ryzen 7 7800X3D")]
    pub name: String,
    #[schema(example = "AMD")]
    pub brand: String,
    #[schema(example = "100-100000910WOF")]
    pub model: String,
    /// Current catalog price in minor units.
    #[schema(example = 185000)]
    pub price: i64,
    #[schema(example = "KZT")]
    pub currency: String,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[schema(value_type = Object)]
    pub specs: serde_json::Value,
}

impl From<CatalogComponent> for ComponentSummary {
    fn from(c: CatalogComponent) -> Self {
        Self {
            id: c.id,
            name: c.name,
            brand: c.brand,
            model: c.model,
            price: c.price,
            currency: c.currency,
            image: c.image,
            specs: c.specs,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BuildComponentResponse {
    pub category: ComponentCategory,
    pub component: ComponentSummary,
    #[schema(example = 2)]
    pub quantity: i32,
}

impl From<ComposedMember> for BuildComponentResponse {
    fn from(m: ComposedMember) -> Self {
        Self {
            category: m.category,
            component: m.component.into(),
            quantity: m.quantity,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BuildResponse {
    pub id: Uuid,
    #[schema(example = "Quiet 1440p gaming")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sum of price times quantity as of the last component change.
    #[schema(example = 444500)]
    pub total_price: i64,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Source build when this build was created by copying.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copied_from: Option<Uuid>,
    pub owner: OwnerResponse,
    pub components: Vec<BuildComponentResponse>,
}

impl From<ComposedBuild> for BuildResponse {
    fn from(b: ComposedBuild) -> Self {
        Self {
            id: b.id,
            name: b.name,
            description: b.description,
            total_price: b.total_price,
            is_public: b.is_public,
            created_at: b.created_at,
            updated_at: b.updated_at,
            copied_from: b.copied_from,
            owner: b.owner.into(),
            components: b.components.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BuildListResponse {
    pub data: Vec<BuildResponse>,
    pub pagination: Pagination,
}

impl From<Page<ComposedBuild>> for BuildListResponse {
    fn from(page: Page<ComposedBuild>) -> Self {
        let pagination = Pagination::from(&page);
        Self {
            data: page.items.into_iter().map(Into::into).collect(),
            pagination,
        }
    }
}
