use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated caller, as issued by the identity layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub role: String,
}

/// Component category. Stored in the catalog as its upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentCategory {
    Cpu,
    Gpu,
    Motherboard,
    Ram,
    Storage,
    Psu,
    Case,
    Cooling,
    Peripherals,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 9] = [
        Self::Cpu,
        Self::Gpu,
        Self::Motherboard,
        Self::Ram,
        Self::Storage,
        Self::Psu,
        Self::Case,
        Self::Cooling,
        Self::Peripherals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Gpu => "GPU",
            Self::Motherboard => "MOTHERBOARD",
            Self::Ram => "RAM",
            Self::Storage => "STORAGE",
            Self::Psu => "PSU",
            Self::Case => "CASE",
            Self::Cooling => "COOLING",
            Self::Peripherals => "PERIPHERALS",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown component category '{s}'"))
    }
}

/// One entry of a submitted component set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub category: ComponentCategory,
    pub component_id: Uuid,
    pub quantity: i32,
}

/// A catalog component as seen by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogComponent {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub category: ComponentCategory,
    pub price: i64,
    pub currency: String,
    pub image: Option<String>,
    pub specs: serde_json::Value,
}

/// Membership row of a build, in selection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildMember {
    pub component_id: Uuid,
    pub quantity: i32,
}

/// A persisted build together with its members.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub total_price: i64,
    pub is_public: bool,
    pub owner_id: i32,
    pub copied_from: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub members: Vec<BuildMember>,
}

/// Row values for a build about to be inserted.
#[derive(Debug, Clone)]
pub struct NewBuild {
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub total_price: i64,
    pub copied_from: Option<Uuid>,
}

/// Scalar column changes applied by an update. `None` leaves a column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    pub total_price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerProfile {
    pub id: i32,
    pub display_name: String,
}

/// Arguments of `BuildEngine::create`.
#[derive(Debug, Clone)]
pub struct CreateBuild {
    pub name: String,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub selections: Vec<Selection>,
}

/// Arguments of `BuildEngine::update`.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_public: Option<bool>,
    pub selections: Option<Vec<Selection>>,
}

impl BuildPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
    TotalPrice,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "name" => Ok(Self::Name),
            "total_price" => Ok(Self::TotalPrice),
            _ => Err("sort_by must be one of: created_at, name, total_price".into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err("sort_order must be one of: asc, desc".into()),
        }
    }
}

/// Ordering of the public build listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublicSort {
    pub field: SortField,
    pub order: SortOrder,
}

/// A component line of a composed build.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedMember {
    pub category: ComponentCategory,
    pub component: CatalogComponent,
    pub quantity: i32,
}

/// A build joined with its owner and the catalog details of its members.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedBuild {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub total_price: i64,
    pub is_public: bool,
    pub copied_from: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: OwnerProfile,
    pub components: Vec<ComposedMember>,
}
