use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::builds::ComponentCategory;
use crate::entity::component;
use crate::error::AppError;

pub const DEFAULT_CURRENCY: &str = "KZT";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateComponentRequest {
    #[schema(example = "Ryzen 7 7800X3D")]
    pub name: String,
    #[schema(example = "AMD")]
    pub brand: String,
    #[schema(example = "100-100000910WOF")]
    pub model: String,
    pub category: ComponentCategory,
    /// Price in minor units, >= 0.
    #[schema(example = 185000)]
    pub price: i64,
    /// ISO 4217 code. Defaults to `KZT`.
    pub currency: Option<String>,
    /// Free-form characteristics; must be a JSON object.
    #[schema(value_type = Option<Object>)]
    pub specs: Option<serde_json::Value>,
    /// Image URLs; the first one is the cover image.
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateComponentRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub price: Option<i64>,
    pub currency: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub specs: Option<serde_json::Value>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ComponentResponse {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub category: ComponentCategory,
    pub price: i64,
    pub currency: String,
    #[schema(value_type = Object)]
    pub specs: serde_json::Value,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<component::Model> for ComponentResponse {
    type Error = AppError;

    fn try_from(m: component::Model) -> Result<Self, Self::Error> {
        let category: ComponentCategory = m
            .category
            .parse()
            .map_err(|e: String| AppError::Internal(format!("component {}: {e}", m.id)))?;
        let images = m
            .images
            .as_array()
            .map(|images| {
                images
                    .iter()
                    .filter_map(|i| i.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: m.id,
            name: m.name,
            brand: m.brand,
            model: m.model,
            category,
            price: m.price,
            currency: m.currency,
            specs: m.specs,
            images,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

fn validate_label(value: &str, field: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 200 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-200 characters"
        )));
    }
    Ok(())
}

fn validate_price(price: i64) -> Result<(), AppError> {
    if price < 0 {
        return Err(AppError::Validation("Price must be >= 0".into()));
    }
    Ok(())
}

fn validate_currency(currency: &str) -> Result<(), AppError> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Currency must be a 3-letter upper-case code".into(),
        ));
    }
    Ok(())
}

fn validate_specs(specs: &serde_json::Value) -> Result<(), AppError> {
    if !specs.is_object() {
        return Err(AppError::Validation("Specs must be a JSON object".into()));
    }
    Ok(())
}

fn validate_images(images: &[String]) -> Result<(), AppError> {
    if images.len() > 20 {
        return Err(AppError::Validation("At most 20 images are allowed".into()));
    }
    if images.iter().any(|i| i.trim().is_empty()) {
        return Err(AppError::Validation("Image URLs must not be empty".into()));
    }
    Ok(())
}

pub fn validate_create_component(payload: &CreateComponentRequest) -> Result<(), AppError> {
    validate_label(&payload.name, "Name")?;
    validate_label(&payload.brand, "Brand")?;
    validate_label(&payload.model, "Model")?;
    validate_price(payload.price)?;
    if let Some(currency) = &payload.currency {
        validate_currency(currency)?;
    }
    if let Some(specs) = &payload.specs {
        validate_specs(specs)?;
    }
    if let Some(images) = &payload.images {
        validate_images(images)?;
    }
    Ok(())
}

pub fn validate_update_component(payload: &UpdateComponentRequest) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_label(name, "Name")?;
    }
    if let Some(brand) = &payload.brand {
        validate_label(brand, "Brand")?;
    }
    if let Some(model) = &payload.model {
        validate_label(model, "Model")?;
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    if let Some(currency) = &payload.currency {
        validate_currency(currency)?;
    }
    if let Some(specs) = &payload.specs {
        validate_specs(specs)?;
    }
    if let Some(images) = &payload.images {
        validate_images(images)?;
    }
    Ok(())
}
