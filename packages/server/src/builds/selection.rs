use std::collections::HashMap;

use uuid::Uuid;

use super::error::BuildError;
use super::model::{BuildMember, CatalogComponent, Selection};

pub const MIN_NAME_CHARS: usize = 3;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_SELECTIONS: usize = 64;
pub const MAX_QUANTITY: i32 = 99;

/// Validate and normalize a build name (trimmed, 3-100 characters).
pub fn normalize_name(name: &str) -> Result<String, BuildError> {
    let name = name.trim();
    let len = name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&len) {
        return Err(BuildError::InvalidArgument(format!(
            "Build name must be {MIN_NAME_CHARS}-{MAX_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

/// Trim a description; blank descriptions are stored as NULL.
pub fn normalize_description(description: Option<&str>) -> Result<Option<String>, BuildError> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(BuildError::InvalidArgument(format!(
            "Description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(Some(description.to_string()))
}

/// Check the shape of a submitted component set and merge duplicate
/// component ids by summing their quantities. First occurrence wins the
/// position; categories of duplicates must agree.
pub fn merge_selections(selections: &[Selection]) -> Result<Vec<Selection>, BuildError> {
    if selections.is_empty() {
        return Err(BuildError::InvalidArgument(
            "A build must contain at least one component".into(),
        ));
    }
    if selections.len() > MAX_SELECTIONS {
        return Err(BuildError::InvalidArgument(format!(
            "A build may contain at most {MAX_SELECTIONS} selections"
        )));
    }

    let mut merged: Vec<Selection> = Vec::with_capacity(selections.len());
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for selection in selections {
        if !(1..=MAX_QUANTITY).contains(&selection.quantity) {
            return Err(BuildError::InvalidArgument(format!(
                "Quantity must be 1-{MAX_QUANTITY}"
            )));
        }

        match index.get(&selection.component_id) {
            Some(&i) => {
                let existing = &mut merged[i];
                if existing.category != selection.category {
                    return Err(BuildError::InvalidArgument(format!(
                        "Component {} is listed under both {} and {}",
                        selection.component_id, existing.category, selection.category
                    )));
                }
                existing.quantity += selection.quantity;
                if existing.quantity > MAX_QUANTITY {
                    return Err(BuildError::InvalidArgument(format!(
                        "Quantity must be 1-{MAX_QUANTITY}"
                    )));
                }
            }
            None => {
                index.insert(selection.component_id, merged.len());
                merged.push(selection.clone());
            }
        }
    }

    Ok(merged)
}

/// Ids that the catalog failed to resolve, in submission order.
pub fn missing_components(
    selections: &[Selection],
    resolved: &HashMap<Uuid, CatalogComponent>,
) -> Vec<Uuid> {
    selections
        .iter()
        .map(|s| s.component_id)
        .filter(|id| !resolved.contains_key(id))
        .collect()
}

/// Price the selections against resolved catalog entries.
///
/// Every selection must be resolved and match the catalog category.
pub fn price_selections(
    selections: &[Selection],
    resolved: &HashMap<Uuid, CatalogComponent>,
) -> Result<(i64, Vec<BuildMember>), BuildError> {
    let mut total: i64 = 0;
    let mut members = Vec::with_capacity(selections.len());

    for selection in selections {
        let component = resolved
            .get(&selection.component_id)
            .ok_or_else(|| BuildError::ComponentsNotFound(vec![selection.component_id]))?;

        if component.category != selection.category {
            return Err(BuildError::InvalidArgument(format!(
                "Component {} is a {}, not a {}",
                component.id, component.category, selection.category
            )));
        }

        total = component
            .price
            .checked_mul(i64::from(selection.quantity))
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| BuildError::InvalidArgument("Total price is out of range".into()))?;

        members.push(BuildMember {
            component_id: selection.component_id,
            quantity: selection.quantity,
        });
    }

    Ok((total, members))
}
