use super::error::BuildError;
use super::model::{BuildRecord, Principal};

/// Largest page size accepted by the list operations.
pub const MAX_PAGE_SIZE: u64 = 50;

/// Return the caller, or `Unauthenticated` when the call is anonymous.
pub fn require_principal(requester: Option<&Principal>) -> Result<&Principal, BuildError> {
    requester.ok_or(BuildError::Unauthenticated)
}

/// Public builds are readable by anyone, private ones only by their owner.
pub fn can_read(build: &BuildRecord, requester: Option<&Principal>) -> bool {
    build.is_public || requester.is_some_and(|p| p.id == build.owner_id)
}

pub fn require_read(build: &BuildRecord, requester: Option<&Principal>) -> Result<(), BuildError> {
    if can_read(build, requester) {
        Ok(())
    } else {
        Err(BuildError::Forbidden(
            "Access to a private build is forbidden".into(),
        ))
    }
}

/// Write access requires ownership, whatever the visibility.
pub fn require_owner(build: &BuildRecord, principal: &Principal) -> Result<(), BuildError> {
    if build.owner_id == principal.id {
        Ok(())
    } else {
        Err(BuildError::Forbidden(
            "Only the owner can modify this build".into(),
        ))
    }
}

/// Validated 1-based page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Result<Self, BuildError> {
        if page < 1 || !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(BuildError::InvalidArgument(format!(
                "page must be >= 1 and limit must be 1-{MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> Result<u64, BuildError> {
        (self.page - 1)
            .checked_mul(self.limit)
            .ok_or_else(|| BuildError::InvalidArgument("page is too large".into()))
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}
