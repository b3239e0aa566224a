//! Pet-access gate: the authorization collaborator for pet-scoped data.

use async_trait::async_trait;

use crate::error::ServiceResult;

/// Authorization capability over pet-scoped data.
///
/// Implemented by the pet-ownership collaborator; this crate only consumes
/// the answers. Ownership of reminders themselves is by user id and is
/// checked separately - pet co-ownership never grants edit rights on
/// another user's items.
#[async_trait]
pub trait PetAccessGate: Send + Sync {
    /// May `user_id` create or modify data scoped to `pet_id`?
    async fn has_access(&self, pet_id: uuid::Uuid, user_id: uuid::Uuid) -> ServiceResult<bool>;

    /// May `user_id` read data scoped to `pet_id` (primary owner or co-owner)?
    async fn is_co_owner_visible(
        &self,
        pet_id: uuid::Uuid,
        user_id: uuid::Uuid,
    ) -> ServiceResult<bool>;
}

/// Gate that grants every check.
///
/// Used by standalone single-user deployments where every pet belongs to
/// the configured user.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAccessGate;

#[async_trait]
impl PetAccessGate for OpenAccessGate {
    async fn has_access(&self, _pet_id: uuid::Uuid, _user_id: uuid::Uuid) -> ServiceResult<bool> {
        Ok(true)
    }

    async fn is_co_owner_visible(
        &self,
        _pet_id: uuid::Uuid,
        _user_id: uuid::Uuid,
    ) -> ServiceResult<bool> {
        Ok(true)
    }
}
