//! Core trait definitions for the storage seams
//!
//! - [`ProfileRepository`]: read-only profile lookup
//! - [`InteractionLog`]: append-only audit trail

use async_trait::async_trait;
use nexora_core::{CustomerProfile, InteractionRecord};

use crate::RepositoryResult;

/// Read-only access to customer profiles
///
/// Implementations are populated once and never mutated afterwards, so they
/// can be shared across concurrent callers without locking.
pub trait ProfileRepository: Send + Sync {
    /// Look up a profile by user id
    ///
    /// # Errors
    /// [`RepositoryError::NotFound`](crate::RepositoryError::NotFound) when no
    /// profile carries `user_id`.
    fn find(&self, user_id: &str) -> RepositoryResult<&CustomerProfile>;

    /// All profiles, in source order
    fn list(&self) -> Vec<&CustomerProfile>;
}

/// Append-only record of user actions
#[async_trait]
pub trait InteractionLog: Send + Sync {
    /// Append one record
    async fn append(&self, record: InteractionRecord) -> RepositoryResult<()>;

    /// Read every record, oldest first
    async fn read_all(&self) -> RepositoryResult<Vec<InteractionRecord>>;
}
