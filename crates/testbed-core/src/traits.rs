use async_trait::async_trait;

use crate::error::Error;
use crate::types::{Entity, EntityId, SaveEntity};

/// Persistence interface over the single entity table.
///
/// Each call is one statement against the backing store; no transaction
/// spans more than one call.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Total number of persisted entities.
    async fn count(&self) -> Result<u64, Error>;

    /// Insert the entity if it has no id, otherwise overwrite the record
    /// with that id. Returns the persisted entity.
    ///
    /// Saving with an id that matches no record returns [`Error::NotFound`].
    async fn save(&self, entity: SaveEntity) -> Result<Entity, Error>;

    /// All persisted entities.
    async fn find_all(&self) -> Result<Vec<Entity>, Error>;

    /// The entity with the given id, if any.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Entity>, Error>;

    /// Whether an entity with the given id exists.
    async fn exists_by_id(&self, id: EntityId) -> Result<bool, Error>;

    /// Remove the entity with the given id. Callers check existence first.
    async fn delete_by_id(&self, id: EntityId) -> Result<(), Error>;

    /// Entities whose name is exactly `name`.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Entity>, Error>;

    /// Entities whose name contains `fragment`, compared case-insensitively.
    async fn find_by_name_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> Result<Vec<Entity>, Error>;
}
