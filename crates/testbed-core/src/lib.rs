pub mod error;
pub mod traits;
pub mod types;

pub use error::Error;
pub use traits::EntityStore;
pub use types::{Entity, EntityId, SaveEntity};
