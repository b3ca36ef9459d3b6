mod entity;
mod health;

pub use entity::{create, delete, get, list, search, update, SearchParams};
pub use health::health;
