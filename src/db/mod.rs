//! Persistence module split across logical submodules.

mod categories;
mod connection;
mod error;
mod plants;

pub use categories::{create_category, delete_categories, fetch_categories, rename_category};
pub use connection::{ensure_schema, open_at, open_default, open_in_memory};
pub use error::{StoreError, StoreResult};
pub use plants::{
    advance_countdowns, create_plant, delete_all_plants, delete_plant, fetch_curable_plants,
    fetch_plants, fetch_plants_matching, fetch_recent_plants, update_plant,
};
