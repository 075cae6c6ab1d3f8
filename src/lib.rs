//! Persistence and state-derivation layer for a plant-care tracker.
//!
//! The crate owns the embedded SQLite store behind the application: plant
//! records with their care-countdown bookkeeping, user-defined categories,
//! and the aggregation helpers the analytics screens chart. Screens, forms,
//! and schedulers live outside this crate; they open one connection at
//! startup via [`db::open_default`] and pass it into the store functions on
//! every user action or focus event. Keeping the glue logic documented makes
//! it easy to recall why each re-export exists when revisiting the project.
pub mod db;
pub mod models;
pub mod stats;

/// Convenience re-exports for the persistence layer. `open_default` is what
/// application startup calls to initialize the embedded SQLite store;
/// `advance_countdowns` is the daily tick an external scheduler is expected
/// to invoke once per calendar day.
pub use db::{advance_countdowns, open_default, StoreError, StoreResult};

/// The primary domain types that other layers manipulate.
pub use models::{Category, NewPlant, Plant, PlantState};

/// Chart-facing summaries derived from a fetched plant list.
pub use stats::{category_counts, status_counts, StatusCounts};
