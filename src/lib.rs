//! Embedded SQLite access layer for a shops/products catalog.
//!
//! # Intention
//!
//! - Own one SQLite connection and the two-table catalog schema.
//! - Expose typed CRUD and filtered/sorted queries with bound parameters.
//! - Keep a caller-visible trace of every statement submitted.
//!
//! # Architectural Boundaries
//!
//! - Only catalog persistence belongs here.
//! - No presentation code; [`bridge`] is the string-only surface for it.

pub mod bridge;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod schema;
pub mod service;
pub mod sort;
pub mod store;

pub use bridge::CatalogBridge;
pub use config::CatalogConfig;
pub use diagnostics::DiagnosticLog;
pub use error::{CatalogError, Result};
pub use model::{NewProduct, ProductRow, ProductUpdate, ShopRow};
pub use service::{CatalogApi, CatalogService};
pub use sort::{ProductSort, SortDirection, SortKey};
pub use store::CatalogStore;
