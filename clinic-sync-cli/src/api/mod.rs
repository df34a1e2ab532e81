//! Notion API boundary
//!
//! A blocking JSON client for the data source endpoints plus the typed
//! codec between tabular cells and property payloads. Every boundary call
//! is a sequential blocking round-trip with fail-fast error semantics; the
//! codec itself never fails (bad values degrade to omitted properties).

pub mod client;
pub mod constants;
pub mod error;
pub mod pages;
pub mod properties;
pub mod schema;

pub use client::NotionClient;
pub use error::ApiError;
pub use pages::{QueryPage, pages_to_table, query_pages, upload_rows};
pub use properties::{decode, encode};
pub use schema::{ColumnSchema, PropertyKind, fetch_schema};
