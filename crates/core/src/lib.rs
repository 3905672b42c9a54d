//! Domain model for the Devmart project marketplace client.
//!
//! Pure types and logic shared by the API client and the CLI: catalog
//! projects, request lifecycle (status machine plus payment ledger
//! derivation), and the in-memory form drafts behind project authoring
//! and request submission. No IO lives here.

pub mod draft;
pub mod error;
pub mod payment;
pub mod project;
pub mod request;
pub mod types;
pub mod user;

pub use error::CoreError;
