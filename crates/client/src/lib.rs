//! HTTP client SDK for the Devmart marketplace API.
//!
//! Everything network-facing lives here: the durable session store, the
//! API gateway (one configured [`reqwest`] client with bearer injection
//! and centralized 401 handling), typed endpoint wrappers, and the
//! payment flow controller that sequences the checkout handshake.

pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod flow;
pub mod gateway;
pub mod notify;
pub mod payments;
pub mod projects;
pub mod requests;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{ApiError, ApiGateway};
pub use session::SessionStore;
