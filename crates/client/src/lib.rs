//! Typed client for the SafeWatch REST backend.
//!
//! One method per UI action and one HTTP call per method. Every call returns
//! the parsed payload or an [`ApiError`] from the shared error contract.

pub mod client;
pub mod error;
pub mod resources;
pub mod upload;

pub use client::{ApiSession, BackendClient, Blob, Paged};
pub use error::{ApiError, ApiResult};
pub use resources::auth::{AuthGrant, Credentials};
