//! One module per backend resource; each adds its calls to
//! [`ApiSession`](crate::ApiSession) (or [`BackendClient`](crate::BackendClient)
//! for unauthenticated calls).

pub mod auth;
pub mod corrective_actions;
pub mod departments;
pub mod hazards;
pub mod incidents;
pub mod investigations;
pub mod notifications;
pub mod reports;
pub mod temporary_employees;
pub mod users;
pub mod vpcs;
