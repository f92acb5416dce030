//! Domain types and pure logic for the SafeWatch dashboard.
//!
//! Nothing here performs I/O: the client crate talks to the backend and the
//! web crate serves pages, both built on these types.

pub mod access;
pub mod attachments;
pub mod corrective_action;
pub mod display;
pub mod error;
pub mod hazard;
pub mod incident;
pub mod investigation;
pub mod notification;
pub mod pagination;
pub mod people;
pub mod report;
pub mod roles;
pub mod search;
pub mod types;
pub mod validation;
pub mod vpc;
