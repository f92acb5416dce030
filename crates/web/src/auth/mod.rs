//! Session tokens and sign-in providers.
//!
//! - [`session`] -- signed session tokens carried in an HttpOnly cookie.
//! - [`oauth`] -- Google authorization-code sign-in.

pub mod oauth;
pub mod session;
