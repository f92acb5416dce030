//! Session and page-access extractors.
//!
//! - [`session::SessionUser`] -- the signed-in user, from cookie or Bearer token.
//! - [`gate::Gate`] -- a session plus a role policy, rejected with a redirect.

pub mod gate;
pub mod session;
