//! Page access policy and the per-request gate decision.
//!
//! A page load starts unchecked and ends in exactly one [`GateOutcome`]:
//! render, redirect to login, redirect to `/unauthorized`, or redirect to a
//! role-appropriate alternate view. There is no retry path.

use crate::roles::{Role, ADMIN_ROLES, SAFETY_ROLES, SUPERVISOR_ROLES};

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any signed-in user.
    SignedIn,
    /// Only the listed roles.
    Roles(&'static [Role]),
}

/// Where a signed-in user without the required role is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    Unauthorized,
    Alternate(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    pub access: Access,
    pub denied: Denied,
}

impl PagePolicy {
    pub const SIGNED_IN: PagePolicy = PagePolicy {
        access: Access::SignedIn,
        denied: Denied::Unauthorized,
    };

    pub const ADMIN: PagePolicy = PagePolicy::roles(ADMIN_ROLES);

    pub const SAFETY: PagePolicy = PagePolicy::roles(SAFETY_ROLES);

    pub const SUPERVISOR: PagePolicy = PagePolicy::roles(SUPERVISOR_ROLES);

    pub const fn roles(roles: &'static [Role]) -> Self {
        PagePolicy {
            access: Access::Roles(roles),
            denied: Denied::Unauthorized,
        }
    }

    /// Supervisor page whose non-supervisor visitors get their own view.
    pub const fn supervisor_or(alternate: &'static str) -> Self {
        PagePolicy {
            access: Access::Roles(SUPERVISOR_ROLES),
            denied: Denied::Alternate(alternate),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        match self.access {
            Access::SignedIn => true,
            Access::Roles(roles) => roles.contains(&role),
        }
    }
}

/// The parts of a session the gate looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub role: Role,
    /// Expiry as a UTC Unix timestamp.
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Render,
    Login { callback_url: String },
    Unauthorized,
    Alternate(&'static str),
}

impl GateOutcome {
    pub fn is_render(&self) -> bool {
        matches!(self, GateOutcome::Render)
    }
}

/// Decide what happens to a request for `path` under `policy`.
///
/// `now` is a UTC Unix timestamp; sessions expiring at or before it count as
/// absent.
pub fn evaluate(
    session: Option<SessionStatus>,
    now: i64,
    path: &str,
    policy: &PagePolicy,
) -> GateOutcome {
    let Some(session) = session.filter(|s| s.expires_at > now) else {
        return GateOutcome::Login {
            callback_url: path.to_string(),
        };
    };

    if policy.allows(session.role) {
        return GateOutcome::Render;
    }

    match policy.denied {
        Denied::Unauthorized => GateOutcome::Unauthorized,
        Denied::Alternate(alternate) if alternate != path => GateOutcome::Alternate(alternate),
        Denied::Alternate(_) => GateOutcome::Unauthorized,
    }
}

/// Pick the post-login destination.
///
/// Only same-origin relative paths are honoured; anything else (absolute
/// URLs, protocol-relative `//host` values, backslash tricks, the login page
/// itself) falls back to the role's home page.
pub fn post_login_destination(callback_url: Option<&str>, role: Role) -> String {
    match callback_url {
        Some(url) if is_local_path(url) && !is_login_path(url) => url.to_string(),
        _ => role.home_path().to_string(),
    }
}

fn is_local_path(url: &str) -> bool {
    url.starts_with('/')
        && !url.starts_with("//")
        && !url.contains('\\')
        && !url.chars().any(char::is_control)
}

fn is_login_path(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path == LOGIN_PATH || path.starts_with("/login/")
}
