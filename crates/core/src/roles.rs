//! Well-known role names and the [`Role`] enum.
//!
//! Role strings must match the values issued by the backend in user records
//! and session tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_SAFETY_OFFICER: &str = "safety_officer";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_EMPLOYEE, ROLE_MANAGER, ROLE_SAFETY_OFFICER, ROLE_ADMIN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Manager,
    SafetyOfficer,
    Admin,
}

/// Roles that supervise other people's reports.
pub const SUPERVISOR_ROLES: &[Role] = &[Role::Manager, Role::SafetyOfficer, Role::Admin];

/// Roles that run investigations.
pub const SAFETY_ROLES: &[Role] = &[Role::SafetyOfficer, Role::Admin];

/// Admin only.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

impl Role {
    pub const ALL: [Role; 4] = [Role::Employee, Role::Manager, Role::SafetyOfficer, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => ROLE_EMPLOYEE,
            Role::Manager => ROLE_MANAGER,
            Role::SafetyOfficer => ROLE_SAFETY_OFFICER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Display label used in tables and badges.
    pub fn label(self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::SafetyOfficer => "Safety Officer",
            Role::Admin => "Administrator",
        }
    }

    pub fn is_supervisor(self) -> bool {
        SUPERVISOR_ROLES.contains(&self)
    }

    /// Landing page after sign-in.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Employee => "/incidents/my",
            _ => "/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_EMPLOYEE => Ok(Role::Employee),
            ROLE_MANAGER => Ok(Role::Manager),
            ROLE_SAFETY_OFFICER => Ok(Role::SafetyOfficer),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {VALID_ROLES:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip() {
        for name in VALID_ROLES {
            let role: Role = name.parse().expect("known role should parse");
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn employees_land_on_their_own_incidents() {
        assert_eq!(Role::Employee.home_path(), "/incidents/my");
        assert_eq!(Role::Manager.home_path(), "/dashboard");
    }
}
