//! Users, departments and temporary employees managed from the admin pages.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::full_name;
use crate::error::{CoreError, FieldErrors};
use crate::roles::Role;
use crate::search::SelectOption;
use crate::types::{Date, RecordId, Timestamp, UserRef};
use crate::validation::{not_blank, validate_date_range};

/// Employee profile linked to a user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub department_id: Option<RecordId>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub employee: Option<EmployeeProfile>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Full name when a profile exists, the email otherwise.
    pub fn display_name(&self) -> String {
        match &self.employee {
            Some(p) => {
                let name = full_name(&p.first_name, &p.last_name);
                if name.is_empty() {
                    self.email.clone()
                } else {
                    name
                }
            }
            None => self.email.clone(),
        }
    }

    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id.clone(),
            name: Some(self.display_name()),
            email: Some(self.email.clone()),
        }
    }

    /// Entry for assignee dropdowns.
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(&self.id, self.display_name()).with_hint(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(email(message = "Email address is invalid"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
    pub role: Role,
    #[validate(length(min = 1, max = 100, message = "First name is required"), custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"), custom(function = "not_blank"))]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Position must be at most 100 characters"))]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 30, message = "Phone must be at most 30 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Email address is invalid"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UpdateUser {
    /// Admins may not demote or deactivate themselves; that would lock the
    /// last admin out of the admin pages.
    pub fn check_self_edit(&self, editor_id: &str, target_id: &str) -> Result<(), CoreError> {
        if editor_id != target_id {
            return Ok(());
        }
        let mut errors = FieldErrors::new();
        if self.role.is_some_and(|r| r != Role::Admin) {
            errors.add("role", "You cannot change your own role");
        }
        if self.is_active == Some(false) {
            errors.add("isActive", "You cannot deactivate your own account");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub manager: Option<UserRef>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Department {
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(&self.id, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"), custom(function = "not_blank"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryEmployee {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    pub valid_from: Date,
    pub valid_until: Date,
}

impl TemporaryEmployee {
    pub fn is_current(&self, today: Date) -> bool {
        self.valid_from <= today && today <= self.valid_until
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryEmployeeForm {
    #[validate(length(min = 1, max = 100, message = "First name is required"), custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"), custom(function = "not_blank"))]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200, message = "Company must be at most 200 characters"))]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Contact must be at most 100 characters"))]
    pub contact: Option<String>,
    pub valid_from: Date,
    pub valid_until: Date,
}

impl TemporaryEmployeeForm {
    /// Field validation plus the ordered validity period.
    pub fn check(&self) -> Result<(), CoreError> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(&e),
        };
        if let Err(e) = validate_date_range(self.valid_from, self.valid_until) {
            let message = e.message.map(|m| m.to_string()).unwrap_or_default();
            errors.add("validUntil", message);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
