//! User identity model and role-based capability checks.
//!
//! Roles form a flat record with a role tag rather than an inheritance
//! hierarchy: manager-only fields are populated when the role is Manager or
//! Admin, and the admin title only when the role is Admin. The role is fixed
//! at creation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can only browse published activities
    Guest,
    /// Can view details and register for activities
    Member,
    /// Club officer: can create, edit, and delete activities
    Manager,
    /// Can audit activities and manage everything
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role may create and manage activities
    pub fn can_manage_activities(&self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "guest",
            UserRole::Member => "member",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            "manager" => UserRole::Manager,
            "member" => UserRole::Member,
            _ => UserRole::Guest,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub role: UserRole,
    /// Club position, present for Manager and Admin roles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_title: Option<String>,
    /// Date the officer joined the club, present for Manager and Admin roles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<NaiveDate>,
    /// Honorific for the administrator, present for the Admin role only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a club officer who can manage activities
    pub fn new_manager(
        name: String,
        email: String,
        password_hash: String,
        phone: String,
        position_title: String,
        join_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            phone,
            role: UserRole::Manager,
            position_title: Some(position_title),
            join_date: Some(join_date),
            admin_title: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the administrator, who carries a manager's fields plus a title
    pub fn new_admin(
        name: String,
        email: String,
        password_hash: String,
        phone: String,
        position_title: String,
        join_date: NaiveDate,
        admin_title: String,
    ) -> Self {
        let mut user = Self::new_manager(name, email, password_hash, phone, position_title, join_date);
        user.role = UserRole::Admin;
        user.admin_title = Some(admin_title);
        user
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if user may create and manage activities
    pub fn can_manage_activities(&self) -> bool {
        self.role.can_manage_activities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_can_manage_but_is_not_admin() {
        let user = User::new_manager(
            "Wang Xiaoming".into(),
            "manager1@diveclub.com".into(),
            "hash".into(),
            "0923456789".into(),
            "Events Lead".into(),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        );
        assert!(user.can_manage_activities());
        assert!(!user.is_admin());
        assert!(user.admin_title.is_none());
    }

    #[test]
    fn admin_carries_manager_fields_and_title() {
        let user = User::new_admin(
            "Admin".into(),
            "admin@diveclub.com".into(),
            "hash".into(),
            "0912345678".into(),
            "President".into(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            "President".into(),
        );
        assert!(user.is_admin());
        assert!(user.can_manage_activities());
        assert!(user.position_title.is_some());
        assert_eq!(user.admin_title.as_deref(), Some("President"));
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [UserRole::Guest, UserRole::Member, UserRole::Manager, UserRole::Admin] {
            assert_eq!(UserRole::from(role.as_str()), role);
        }
        assert_eq!(UserRole::from("something-else"), UserRole::Guest);
    }
}
