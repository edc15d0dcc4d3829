use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::double_option;

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Roles {
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "manager")]
    Manager,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
}

impl Roles {
    /// Parse a role filter value. The storefront's Spanish names are accepted
    /// alongside the stored ones.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "customer" | "cliente" => Some(Self::Customer),
            "employee" | "empleado" => Some(Self::Employee),
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Roles allowed into the admin panel.
    pub fn is_admin_level(&self) -> bool {
        matches!(self, Self::Manager | Self::Admin | Self::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub role: Roles,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used for admin-level user updates. Role and status have their own routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_name: Option<Option<String>>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
}

impl UpdateUser {
    pub fn problem(&self) -> Option<&'static str> {
        if self.first_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Some("First name must not be empty");
        }
        if self.email.as_deref().is_some_and(|e| !e.contains('@')) {
            return Some("Email is not valid");
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }

    pub fn apply(self, row: &mut ActiveModel) {
        if let Some(first_name) = self.first_name {
            row.first_name = Set(first_name);
        }
        if let Some(last_name) = self.last_name {
            row.last_name = Set(last_name);
        }
        if let Some(email) = self.email {
            row.email = Set(email.trim().to_lowercase());
        }
        if let Some(phone) = self.phone {
            row.phone = Set(phone);
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRole {
    pub role: Roles,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatus {
    pub active: bool,
}

/// A safe user representation for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role: Roles,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub last_login: Option<DateTimeUtc>,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone: m.phone,
            role: m.role,
            active: m.active,
            created_at: m.created_at,
            last_login: m.last_login,
        }
    }
}
