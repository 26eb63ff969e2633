// src/domain/user.rs
// Operator accounts of the administration console, not tourists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{FieldKind, FieldSchema, FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorAccount {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub status: AccountStatus,
    pub last_login: DateTime<Utc>,
    pub permissions: Vec<String>,
}

const USER_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("name", "Name", FieldKind::Text).searchable().sortable(),
    FieldSchema::new("email", "Email", FieldKind::Text).searchable().sortable(),
    FieldSchema::new("role", "Role", FieldKind::Text)
        .filterable()
        .searchable()
        .sortable(),
    FieldSchema::new("department", "Department", FieldKind::Text)
        .searchable()
        .sortable(),
    FieldSchema::new("status", "Status", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("last_login", "Last Login", FieldKind::Date).sortable(),
];

impl Record for OperatorAccount {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn schema() -> &'static [FieldSchema] {
        USER_FIELDS
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "name" => FieldValue::text(&self.name),
            "email" => FieldValue::text(&self.email),
            "role" => FieldValue::text(&self.role),
            "department" => FieldValue::text(&self.department),
            "status" => FieldValue::text(self.status.as_str()),
            "last_login" => FieldValue::Date(self.last_login),
            "permissions" => FieldValue::text(self.permissions.join(", ")),
            _ => return None,
        };
        Some(value)
    }
}
