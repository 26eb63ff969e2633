// src/domain/audit_log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{FieldKind, FieldSchema, FieldValue, Record};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub action: String,
    pub target: String,
    /// info, warning, medium, high or critical
    pub severity: String,
    pub ip_address: String,
    pub details: Option<String>,
    /// success, pending, resolved or blocked
    pub status: String,
}

const AUDIT_LOG_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("timestamp", "Timestamp", FieldKind::Date).sortable(),
    FieldSchema::new("user", "User", FieldKind::Text)
        .filterable()
        .searchable()
        .sortable(),
    FieldSchema::new("action", "Action", FieldKind::Text)
        .filterable()
        .searchable()
        .sortable(),
    FieldSchema::new("target", "Target", FieldKind::Text).searchable(),
    FieldSchema::new("severity", "Severity", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("ip_address", "IP", FieldKind::Text).searchable(),
    FieldSchema::new("status", "Status", FieldKind::Enum).filterable().sortable(),
];

impl Record for AuditLogEntry {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn schema() -> &'static [FieldSchema] {
        AUDIT_LOG_FIELDS
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "timestamp" => FieldValue::Date(self.timestamp),
            "user" => FieldValue::text(&self.user),
            "action" => FieldValue::text(&self.action),
            "target" => FieldValue::text(&self.target),
            "severity" => FieldValue::text(&self.severity),
            "ip_address" => FieldValue::text(&self.ip_address),
            "details" => FieldValue::text(self.details.as_deref()?),
            "status" => FieldValue::text(&self.status),
            _ => return None,
        };
        Some(value)
    }
}
