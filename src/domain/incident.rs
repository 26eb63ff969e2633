// src/domain/incident.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{FieldKind, FieldSchema, FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    MissingPerson,
    MedicalEmergency,
    Theft,
    Accident,
    Harassment,
}

impl IncidentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentKind::MissingPerson => "missing_person",
            IncidentKind::MedicalEmergency => "medical_emergency",
            IncidentKind::Theft => "theft",
            IncidentKind::Accident => "accident",
            IncidentKind::Harassment => "harassment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IncidentKind::MissingPerson => "Missing Person",
            IncidentKind::MedicalEmergency => "Medical Emergency",
            IncidentKind::Theft => "Theft",
            IncidentKind::Accident => "Accident",
            IncidentKind::Harassment => "Harassment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Reported,
    Investigating,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Reported => "reported",
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub kind: IncidentKind,
    pub tourist_name: String,
    pub location: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub timestamp: DateTime<Utc>,
    pub priority_score: f64,
    pub response_time: Option<String>,
    pub description: String,
}

const INCIDENT_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("id", "Incident", FieldKind::Text).searchable().sortable(),
    FieldSchema::new("kind", "Type", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("tourist_name", "Tourist", FieldKind::Text).searchable().sortable(),
    FieldSchema::new("location", "Location", FieldKind::Text)
        .filterable()
        .searchable()
        .sortable(),
    FieldSchema::new("severity", "Severity", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("status", "Status", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("timestamp", "Reported", FieldKind::Date).sortable(),
    FieldSchema::new("priority_score", "Priority", FieldKind::Number).filterable().sortable(),
    FieldSchema::new("response_time", "Response", FieldKind::Text),
];

impl Record for Incident {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn schema() -> &'static [FieldSchema] {
        INCIDENT_FIELDS
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => FieldValue::text(&self.id),
            "kind" => FieldValue::text(self.kind.as_str()),
            "tourist_name" => FieldValue::text(&self.tourist_name),
            "location" => FieldValue::text(&self.location),
            "severity" => FieldValue::text(self.severity.as_str()),
            "status" => FieldValue::text(self.status.as_str()),
            "timestamp" => FieldValue::Date(self.timestamp),
            "priority_score" => FieldValue::Number(self.priority_score),
            "response_time" => FieldValue::text(self.response_time.as_deref()?),
            "description" => FieldValue::text(&self.description),
            _ => return None,
        };
        Some(value)
    }
}
