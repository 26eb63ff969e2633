// src/domain/tourist.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{FieldKind, FieldSchema, FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouristStatus {
    Active,
    Inactive,
    Emergency,
    Missing,
}

impl TouristStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TouristStatus::Active => "active",
            TouristStatus::Inactive => "inactive",
            TouristStatus::Emergency => "emergency",
            TouristStatus::Missing => "missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tourist {
    pub id: u32,
    pub digital_id: String,
    pub name: String,
    pub nationality: String,
    pub document_type: String,
    pub document_number: String,
    pub current_location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub safety_score: f64,
    pub status: TouristStatus,
    pub last_check_in: DateTime<Utc>,
    pub registered_at: DateTime<Utc>,
    pub blockchain_hash: String,
}

const TOURIST_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("digital_id", "Digital ID", FieldKind::Text).searchable().sortable(),
    FieldSchema::new("name", "Name", FieldKind::Text).searchable().sortable(),
    FieldSchema::new("nationality", "Nationality", FieldKind::Text).filterable().sortable(),
    FieldSchema::new("document_type", "Document", FieldKind::Enum).filterable(),
    FieldSchema::new("document_number", "Doc No.", FieldKind::Text),
    FieldSchema::new("current_location", "Location", FieldKind::Text)
        .filterable()
        .searchable()
        .sortable(),
    FieldSchema::new("safety_score", "Safety", FieldKind::Number).filterable().sortable(),
    FieldSchema::new("status", "Status", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("last_check_in", "Last Check-in", FieldKind::Date).sortable(),
    FieldSchema::new("registered_at", "Registered", FieldKind::Date).sortable(),
];

impl Record for Tourist {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn schema() -> &'static [FieldSchema] {
        TOURIST_FIELDS
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "digital_id" => FieldValue::text(&self.digital_id),
            "name" => FieldValue::text(&self.name),
            "nationality" => FieldValue::text(&self.nationality),
            "document_type" => FieldValue::text(self.document_type.to_lowercase()),
            "document_number" => FieldValue::text(&self.document_number),
            "current_location" => FieldValue::text(&self.current_location),
            "latitude" => FieldValue::Number(self.latitude),
            "longitude" => FieldValue::Number(self.longitude),
            "safety_score" => FieldValue::Number(self.safety_score),
            "status" => FieldValue::text(self.status.as_str()),
            "last_check_in" => FieldValue::Date(self.last_check_in),
            "registered_at" => FieldValue::Date(self.registered_at),
            "blockchain_hash" => FieldValue::text(&self.blockchain_hash),
            _ => return None,
        };
        Some(value)
    }
}
