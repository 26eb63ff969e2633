// src/domain/zone.rs
// Geo-fence zones. Geometry is descriptive only; no containment checks happen here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::listing::{FieldKind, FieldSchema, FieldValue, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneShape {
    Polygon,
    Circle,
    Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertMode {
    Immediate,
    Delayed,
    Periodic,
}

impl ZoneShape {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneShape::Polygon => "polygon",
            ZoneShape::Circle => "circle",
            ZoneShape::Rectangle => "rectangle",
        }
    }
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

impl AlertMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertMode::Immediate => "immediate",
            AlertMode::Delayed => "delayed",
            AlertMode::Periodic => "periodic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub shape: ZoneShape,
    pub risk_level: RiskLevel,
    pub alert_type: AlertMode,
    pub capacity: u32,
    pub is_active: bool,
    pub created_at: NaiveDate,
    pub tourist_count: u32,
}

const ZONE_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("name", "Zone", FieldKind::Text).searchable().sortable(),
    FieldSchema::new("shape", "Shape", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("risk_level", "Risk", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("alert_type", "Alert", FieldKind::Enum).filterable().sortable(),
    FieldSchema::new("capacity", "Capacity", FieldKind::Number).filterable().sortable(),
    FieldSchema::new("tourist_count", "Tourists", FieldKind::Number).filterable().sortable(),
    FieldSchema::new("is_active", "Active", FieldKind::Flag).filterable().sortable(),
    FieldSchema::new("created_at", "Created", FieldKind::Date).sortable(),
];

impl Record for Zone {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn schema() -> &'static [FieldSchema] {
        ZONE_FIELDS
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "id" => FieldValue::text(&self.id),
            "name" => FieldValue::text(&self.name),
            "shape" => FieldValue::text(self.shape.as_str()),
            "risk_level" => FieldValue::text(self.risk_level.as_str()),
            "alert_type" => FieldValue::text(self.alert_type.as_str()),
            "capacity" => FieldValue::Number(f64::from(self.capacity)),
            "tourist_count" => FieldValue::Number(f64::from(self.tourist_count)),
            "is_active" => FieldValue::Flag(self.is_active),
            "created_at" => FieldValue::Date(self.created_at.and_hms_opt(0, 0, 0)?.and_utc()),
            _ => return None,
        };
        Some(value)
    }
}
