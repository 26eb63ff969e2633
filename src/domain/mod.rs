// src/domain/mod.rs
// Records of the five administrative registries and their seed data.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::GuardError;
use crate::listing::{FieldSchema, Record, SortSpec};

pub mod audit_log;
pub mod filter_expr;
pub mod incident;
pub mod seed;
pub mod tourist;
pub mod user;
pub mod zone;

pub use audit_log::AuditLogEntry;
pub use filter_expr::{parse_filter_expression, CriterionOp};
pub use incident::{Incident, IncidentKind, IncidentStatus, Severity};
pub use tourist::{Tourist, TouristStatus};
pub use user::OperatorAccount;
pub use zone::{RiskLevel, Zone};

/// Names a registry from the command line or the TUI tab bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    #[default]
    Tourists,
    Zones,
    Incidents,
    AuditLogs,
    Users,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::Tourists,
        Dataset::Zones,
        Dataset::Incidents,
        Dataset::AuditLogs,
        Dataset::Users,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dataset::Tourists => "tourists",
            Dataset::Zones => "zones",
            Dataset::Incidents => "incidents",
            Dataset::AuditLogs => "audit_logs",
            Dataset::Users => "users",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dataset::Tourists => "Tourists",
            Dataset::Zones => "Zones",
            Dataset::Incidents => "Incidents",
            Dataset::AuditLogs => "Audit Logs",
            Dataset::Users => "Users",
        }
    }

    pub fn schema(self) -> &'static [FieldSchema] {
        match self {
            Dataset::Tourists => Tourist::schema(),
            Dataset::Zones => Zone::schema(),
            Dataset::Incidents => Incident::schema(),
            Dataset::AuditLogs => AuditLogEntry::schema(),
            Dataset::Users => OperatorAccount::schema(),
        }
    }

    /// Ordering a freshly opened view starts with.
    pub fn default_sort(self) -> Option<SortSpec> {
        match self {
            Dataset::Tourists => Some(SortSpec::descending("last_check_in")),
            Dataset::Incidents => Some(SortSpec::descending("timestamp")),
            Dataset::Zones | Dataset::AuditLogs | Dataset::Users => None,
        }
    }

    /// Looks up a declared field, failing with the dataset's name for context.
    pub fn field(self, name: &str) -> Result<&'static FieldSchema, GuardError> {
        self.schema()
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| GuardError::UnknownField {
                dataset: self.as_str().to_string(),
                field: name.to_string(),
            })
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Dataset::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| GuardError::UnknownDataset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasets_parse_from_cli_spellings() {
        assert_eq!("audit-logs".parse::<Dataset>().ok(), Some(Dataset::AuditLogs));
        assert_eq!("Tourists".parse::<Dataset>().ok(), Some(Dataset::Tourists));
        assert!(matches!(
            "vehicles".parse::<Dataset>(),
            Err(GuardError::UnknownDataset(_))
        ));
    }

    #[test]
    fn unknown_fields_are_reported_with_their_dataset() {
        assert!(Dataset::Zones.field("risk_level").is_ok());
        match Dataset::Zones.field("altitude") {
            Err(GuardError::UnknownField { dataset, field }) => {
                assert_eq!(dataset, "zones");
                assert_eq!(field, "altitude");
            }
            other => panic!("expected UnknownField, got {:?}", other.map(|f| f.name)),
        }
    }
}
