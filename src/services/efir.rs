// src/services/efir.rs
// Electronic First Information Report generation for a logged incident.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::time::Duration;

use crate::domain::{Incident, IncidentKind, Severity};
use crate::errors::GuardError;
use crate::task::{spawn_staged, TaskHandle};

pub const TASK_NAME: &str = "e-fir";

pub const GENERATION_STEPS: [&str; 3] = ["Collecting Incident Details", "Applying Template", "Filing E-FIR"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EfirTemplate {
    #[default]
    Standard,
    MissingPerson,
    MedicalEmergency,
    Theft,
    Accident,
}

impl EfirTemplate {
    pub fn label(self) -> &'static str {
        match self {
            EfirTemplate::Standard => "Standard E-FIR Template",
            EfirTemplate::MissingPerson => "Missing Person Template",
            EfirTemplate::MedicalEmergency => "Medical Emergency Template",
            EfirTemplate::Theft => "Theft/Crime Template",
            EfirTemplate::Accident => "Accident Template",
        }
    }

    /// Template preselected for an incident of `kind`.
    pub fn for_incident(kind: IncidentKind) -> Self {
        match kind {
            IncidentKind::MissingPerson => EfirTemplate::MissingPerson,
            IncidentKind::MedicalEmergency => EfirTemplate::MedicalEmergency,
            IncidentKind::Theft => EfirTemplate::Theft,
            IncidentKind::Accident => EfirTemplate::Accident,
            IncidentKind::Harassment => EfirTemplate::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EfirPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl From<Severity> for EfirPriority {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => EfirPriority::Low,
            Severity::Medium => EfirPriority::Medium,
            Severity::High => EfirPriority::High,
            Severity::Critical => EfirPriority::Urgent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Efir {
    pub efir_number: String,
    pub incident_id: String,
    pub template: EfirTemplate,
    pub priority: EfirPriority,
    pub generated_at: DateTime<Utc>,
}

pub fn generate(
    incidents: &[Incident],
    incident_id: &str,
    template: EfirTemplate,
    priority: EfirPriority,
    generated_at: DateTime<Utc>,
) -> Result<Efir, GuardError> {
    let incident = incidents
        .iter()
        .find(|i| i.id == incident_id)
        .ok_or_else(|| GuardError::task_input(TASK_NAME, format!("unknown incident '{}'", incident_id)))?;
    Ok(Efir {
        efir_number: format!("EFIR-{}", generated_at.timestamp_millis()),
        incident_id: incident.id.clone(),
        template,
        priority,
        generated_at,
    })
}

/// `incidents` is a snapshot taken when the request is made.
pub fn spawn_generation(
    incidents: Vec<Incident>,
    incident_id: String,
    template: EfirTemplate,
    priority: EfirPriority,
    step_delay: Duration,
) -> TaskHandle<Efir> {
    let steps = GENERATION_STEPS.iter().map(|s| s.to_string()).collect();
    spawn_staged(
        format!("{} for {}", TASK_NAME, incident_id),
        steps,
        step_delay,
        move || generate(&incidents, &incident_id, template, priority, Utc::now()),
    )
}
