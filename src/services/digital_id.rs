// src/services/digital_id.rs
// Simulated blockchain-backed identity issuance for a registered tourist.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::Tourist;
use crate::errors::GuardError;
use crate::task::{spawn_staged, TaskHandle};

pub const TASK_NAME: &str = "digital-id";

pub const ISSUANCE_STEPS: [&str; 5] = [
    "Data Hashing",
    "Validation",
    "Blockchain Recording",
    "Network Confirmation",
    "ID Generated",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityRequest {
    pub name: String,
    pub nationality: String,
    pub document_type: String,
    pub document_number: String,
}

impl From<&Tourist> for IdentityRequest {
    fn from(tourist: &Tourist) -> Self {
        Self {
            name: tourist.name.clone(),
            nationality: tourist.nationality.clone(),
            document_type: tourist.document_type.clone(),
            document_number: tourist.document_number.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitalId {
    pub digital_id: String,
    pub blockchain_hash: String,
    pub issued_at: DateTime<Utc>,
}

pub fn validate(request: &IdentityRequest) -> Result<(), GuardError> {
    if request.name.trim().is_empty() {
        return Err(GuardError::task_input(TASK_NAME, "tourist name is blank"));
    }
    if request.document_number.trim().is_empty() {
        return Err(GuardError::task_input(TASK_NAME, "document number is blank"));
    }
    Ok(())
}

/// The work performed once every issuance step has elapsed.
pub fn issue(request: &IdentityRequest, issued_at: DateTime<Utc>) -> Result<DigitalId, GuardError> {
    validate(request)?;
    let entropy = Uuid::new_v4();
    let serial = entropy.as_u128() % 1_000_000;
    Ok(DigitalId {
        digital_id: format!("TG-{}-{:06}", issued_at.year(), serial),
        blockchain_hash: format!("0x{}", Uuid::new_v4().simple()),
        issued_at,
    })
}

pub fn spawn_issuance(request: IdentityRequest, step_delay: Duration) -> TaskHandle<DigitalId> {
    let steps = ISSUANCE_STEPS.iter().map(|s| s.to_string()).collect();
    spawn_staged(
        format!("{} for {}", TASK_NAME, request.name),
        steps,
        step_delay,
        move || issue(&request, Utc::now()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed;
    use crate::task::TaskState;
    use chrono::TimeZone;

    fn request() -> IdentityRequest {
        IdentityRequest::from(&seed::tourists(Utc::now())[0])
    }

    #[test]
    fn issued_ids_follow_the_registry_format() {
        let at = Utc.with_ymd_and_hms(2025, 1, 11, 10, 0, 0).unwrap();
        let id = issue(&request(), at).unwrap();
        assert!(id.digital_id.starts_with("TG-2025-"));
        assert_eq!(id.digital_id.len(), "TG-2025-".len() + 6);
        assert!(id.blockchain_hash.starts_with("0x"));
        assert_eq!(id.blockchain_hash.len(), 34);
        assert!(id.blockchain_hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn blank_document_number_fails_validation() {
        let mut req = request();
        req.document_number = "  ".to_string();
        assert!(matches!(issue(&req, Utc::now()), Err(GuardError::TaskInput { .. })));
    }

    #[tokio::test]
    async fn issuance_task_walks_all_five_steps() {
        let handle = spawn_issuance(request(), Duration::from_millis(1));
        assert_eq!(handle.state().progress().map(|p| p.total_steps), Some(5));
        match handle.wait().await {
            TaskState::Succeeded(id) => assert!(id.digital_id.starts_with("TG-")),
            other => panic!("expected an issued id, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn issuance_task_fails_on_blank_name() {
        let mut req = request();
        req.name.clear();
        let handle = spawn_issuance(req, Duration::from_millis(1));
        assert!(matches!(handle.wait().await, TaskState::Failed(_)));
    }
}
