// src/services/bulk_action.rs
// Notifications sent to the tourists picked in the registry's selection set.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::time::Duration;

use crate::domain::Tourist;
use crate::errors::GuardError;
use crate::task::{spawn_staged, TaskHandle};

pub const TASK_NAME: &str = "bulk-action";

pub const DISPATCH_STEPS: [&str; 2] = ["Preparing Recipients", "Dispatching"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BulkActionKind {
    Message,
    Alert,
    Emergency,
}

impl BulkActionKind {
    pub fn title(self) -> &'static str {
        match self {
            BulkActionKind::Message => "Send Message",
            BulkActionKind::Alert => "Send Alert",
            BulkActionKind::Emergency => "Emergency Broadcast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    #[default]
    General,
    Safety,
    Weather,
    Security,
    Evacuation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkActionRequest {
    pub kind: BulkActionKind,
    pub tourist_ids: Vec<u32>,
    pub message: String,
    pub alert_type: AlertKind,
    pub priority: AlertPriority,
}

impl BulkActionRequest {
    pub fn new(kind: BulkActionKind, tourist_ids: Vec<u32>, message: impl Into<String>) -> Self {
        Self {
            kind,
            tourist_ids,
            message: message.into(),
            alert_type: AlertKind::default(),
            priority: AlertPriority::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub tourist_id: u32,
    pub name: Option<String>,
    pub delivered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkActionReceipt {
    pub kind: BulkActionKind,
    pub delivered: usize,
    pub recipients: Vec<Recipient>,
    pub dispatched_at: DateTime<Utc>,
}

/// Checks made before any task is spawned.
pub fn validate(request: &BulkActionRequest) -> Result<(), GuardError> {
    if request.tourist_ids.is_empty() {
        return Err(GuardError::task_input(TASK_NAME, "no tourists selected"));
    }
    if request.kind == BulkActionKind::Message && request.message.trim().is_empty() {
        return Err(GuardError::task_input(TASK_NAME, "message text is blank"));
    }
    Ok(())
}

pub fn dispatch(request: &BulkActionRequest, registry: &[Tourist], dispatched_at: DateTime<Utc>) -> BulkActionReceipt {
    let recipients: Vec<Recipient> = request
        .tourist_ids
        .iter()
        .map(|id| {
            let tourist = registry.iter().find(|t| t.id == *id);
            Recipient {
                tourist_id: *id,
                name: tourist.map(|t| t.name.clone()),
                delivered: tourist.is_some(),
            }
        })
        .collect();
    BulkActionReceipt {
        kind: request.kind,
        delivered: recipients.iter().filter(|r| r.delivered).count(),
        recipients,
        dispatched_at,
    }
}

/// Validates, then spawns the dispatch against a snapshot of the registry.
pub fn spawn_dispatch(
    request: BulkActionRequest,
    registry: Vec<Tourist>,
    step_delay: Duration,
) -> Result<TaskHandle<BulkActionReceipt>, GuardError> {
    validate(&request)?;
    let steps = DISPATCH_STEPS.iter().map(|s| s.to_string()).collect();
    let name = format!("{} ({:?}, {} recipients)", TASK_NAME, request.kind, request.tourist_ids.len());
    Ok(spawn_staged(name, steps, step_delay, move || {
        Ok(dispatch(&request, &registry, Utc::now()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed;
    use crate::task::TaskState;

    #[test]
    fn empty_selection_is_rejected_before_spawning() {
        let request = BulkActionRequest::new(BulkActionKind::Alert, Vec::new(), "Heavy rain expected");
        assert!(validate(&request).is_err());
    }

    #[test]
    fn message_kind_requires_text() {
        let request = BulkActionRequest::new(BulkActionKind::Message, vec![1], "   ");
        assert!(validate(&request).is_err());
        let emergency = BulkActionRequest::new(BulkActionKind::Emergency, vec![1], "");
        assert!(validate(&emergency).is_ok());
    }

    #[test]
    fn missing_tourists_are_reported_undelivered() {
        let registry = seed::tourists(Utc::now());
        let request = BulkActionRequest::new(BulkActionKind::Message, vec![2, 404], "Stay hydrated");
        let receipt = dispatch(&request, &registry, Utc::now());
        assert_eq!(receipt.delivered, 1);
        assert_eq!(receipt.recipients[0].name.as_deref(), Some("Raj Patel"));
        assert!(!receipt.recipients[1].delivered);
    }

    #[tokio::test]
    async fn dispatch_task_produces_a_receipt() {
        let registry = seed::tourists(Utc::now());
        let request = BulkActionRequest::new(BulkActionKind::Alert, vec![3, 4], "Avoid the market area");
        let handle = spawn_dispatch(request, registry, Duration::from_millis(1)).unwrap();
        match handle.wait().await {
            TaskState::Succeeded(receipt) => {
                assert_eq!(receipt.kind, BulkActionKind::Alert);
                assert_eq!(receipt.delivered, 2);
            }
            other => panic!("expected a receipt, got {:?}", other),
        }
    }
}
