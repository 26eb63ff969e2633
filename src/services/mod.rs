// src/services/mod.rs
// Simulated back-end operations. Each one is plain synchronous work wrapped in
// a staged task so the UI can show progress and cancel.

pub mod bulk_action;
pub mod digital_id;
pub mod efir;

pub use bulk_action::{AlertKind, AlertPriority, BulkActionKind, BulkActionReceipt, BulkActionRequest};
pub use digital_id::{DigitalId, IdentityRequest};
pub use efir::{Efir, EfirPriority, EfirTemplate};
