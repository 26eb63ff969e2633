use chrono::Local;
use tokio::sync::mpsc;
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;

use crate::tui::UILogEntry;

// Pulls the formatted message out of an event; other fields are appended as key=value.
struct LogEntryVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl LogEntryVisitor {
    fn new() -> Self {
        Self {
            message: None,
            fields: Vec::new(),
        }
    }

    fn into_message(self) -> Option<String> {
        match (self.message, self.fields.is_empty()) {
            (Some(message), true) => Some(message),
            (Some(message), false) => Some(format!("{} {}", message, self.fields.join(" "))),
            (None, false) => Some(self.fields.join(" ")),
            (None, true) => None,
        }
    }
}

impl tracing::field::Visit for LogEntryVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

/// Forwards every event to the TUI's log view.
pub struct TuiLogCollectorLayer {
    sender: mpsc::UnboundedSender<UILogEntry>,
}

impl TuiLogCollectorLayer {
    pub fn new(sender: mpsc::UnboundedSender<UILogEntry>) -> Self {
        Self { sender }
    }
}

impl<S: Subscriber> Layer<S> for TuiLogCollectorLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = LogEntryVisitor::new();
        event.record(&mut visitor);

        if let Some(message) = visitor.into_message() {
            let log_entry = UILogEntry {
                timestamp: Local::now().format("%H:%M:%S").to_string(),
                level: *meta.level(),
                target: meta.target().to_string(),
                message,
            };
            // The receiver is gone once the TUI has exited; nothing left to show it.
            let _ = self.sender.send(log_entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn events_reach_the_channel_with_their_fields() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscriber = tracing_subscriber::registry().with(TuiLogCollectorLayer::new(tx));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(dataset = "tourists", "Page clamped");
        });
        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, Level::WARN);
        assert_eq!(entry.message, "Page clamped dataset=tourists");
    }
}
