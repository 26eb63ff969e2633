// src/locale.rs
// Owner of the current display language. Views subscribe explicitly and drop
// their subscription on teardown; there is no process-wide event bus.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::GuardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

pub const DEFAULT_LANGUAGE: &str = "en";

pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", native_name: "English" },
    Language { code: "hi", name: "Hindi", native_name: "हिंदी" },
    Language { code: "bn", name: "Bengali", native_name: "বাংলা" },
    Language { code: "te", name: "Telugu", native_name: "తెలుగు" },
    Language { code: "mr", name: "Marathi", native_name: "मराठी" },
    Language { code: "ta", name: "Tamil", native_name: "தமிழ்" },
    Language { code: "gu", name: "Gujarati", native_name: "ગુજરાતી" },
    Language { code: "kn", name: "Kannada", native_name: "ಕನ್ನಡ" },
    Language { code: "ml", name: "Malayalam", native_name: "മലയാളം" },
    Language { code: "pa", name: "Punjabi", native_name: "ਪੰਜਾਬੀ" },
    Language { code: "or", name: "Odia", native_name: "ଓଡ଼ିଆ" },
    Language { code: "as", name: "Assamese", native_name: "অসমীয়া" },
];

pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleChanged {
    pub previous: &'static Language,
    pub current: &'static Language,
}

pub type SubscriptionId = u64;

/// Handed to a subscriber. Dropping the receiver is enough to be pruned on the
/// next change; `LocaleStore::unsubscribe` removes it immediately.
#[derive(Debug)]
pub struct LocaleSubscription {
    pub id: SubscriptionId,
    pub receiver: mpsc::UnboundedReceiver<LocaleChanged>,
}

#[derive(Debug)]
pub struct LocaleStore {
    current: &'static Language,
    subscribers: Vec<(SubscriptionId, mpsc::UnboundedSender<LocaleChanged>)>,
    next_id: SubscriptionId,
}

impl Default for LocaleStore {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl LocaleStore {
    /// Unknown codes fall back to English.
    pub fn new(initial_code: &str) -> Self {
        let current = match find_language(initial_code) {
            Some(language) => language,
            None => {
                warn!(
                    "Unknown language code '{}' in configuration, falling back to '{}'",
                    initial_code, DEFAULT_LANGUAGE
                );
                &LANGUAGES[0]
            }
        };
        Self {
            current,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn current(&self) -> &'static Language {
        self.current
    }

    pub fn languages(&self) -> &'static [Language] {
        LANGUAGES
    }

    /// Setting the already-current language publishes nothing.
    pub fn set(&mut self, code: &str) -> Result<(), GuardError> {
        let next = find_language(code).ok_or_else(|| GuardError::UnknownLocale(code.to_string()))?;
        if next.code == self.current.code {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.current, next);
        info!("Display language changed: {} -> {}", previous.code, next.code);
        self.publish(LocaleChanged {
            previous,
            current: next,
        });
        Ok(())
    }

    /// Moves to the next supported language, wrapping around.
    pub fn cycle_next(&mut self) -> &'static Language {
        let index = LANGUAGES
            .iter()
            .position(|l| l.code == self.current.code)
            .unwrap_or(0);
        let next = &LANGUAGES[(index + 1) % LANGUAGES.len()];
        // `next` is always a known code.
        let _ = self.set(next.code);
        self.current
    }

    pub fn subscribe(&mut self) -> LocaleSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, tx));
        debug!("Locale subscriber {} registered", id);
        LocaleSubscription { id, receiver: rx }
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self, event: LocaleChanged) {
        self.subscribers.retain(|(id, tx)| {
            let delivered = tx.send(event).is_ok();
            if !delivered {
                debug!("Pruning closed locale subscriber {}", id);
            }
            delivered
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_languages_are_supported() {
        assert_eq!(LANGUAGES.len(), 12);
        assert_eq!(find_language("ta").map(|l| l.native_name), Some("தமிழ்"));
    }

    #[test]
    fn unknown_initial_code_falls_back_to_english() {
        let store = LocaleStore::new("xx");
        assert_eq!(store.current().code, "en");
    }

    #[test]
    fn set_publishes_previous_and_current() {
        let mut store = LocaleStore::new("en");
        let mut sub = store.subscribe();
        store.set("hi").unwrap();
        let event = sub.receiver.try_recv().unwrap();
        assert_eq!(event.previous.code, "en");
        assert_eq!(event.current.code, "hi");
    }

    #[test]
    fn setting_the_current_language_is_silent() {
        let mut store = LocaleStore::new("bn");
        let mut sub = store.subscribe();
        store.set("bn").unwrap();
        assert!(sub.receiver.try_recv().is_err());
    }

    #[test]
    fn unknown_code_is_an_error_and_keeps_the_current_language() {
        let mut store = LocaleStore::new("te");
        assert!(matches!(store.set("zz"), Err(GuardError::UnknownLocale(code)) if code == "zz"));
        assert_eq!(store.current().code, "te");
    }

    #[test]
    fn unsubscribed_receivers_get_nothing() {
        let mut store = LocaleStore::default();
        let mut kept = store.subscribe();
        let mut dropped = store.subscribe();
        assert!(store.unsubscribe(dropped.id));
        assert!(!store.unsubscribe(dropped.id));
        store.set("ml").unwrap();
        assert!(kept.receiver.try_recv().is_ok());
        assert!(dropped.receiver.try_recv().is_err());
    }

    #[test]
    fn closed_receivers_are_pruned_on_publish() {
        let mut store = LocaleStore::default();
        let sub = store.subscribe();
        let _other = store.subscribe();
        drop(sub);
        assert_eq!(store.subscriber_count(), 2);
        store.set("pa").unwrap();
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn cycling_wraps_after_the_last_language() {
        let mut store = LocaleStore::new("as");
        assert_eq!(store.cycle_next().code, "en");
        assert_eq!(store.cycle_next().code, "hi");
    }
}
