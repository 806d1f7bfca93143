//! Module lifecycle notifications
//!
//! The activation store emits `Enabling`/`Enabled` and `Disabling`/`Disabled`
//! around every status change, and the repository emits `Deleted` after a
//! module is removed. Events go to an injected [`EventSink`].

use modkit_core::naming;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use tracing::info;

/// Lifecycle event kinds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModuleEventKind {
    Enabling,
    Enabled,
    Disabling,
    Disabled,
    Deleted,
}

impl ModuleEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabling => "enabling",
            Self::Enabled => "enabled",
            Self::Disabling => "disabling",
            Self::Disabled => "disabled",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ModuleEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle notification for one module
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleEvent {
    pub kind: ModuleEventKind,
    /// Module name as found in its manifest
    pub module: String,
}

impl ModuleEvent {
    pub fn new(kind: ModuleEventKind, module: impl Into<String>) -> Self {
        Self {
            kind,
            module: module.into(),
        }
    }

    /// Dotted event name, e.g. `modules.recipe.enabling`
    pub fn name(&self) -> String {
        format!("modules.{}.{}", naming::lower(&self.module), self.kind)
    }
}

impl fmt::Display for ModuleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Receiver of lifecycle notifications
pub trait EventSink: Send + Sync {
    fn dispatch(&self, event: &ModuleEvent);
}

/// Default sink: logs every event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn dispatch(&self, event: &ModuleEvent) {
        info!(module = %event.module, kind = %event.kind, "{}", event.name());
    }
}

/// Sink that keeps every event in memory, in dispatch order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ModuleEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<ModuleEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Dotted names of recorded events
    pub fn names(&self) -> Vec<String> {
        self.events().iter().map(ModuleEvent::name).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl EventSink for RecordingSink {
    fn dispatch(&self, event: &ModuleEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_name_uses_lower_name() {
        let event = ModuleEvent::new(ModuleEventKind::Enabling, "Recipe Name");
        assert_eq!(event.name(), "modules.recipe name.enabling");
        assert_eq!(event.to_string(), event.name());
    }

    #[test]
    fn test_serialization() {
        let event = ModuleEvent::new(ModuleEventKind::Disabled, "Blog");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""kind":"disabled""#));
        assert!(json.contains(r#""module":"Blog""#));

        let deserialized: ModuleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.dispatch(&ModuleEvent::new(ModuleEventKind::Enabling, "Blog"));
        sink.dispatch(&ModuleEvent::new(ModuleEventKind::Enabled, "Blog"));

        assert_eq!(
            sink.names(),
            vec!["modules.blog.enabling", "modules.blog.enabled"]
        );

        sink.clear();
        assert!(sink.events().is_empty());
    }
}
