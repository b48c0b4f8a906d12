//! Command infrastructure for application handlers.
//!
//! Handlers accept a single `CommandMetadata` instead of loose
//! correlation and actor parameters, and copy it onto emitted events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StaffId;

/// Context carried through command processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Staff member executing the command. `None` for public self-service requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<StaffId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Where the command came from, e.g. "api" or "scheduler".
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    pub fn public() -> Self {
        Self {
            actor: None,
            correlation_id: None,
            source: None,
        }
    }

    pub fn staff(actor: StaffId) -> Self {
        Self {
            actor: Some(actor),
            ..Self::public()
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Actor label used in audit records.
    pub fn actor_label(&self) -> String {
        self.actor
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "public".to_string())
    }
}

#[cfg(test)]
impl CommandMetadata {
    pub fn test_fixture() -> Self {
        Self::staff(StaffId::new("test-staff").unwrap())
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_has_no_actor() {
        let metadata = CommandMetadata::public();
        assert!(metadata.actor.is_none());
        assert_eq!(metadata.actor_label(), "public");
    }

    #[test]
    fn staff_labels_with_id() {
        let metadata = CommandMetadata::staff(StaffId::new("staff-9").unwrap());
        assert_eq!(metadata.actor_label(), "staff-9");
    }

    #[test]
    fn correlation_id_returns_set_value() {
        let metadata = CommandMetadata::public().with_correlation_id("corr-1");
        assert_eq!(metadata.correlation_id(), "corr-1");
    }

    #[test]
    fn correlation_id_generates_if_missing() {
        assert!(!CommandMetadata::public().correlation_id().is_empty());
    }

    #[test]
    fn serialization_skips_none_fields() {
        let json = serde_json::to_string(&CommandMetadata::public()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn fixture_is_staff_sourced_from_tests() {
        let metadata = CommandMetadata::test_fixture();
        assert_eq!(metadata.source(), Some("test"));
        assert!(metadata.actor.is_some());
    }
}
