//! User-submitted disaster reports.
//!
//! Reports arrive from the mobile/web clients with a geolocation and an
//! AI-derived severity; the mapping pipeline consumes them only as
//! geometry + severity input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::geometry::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

/// A single user report: where, how bad, and what was uploaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisasterReport {
    pub id: Uuid,
    pub user: String,
    /// `[lon, lat]` of the upload.
    pub location: Position,
    pub severity: Severity,
    pub description: String,
    /// Reference to the uploaded image/audio file; storage is external.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_ref: Option<String>,
    pub reported_at: DateTime<Utc>,
}

impl DisasterReport {
    pub fn new(
        user: impl Into<String>,
        location: Position,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
            location,
            severity,
            description: description.into(),
            file_ref: None,
            reported_at: Utc::now(),
        }
    }

    pub fn with_file_ref(mut self, file_ref: impl Into<String>) -> Self {
        self.file_ref = Some(file_ref.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }

    #[test]
    fn file_ref_is_omitted_when_absent() {
        let report =
            DisasterReport::new("user-1", [106.84, -6.21], Severity::Moderate, "street flooding");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("file_ref").is_none());
    }
}
