//! Disaster report storage.
//!
//! The pipeline only needs geometry + severity back out of a report, so the
//! store is a small port with an in-memory implementation. `RwLock::unwrap()`
//! is intentional: poisoning means another thread panicked while holding the
//! lock, which is unrecoverable.

use std::sync::RwLock;

use async_trait::async_trait;
use floodwatch_core::models::DisasterReport;

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn add(&self, report: DisasterReport);
    async fn list(&self) -> Vec<DisasterReport>;
}

/// In-memory implementation of ReportStore
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: RwLock<Vec<DisasterReport>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn add(&self, report: DisasterReport) {
        self.reports.write().unwrap().push(report);
    }

    async fn list(&self) -> Vec<DisasterReport> {
        self.reports.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floodwatch_core::models::Severity;

    #[tokio::test]
    async fn stored_reports_come_back_in_order() {
        let store = MemoryReportStore::new();
        store
            .add(DisasterReport::new("a", [106.8, -6.2], Severity::High, "river overflow"))
            .await;
        store
            .add(DisasterReport::new("b", [106.9, -6.3], Severity::Low, "standing water"))
            .await;

        let reports = store.list().await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].user, "a");
        assert_eq!(reports[1].severity, Severity::Low);
    }
}
