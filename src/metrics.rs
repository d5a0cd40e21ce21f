use metrics::counter;

use crate::models::{LeadStatus, OutputFormat};

/// Status transitions, labelled by target status
pub const STATUS_CHANGES_TOTAL: &str = "coldcall_status_changes_total";
/// Lead edits, labelled by kind (`status`, `schedule`, `notes`)
pub const LEAD_EDITS_TOTAL: &str = "coldcall_lead_edits_total";
/// Successful writes of the lead list
pub const STORAGE_WRITES_TOTAL: &str = "coldcall_storage_writes_total";
/// Failed reads or writes, labelled by operation
pub const STORAGE_FAILURES_TOTAL: &str = "coldcall_storage_failures_total";
/// Leads written by exports, labelled by format
pub const LEADS_EXPORTED_TOTAL: &str = "coldcall_leads_exported_total";

/// Metrics collection for a session.
///
/// Every event is forwarded to the `metrics` facade (a no-op until a recorder
/// is installed) and tallied locally for the end-of-session summary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetricsCollector {
    /// Status transitions recorded
    pub status_changes_total: u64,
    /// Edits of any kind recorded
    pub lead_edits_total: u64,
    /// Successful storage writes
    pub storage_writes_total: u64,
    /// Failed storage writes
    pub storage_failures_total: u64,
    /// Leads exported
    pub leads_exported_total: u64,
}

impl MetricsCollector {
    /// Record a status transition
    pub fn record_status_change(&mut self, status: LeadStatus) {
        counter!(STATUS_CHANGES_TOTAL, "status" => status.as_str()).increment(1);
        self.status_changes_total += 1;
        self.record_edit("status");
    }

    /// Record a lead edit
    pub fn record_edit(&mut self, kind: &'static str) {
        counter!(LEAD_EDITS_TOTAL, "kind" => kind).increment(1);
        self.lead_edits_total += 1;
    }

    /// Record the outcome of a write of the lead list
    pub fn record_storage_write(&mut self, success: bool) {
        if success {
            counter!(STORAGE_WRITES_TOTAL).increment(1);
            self.storage_writes_total += 1;
        } else {
            counter!(STORAGE_FAILURES_TOTAL, "op" => "write").increment(1);
            self.storage_failures_total += 1;
        }
    }

    /// Record an export
    pub fn record_export(&mut self, format: OutputFormat, count: usize) {
        let count = count as u64;
        counter!(LEADS_EXPORTED_TOTAL, "format" => format.extension()).increment(count);
        self.leads_exported_total += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_change_counts_as_edit() {
        let mut collector = MetricsCollector::default();
        collector.record_status_change(LeadStatus::CallBack);
        assert_eq!(collector.status_changes_total, 1);
        assert_eq!(collector.lead_edits_total, 1);
    }

    #[test]
    fn test_storage_writes_and_failures() {
        let mut collector = MetricsCollector::default();
        collector.record_storage_write(true);
        collector.record_storage_write(false);
        assert_eq!(collector.storage_writes_total, 1);
        assert_eq!(collector.storage_failures_total, 1);
    }
}
