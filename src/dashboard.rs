//! Dashboard counters over the full lead list.

use serde::Serialize;

use crate::models::{Lead, LeadStatus};

/// Summary counters shown above the lead list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of leads
    pub total: usize,
    /// Leads with any status other than `NotCalled`
    pub calls_made: usize,
    /// Leads where someone picked up
    pub contacted: usize,
    /// `contacted / total` as a rounded percentage, 0 for an empty list
    pub contact_rate: u32,
    /// Leads in `NoAnswer`
    pub no_answer_count: usize,
    /// Leads with a scheduled call-back day
    pub reminders_count: usize,
    /// Leads in `MeetingSet`
    pub meetings_set_count: usize,
}

impl DashboardStats {
    /// Compute the counters for `leads`
    #[must_use]
    pub fn from_leads(leads: &[Lead]) -> Self {
        let count = |pred: &dyn Fn(&Lead) -> bool| leads.iter().filter(|l| pred(l)).count();

        let total = leads.len();
        let contacted = count(&|l| l.status.is_contacted());

        Self {
            total,
            calls_made: count(&|l| l.status.is_called()),
            contacted,
            contact_rate: contact_rate(contacted, total),
            no_answer_count: count(&|l| l.status == LeadStatus::NoAnswer),
            reminders_count: count(&|l| l.next_call_date.is_some()),
            meetings_set_count: count(&|l| l.status == LeadStatus::MeetingSet),
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn contact_rate(contacted: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (contacted as f64 / total as f64 * 100.0).round() as u32
}
