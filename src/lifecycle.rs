//! Lead lifecycle: status transitions and call scheduling.
//!
//! Every edit takes the current record and returns the replacement record;
//! the caller swaps it into the list. The two lifecycle invariants hold for
//! every record these functions return:
//!
//! - `NotCalled` has neither a last-call timestamp nor a next-call day.
//! - Only `CallBack` may carry a next-call day.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CrmError, Result};
use crate::models::{Lead, LeadStatus};
use crate::utils::days_from_today;
use crate::validation::InputValidator;

/// Move a lead to `status`, applying the call-tracking side effects.
pub fn change_status(lead: &Lead, status: LeadStatus, now: DateTime<Utc>) -> Result<Lead> {
    let mut updated = lead.clone();
    updated.status = status;

    if status == LeadStatus::NotCalled {
        updated.last_call_date = None;
        updated.next_call_date = None;
        return Ok(updated);
    }

    updated.last_call_date = Some(now);
    updated.next_call_date = if status == LeadStatus::CallBack {
        match lead.next_call_date {
            Some(day) => Some(day),
            None => Some(days_from_today(now, 1)?),
        }
    } else {
        None
    };

    Ok(updated)
}

/// Set or clear the call-back day without touching status or last-call time.
///
/// A day can only be set while the lead is in `CallBack`.
pub fn set_next_call_date(lead: &Lead, day: Option<NaiveDate>) -> Result<Lead> {
    if day.is_some() && lead.status != LeadStatus::CallBack {
        return Err(CrmError::InvalidTransition(format!(
            "Lead {} is {}, a call-back day can only be set in CallBack",
            lead.id, lead.status
        )));
    }

    let mut updated = lead.clone();
    updated.next_call_date = day;
    Ok(updated)
}

/// Schedule the call-back `days` days from today
pub fn schedule_in(lead: &Lead, days: u64, now: DateTime<Utc>) -> Result<Lead> {
    InputValidator::validate_offset_days(days)?;
    set_next_call_date(lead, Some(days_from_today(now, days)?))
}

/// Replace the notes text
pub fn set_notes(lead: &Lead, notes: &str) -> Result<Lead> {
    let notes = InputValidator::validate_notes(notes)?;
    let mut updated = lead.clone();
    updated.notes = notes;
    Ok(updated)
}

/// Drop all call progress, keeping notes
#[must_use]
pub fn reset_progress(lead: Lead) -> Lead {
    Lead {
        status: LeadStatus::NotCalled,
        last_call_date: None,
        next_call_date: None,
        ..lead
    }
}

/// Clear whichever date fields break the lifecycle invariants.
///
/// Status and notes are left alone; a valid record comes back unchanged.
#[must_use]
pub fn repair(lead: Lead) -> Lead {
    match lead.status {
        LeadStatus::NotCalled => reset_progress(lead),
        LeadStatus::CallBack => lead,
        _ => Lead {
            next_call_date: None,
            ..lead
        },
    }
}

/// True when `lead` satisfies both lifecycle invariants
#[must_use]
pub fn satisfies_invariants(lead: &Lead) -> bool {
    let not_called_is_clean = lead.status != LeadStatus::NotCalled
        || (lead.last_call_date.is_none() && lead.next_call_date.is_none());
    let only_callback_scheduled = lead.status == LeadStatus::CallBack || lead.next_call_date.is_none();
    not_called_is_clean && only_callback_scheduled
}
