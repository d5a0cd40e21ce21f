//! Application state engine.
//!
//! [`AppState`] holds the lead list and the current filter selections and is
//! updated only through [`Event`]s. [`LeadService`] owns the state together
//! with its repository: it reconciles stored data on startup and persists the
//! full list after every event that changes a lead.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::dashboard::DashboardStats;
use crate::error::{CrmError, Result};
use crate::lifecycle;
use crate::logging::OperationTimer;
use crate::metrics::MetricsCollector;
use crate::models::{Lead, LeadStatus, RawLead};
use crate::repository::LeadRepository;
use crate::transform::LeadTransformer;
use crate::validation::InputValidator;
use crate::view::{self, FilterState, SortKey};

/// What startup does with leads found in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPolicy {
    /// Reset every stored lead to `NotCalled` and clear its dates, keeping notes
    #[default]
    ResetProgress,
    /// Load stored leads with their progress, clearing only inconsistent dates
    KeepProgress,
}

impl StartupPolicy {
    /// Policy for the `session.reset_on_startup` setting
    #[must_use]
    pub const fn from_reset_flag(reset_on_startup: bool) -> Self {
        if reset_on_startup {
            Self::ResetProgress
        } else {
            Self::KeepProgress
        }
    }
}

/// A user action
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Record a call outcome
    ChangeStatus { id: String, status: LeadStatus },
    /// Set or clear the call-back day
    SetNextCallDate { id: String, day: Option<NaiveDate> },
    /// Schedule the call-back a number of days from today
    ScheduleIn { id: String, days: u64 },
    /// Replace a lead's notes
    SetNotes { id: String, notes: String },
    /// Set the search text
    Search(String),
    /// Select or deselect a city
    ToggleCity(String),
    /// Deselect every city
    ClearCities,
    /// Keep only one status, or all with `None`
    FilterStatus(Option<LeadStatus>),
    /// Keep only leads without a website
    WithoutWebsite(bool),
    /// Change the sort key
    SortBy(SortKey),
}

impl Event {
    fn edit_kind(&self) -> Option<&'static str> {
        match self {
            Self::ChangeStatus { .. } => Some("status"),
            Self::SetNextCallDate { .. } | Self::ScheduleIn { .. } => Some("schedule"),
            Self::SetNotes { .. } => Some("notes"),
            _ => None,
        }
    }
}

/// Lead list plus filter selections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Every lead, in storage order
    pub leads: Vec<Lead>,
    /// Current filter and sort selections
    pub filters: FilterState,
}

impl AppState {
    /// Apply `event`, returning whether the lead list changed.
    ///
    /// A failed edit leaves the state untouched.
    pub fn reduce(&mut self, event: Event, now: DateTime<Utc>) -> Result<bool> {
        match event {
            Event::ChangeStatus { id, status } => {
                self.replace(&id, |lead| lifecycle::change_status(lead, status, now))?;
            },
            Event::SetNextCallDate { id, day } => {
                self.replace(&id, |lead| lifecycle::set_next_call_date(lead, day))?;
            },
            Event::ScheduleIn { id, days } => {
                self.replace(&id, |lead| lifecycle::schedule_in(lead, days, now))?;
            },
            Event::SetNotes { id, notes } => {
                self.replace(&id, |lead| lifecycle::set_notes(lead, &notes))?;
            },
            Event::Search(query) => {
                InputValidator::validate_search_query(&query)?;
                self.filters.search_query = query;
                return Ok(false);
            },
            Event::ToggleCity(city) => {
                self.filters.toggle_city(&city);
                return Ok(false);
            },
            Event::ClearCities => {
                self.filters.clear_cities();
                return Ok(false);
            },
            Event::FilterStatus(status) => {
                self.filters.selected_status = status;
                return Ok(false);
            },
            Event::WithoutWebsite(enabled) => {
                self.filters.without_website = enabled;
                return Ok(false);
            },
            Event::SortBy(key) => {
                self.filters.sort_by = key;
                return Ok(false);
            },
        }
        Ok(true)
    }

    fn replace(&mut self, id: &str, edit: impl FnOnce(&Lead) -> Result<Lead>) -> Result<()> {
        let slot = self
            .leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or_else(|| CrmError::LeadNotFound(id.to_string()))?;
        *slot = edit(&*slot)?;
        Ok(())
    }

    /// Lead with `id`
    #[must_use]
    pub fn lead(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }

    /// Visible leads under the current selections
    #[must_use]
    pub fn visible(&self) -> Vec<&Lead> {
        view::filter_and_sort(&self.leads, &self.filters)
    }

    /// City choices for the city filter
    #[must_use]
    pub fn cities(&self) -> Vec<String> {
        view::distinct_cities(&self.leads)
    }

    /// Dashboard counters over every lead
    #[must_use]
    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::from_leads(&self.leads)
    }
}

/// Build the startup lead list from what storage holds.
///
/// Stored leads win when there are any; otherwise the seed is transformed in
/// order. The seed loader only runs when it is needed. Kept records have any
/// call date their status does not allow cleared.
pub fn reconcile(
    stored: Option<Vec<Lead>>,
    load_seed: impl FnOnce() -> Result<Vec<RawLead>>,
    policy: StartupPolicy,
) -> Result<Vec<Lead>> {
    match stored {
        Some(leads) if !leads.is_empty() => {
            info!(count = leads.len(), ?policy, "Loaded leads from storage");
            Ok(match policy {
                StartupPolicy::ResetProgress => leads.into_iter().map(lifecycle::reset_progress).collect(),
                StartupPolicy::KeepProgress => {
                    let broken = leads.iter().filter(|l| !lifecycle::satisfies_invariants(l)).count();
                    if broken > 0 {
                        warn!(count = broken, "Cleared call dates that did not match the stored status");
                    }
                    leads.into_iter().map(lifecycle::repair).collect()
                },
            })
        },
        _ => {
            let transformer = LeadTransformer::new()?;
            let leads = transformer.transform_all(load_seed()?);
            info!(count = leads.len(), "Seeded leads from raw records");
            Ok(leads)
        },
    }
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Owns the application state and keeps storage in sync with it
pub struct LeadService {
    state: AppState,
    repository: LeadRepository,
    clock: Clock,
    metrics: MetricsCollector,
}

impl LeadService {
    /// Load or seed the lead list, then persist the reconciled list.
    pub fn start(
        repository: LeadRepository,
        load_seed: impl FnOnce() -> Result<Vec<RawLead>>,
        policy: StartupPolicy,
    ) -> Result<Self> {
        let timer = OperationTimer::new("startup_reconciliation");
        let leads = reconcile(repository.load_leads(), load_seed, policy)?;

        let mut service = Self {
            state: AppState {
                leads,
                filters: FilterState::default(),
            },
            repository,
            clock: Box::new(Utc::now),
            metrics: MetricsCollector::default(),
        };
        service.persist();
        timer.finish();
        Ok(service)
    }

    /// Replace the clock used for call timestamps and "today"
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Apply `event`, persisting the list when a lead changed.
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        let now = (self.clock)();
        let kind = event.edit_kind();
        let new_status = match &event {
            Event::ChangeStatus { status, .. } => Some(*status),
            _ => None,
        };

        let changed = self.state.reduce(event, now).inspect_err(|e| {
            warn!(error = %e, "Rejected event");
        })?;

        if changed {
            match (new_status, kind) {
                (Some(status), _) => self.metrics.record_status_change(status),
                (None, Some(kind)) => self.metrics.record_edit(kind),
                (None, None) => {},
            }
            self.persist();
        } else {
            debug!(filters = ?self.state.filters, "Filters updated");
        }
        Ok(())
    }

    fn persist(&mut self) {
        let saved = self.repository.save_leads(&self.state.leads);
        self.metrics.record_storage_write(saved);
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Replace the filter selections in one go
    pub fn set_filters(&mut self, filters: FilterState) {
        self.state.filters = filters;
    }

    /// Session metrics so far
    #[must_use]
    pub const fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Mutable session metrics, for recording exports
    pub fn metrics_mut(&mut self) -> &mut MetricsCollector {
        &mut self.metrics
    }
}
