//! Data models for lead tracking and storage
//!
//! This module contains all data structures used throughout the application:
//! the raw import record, the tracked lead, its call status and export formats.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CrmError;

/// Call-outcome classification of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeadStatus {
    /// Never called (or reset)
    #[default]
    #[serde(alias = "Pas_appelé")]
    NotCalled,
    /// Called, nobody picked up
    #[serde(alias = "Pas_décroché")]
    NoAnswer,
    /// Asked to be called back
    #[serde(alias = "Rappel")]
    CallBack,
    /// Not interested
    #[serde(alias = "Refus")]
    Refused,
    /// Meeting booked
    #[serde(alias = "RDV_fixe")]
    MeetingSet,
}

impl LeadStatus {
    /// Every status, in display order
    pub const ALL: [Self; 5] = [
        Self::NotCalled,
        Self::NoAnswer,
        Self::CallBack,
        Self::Refused,
        Self::MeetingSet,
    ];

    /// Stable string form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotCalled => "NotCalled",
            Self::NoAnswer => "NoAnswer",
            Self::CallBack => "CallBack",
            Self::Refused => "Refused",
            Self::MeetingSet => "MeetingSet",
        }
    }

    /// Position when sorting by status.
    ///
    /// Follows the alphabetical order of the legacy names (`Pas_appelé`,
    /// `Pas_décroché`, `Rappel`, `RDV_fixe`, `Refus`) so uncalled leads come first.
    #[must_use]
    pub const fn sort_rank(&self) -> u8 {
        match self {
            Self::NotCalled => 0,
            Self::NoAnswer => 1,
            Self::CallBack => 2,
            Self::MeetingSet => 3,
            Self::Refused => 4,
        }
    }

    /// True for every status except `NotCalled`
    #[must_use]
    pub const fn is_called(&self) -> bool {
        !matches!(self, Self::NotCalled)
    }

    /// True when someone actually picked up
    #[must_use]
    pub const fn is_contacted(&self) -> bool {
        !matches!(self, Self::NotCalled | Self::NoAnswer)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "notcalled" | "pasappelé" => Ok(Self::NotCalled),
            "noanswer" | "pasdécroché" => Ok(Self::NoAnswer),
            "callback" | "rappel" => Ok(Self::CallBack),
            "refused" | "refus" => Ok(Self::Refused),
            "meetingset" | "rdvfixe" => Ok(Self::MeetingSet),
            _ => Err(CrmError::InvalidInput(format!(
                "Unknown status: {s}. Must be one of: NotCalled, NoAnswer, CallBack, Refused, MeetingSet"
            ))),
        }
    }
}

/// Prospect data as supplied by the import source, before tracking fields are attached
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLead {
    /// Business name
    pub title: Option<String>,
    /// Average rating
    pub total_score: Option<f64>,
    /// Number of reviews
    pub reviews_count: u32,
    /// Street address
    pub street: Option<String>,
    /// City
    pub city: Option<String>,
    /// Region or state
    pub state: Option<String>,
    /// ISO country code
    pub country_code: Option<String>,
    /// Website URL
    pub website: Option<String>,
    /// Phone number as displayed
    pub phone: Option<String>,
    /// Business category
    pub category_name: Option<String>,
    /// Map listing URL
    pub url: Option<String>,
}

/// A tracked prospect with call-outcome fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    /// Stable identifier, never changes once assigned
    pub id: String,
    /// Business name
    pub title: Option<String>,
    /// Average rating
    pub total_score: Option<f64>,
    /// Number of reviews
    pub reviews_count: u32,
    /// Street address
    pub street: Option<String>,
    /// City
    pub city: Option<String>,
    /// Region or state
    pub state: Option<String>,
    /// ISO country code
    pub country_code: Option<String>,
    /// Website URL
    pub website: Option<String>,
    /// Phone number as displayed
    pub phone: Option<String>,
    /// Business category
    pub category_name: Option<String>,
    /// Map listing URL
    pub url: Option<String>,
    /// Current call outcome
    pub status: LeadStatus,
    /// Free-form call notes
    pub notes: String,
    /// When the last call outcome was recorded
    pub last_call_date: Option<DateTime<Utc>>,
    /// Scheduled call-back day, only set while `status` is `CallBack`
    pub next_call_date: Option<NaiveDate>,
}

impl Lead {
    /// Attach default tracking fields to a raw record
    #[must_use]
    pub fn from_raw(raw: RawLead, id: String) -> Self {
        Self {
            id,
            title: raw.title,
            total_score: raw.total_score,
            reviews_count: raw.reviews_count,
            street: raw.street,
            city: raw.city,
            state: raw.state,
            country_code: raw.country_code,
            website: raw.website,
            phone: raw.phone,
            category_name: raw.category_name,
            url: raw.url,
            status: LeadStatus::NotCalled,
            notes: String::new(),
            last_call_date: None,
            next_call_date: None,
        }
    }

    /// Title for display, empty when unknown
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// True when the lead has a non-empty website
    #[must_use]
    pub fn has_website(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.is_empty())
    }

    /// `tel:` URI with all whitespace stripped from the phone number
    #[must_use]
    pub fn dial_uri(&self) -> Option<String> {
        let phone = self.phone.as_deref()?;
        let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return None;
        }
        Some(format!("tel:{compact}"))
    }

    /// Map listing link, with `https://` prepended when the stored URL has no scheme
    #[must_use]
    pub fn maps_link(&self) -> Option<String> {
        let url = self.url.as_deref().filter(|u| !u.is_empty())?;
        if url.starts_with("http://") || url.starts_with("https://") {
            Some(url.to_string())
        } else {
            Some(format!("https://{url}"))
        }
    }
}

/// Output format for exported leads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Comma-separated values format
    #[default]
    Csv,
    /// Plain text format
    Txt,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Txt),
            "json" => Ok(Self::Json),
            other => Err(CrmError::InvalidInput(format!(
                "Invalid export format: {other}. Must be one of: txt, csv, json"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_legacy_names() {
        let json = r#"["Pas_appelé","Pas_décroché","Rappel","Refus","RDV_fixe"]"#;
        let statuses: Vec<LeadStatus> = serde_json::from_str(json).unwrap();
        assert_eq!(statuses, LeadStatus::ALL.to_vec());
    }

    #[test]
    fn test_status_from_str_is_lenient() {
        assert_eq!("call_back".parse::<LeadStatus>().unwrap(), LeadStatus::CallBack);
        assert_eq!("MeetingSet".parse::<LeadStatus>().unwrap(), LeadStatus::MeetingSet);
        assert_eq!("Rappel".parse::<LeadStatus>().unwrap(), LeadStatus::CallBack);
        assert!("maybe".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_sort_rank_puts_not_called_first() {
        let mut statuses = LeadStatus::ALL.to_vec();
        statuses.reverse();
        statuses.sort_by_key(LeadStatus::sort_rank);
        assert_eq!(
            statuses,
            vec![
                LeadStatus::NotCalled,
                LeadStatus::NoAnswer,
                LeadStatus::CallBack,
                LeadStatus::MeetingSet,
                LeadStatus::Refused,
            ]
        );
    }

    #[test]
    fn test_lead_serializes_camel_case() {
        let lead = Lead {
            id: "a".to_string(),
            country_code: Some("FR".to_string()),
            ..Lead::default()
        };
        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(value["countryCode"], "FR");
        assert_eq!(value["status"], "NotCalled");
        assert!(value["nextCallDate"].is_null());
    }

    #[test]
    fn test_raw_lead_missing_fields_default() {
        let raw: RawLead = serde_json::from_str(r#"{"title":"Gym"}"#).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Gym"));
        assert_eq!(raw.reviews_count, 0);
        assert!(raw.city.is_none());
    }

    #[test]
    fn test_dial_uri_strips_whitespace() {
        let lead = Lead {
            phone: Some("+33 6 12 34 56 78".to_string()),
            ..Lead::default()
        };
        assert_eq!(lead.dial_uri().as_deref(), Some("tel:+33612345678"));
        assert!(Lead::default().dial_uri().is_none());
    }

    #[test]
    fn test_maps_link_adds_scheme() {
        let mut lead = Lead {
            url: Some("maps.google.com/?cid=1".to_string()),
            ..Lead::default()
        };
        assert_eq!(lead.maps_link().as_deref(), Some("https://maps.google.com/?cid=1"));

        lead.url = Some("http://example.com".to_string());
        assert_eq!(lead.maps_link().as_deref(), Some("http://example.com"));
    }

    #[test]
    fn test_empty_website_counts_as_missing() {
        let mut lead = Lead {
            website: Some(String::new()),
            ..Lead::default()
        };
        assert!(!lead.has_website());
        lead.website = Some("https://gym.fr".to_string());
        assert!(lead.has_website());
    }
}
