//! Derived view: filtering, searching and sorting the lead list.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::CrmError;
use crate::models::{Lead, LeadStatus};

/// Sort key for the visible list. All keys sort ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Review count
    #[default]
    Reviews,
    /// Rating, missing ratings count as 0
    Score,
    /// City name, missing cities count as ""
    City,
    /// Call progress, uncalled leads first
    Status,
}

impl SortKey {
    /// Name used in configuration and on the command line
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reviews => "reviews",
            Self::Score => "score",
            Self::City => "city",
            Self::Status => "status",
        }
    }

    fn compare(self, a: &Lead, b: &Lead) -> Ordering {
        match self {
            Self::Reviews => a.reviews_count.cmp(&b.reviews_count),
            Self::Score => a
                .total_score
                .unwrap_or(0.0)
                .total_cmp(&b.total_score.unwrap_or(0.0)),
            Self::City => compare_text(
                a.city.as_deref().unwrap_or_default(),
                b.city.as_deref().unwrap_or_default(),
            ),
            Self::Status => a.status.sort_rank().cmp(&b.status.sort_rank()),
        }
    }
}

impl FromStr for SortKey {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reviews" => Ok(Self::Reviews),
            "score" | "scoreasc" | "rating" => Ok(Self::Score),
            "city" => Ok(Self::City),
            "status" => Ok(Self::Status),
            other => Err(CrmError::InvalidInput(format!(
                "Invalid sort key: {other}. Must be one of: reviews, score, city, status"
            ))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Current filter and sort selections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive text matched against title or city
    pub search_query: String,
    /// Cities to keep; empty keeps every city
    pub selected_cities: Vec<String>,
    /// Exact status to keep
    pub selected_status: Option<LeadStatus>,
    /// Sort key
    pub sort_by: SortKey,
    /// Keep only leads without a website
    pub without_website: bool,
}

impl FilterState {
    /// Select `city` if it isn't selected yet, otherwise deselect it
    pub fn toggle_city(&mut self, city: &str) {
        if let Some(pos) = self.selected_cities.iter().position(|c| c == city) {
            self.selected_cities.remove(pos);
        } else {
            self.selected_cities.push(city.to_string());
        }
    }

    /// Deselect every city
    pub fn clear_cities(&mut self) {
        self.selected_cities.clear();
    }

    /// True when `lead` passes every active filter
    #[must_use]
    pub fn matches(&self, lead: &Lead) -> bool {
        self.matches_search(lead)
            && self.matches_city(lead)
            && self.selected_status.map_or(true, |status| lead.status == status)
            && (!self.without_website || !lead.has_website())
    }

    fn matches_search(&self, lead: &Lead) -> bool {
        if self.search_query.is_empty() {
            return true;
        }
        let query = self.search_query.to_lowercase();
        let contains = |field: Option<&str>| field.is_some_and(|v| v.to_lowercase().contains(&query));
        contains(lead.title.as_deref()) || contains(lead.city.as_deref())
    }

    fn matches_city(&self, lead: &Lead) -> bool {
        if self.selected_cities.is_empty() {
            return true;
        }
        lead.city
            .as_deref()
            .is_some_and(|city| self.selected_cities.iter().any(|c| c == city))
    }
}

/// Case and accent insensitive form of `text`, so "Émerainville" sorts with "E"
fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Dictionary order: accents and case only break ties
fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

/// Visible subset of `leads` under `filters`, stably sorted.
#[must_use]
pub fn filter_and_sort<'a>(leads: &'a [Lead], filters: &FilterState) -> Vec<&'a Lead> {
    let mut visible: Vec<&Lead> = leads.iter().filter(|lead| filters.matches(lead)).collect();
    visible.sort_by(|a, b| filters.sort_by.compare(a, b));
    visible
}

/// Distinct non-empty cities across all leads, in dictionary order
#[must_use]
pub fn distinct_cities(leads: &[Lead]) -> Vec<String> {
    let mut cities: Vec<String> = leads
        .iter()
        .filter_map(|lead| lead.city.as_deref())
        .filter(|city| !city.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect();
    cities.sort_by(|a, b| compare_text(a, b));
    cities
}
