use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::model::AggregatedBy;

/// Largest page the provider serves in one request (`select`).
pub const MAX_PAGE_SIZE: usize = 1000;
/// Records handed to a batch callback at once when processing whole collections.
pub const PROCESS_BATCH_SIZE: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Options shared by every listing operation.
///
/// Operations ignore the fields that do not apply to their endpoint.
pub struct ListOptions {
    /// Ask the provider for every data field of each contact.
    pub with_full_data: bool,
    /// Maximum number of records to return; `0` means no limit.
    pub limit: usize,
    /// Restrict to records created or changed since this instant.
    pub since: Option<DateTime<Utc>>,
    /// Send `since` as a calendar day rather than a full timestamp.
    pub round_to_date: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            with_full_data: false,
            limit: 0,
            since: None,
            round_to_date: true,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_full_data(mut self, with_full_data: bool) -> Self {
        self.with_full_data = with_full_data;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn round_to_date(mut self, round_to_date: bool) -> Self {
        self.round_to_date = round_to_date;
        self
    }

    /// Page size derived from `limit`: the limit itself when it is below
    /// [`MAX_PAGE_SIZE`], otherwise [`MAX_PAGE_SIZE`].
    pub fn page_size(&self) -> usize {
        if self.limit == 0 || self.limit >= MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            self.limit
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A triggered (transactional) campaign send.
pub struct TriggeredEmail {
    pub to: Vec<String>,
    pub campaign_id: i64,
    pub personalisation: BTreeMap<String, String>,
}

impl TriggeredEmail {
    /// Send `campaign_id` to a single address without personalisation values.
    pub fn to_one(email: impl Into<String>, campaign_id: i64) -> Self {
        Self::to_many(vec![email.into()], campaign_id)
    }

    /// Send `campaign_id` to several addresses without personalisation values.
    pub fn to_many(to: Vec<String>, campaign_id: i64) -> Self {
        Self {
            to,
            campaign_id,
            personalisation: BTreeMap::new(),
        }
    }

    /// Add a personalisation value.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.personalisation.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Transactional email statistics query.
pub struct StatisticsQuery {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub aggregated_by: Option<AggregatedBy>,
    pub round_to_date: bool,
}

impl StatisticsQuery {
    /// Statistics since `start`, rounded to calendar days.
    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: None,
            aggregated_by: None,
            round_to_date: true,
        }
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn aggregated_by(mut self, aggregated_by: AggregatedBy) -> Self {
        self.aggregated_by = Some(aggregated_by);
        self
    }

    pub fn round_to_date(mut self, round_to_date: bool) -> Self {
        self.round_to_date = round_to_date;
        self
    }
}
