use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::{DashboardError, Result};

/// Inclusive date interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn contains_range(&self, other: &DateRange) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    pub fn num_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days() + 1
    }
}

/// The user's current town and date selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub towns: BTreeSet<String>,
    pub date_range: DateRange,
}

impl Selection {
    pub fn new<I, S>(towns: I, date_range: DateRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            towns: towns.into_iter().map(Into::into).collect(),
            date_range,
        }
    }

    pub fn includes_town(&self, town: &str) -> bool {
        self.towns.contains(town)
    }

    pub fn is_empty(&self) -> bool {
        self.towns.is_empty()
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }
}
