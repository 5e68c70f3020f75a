use chrono::NaiveDate;
use std::collections::HashSet;

use crate::error::{DashboardError, Result};
use crate::models::{DateRange, Selection, WeatherRecord};

/// The loaded dataset. Rows keep source order and are never modified.
#[derive(Debug, Clone)]
pub struct WeatherTable {
    records: Vec<WeatherRecord>,
    towns: Vec<String>,
    date_bounds: DateRange,
}

impl WeatherTable {
    pub fn new(records: Vec<WeatherRecord>) -> Result<Self> {
        let first = records.first().ok_or(DashboardError::EmptyDataset)?;
        let mut min_date = first.date;
        let mut max_date = first.date;

        let mut seen = HashSet::new();
        let mut towns = Vec::new();

        for record in &records {
            min_date = min_date.min(record.date);
            max_date = max_date.max(record.date);

            if seen.insert(record.town.as_str()) {
                towns.push(record.town.clone());
            }
        }

        Ok(Self {
            date_bounds: DateRange::new(min_date, max_date)?,
            towns,
            records,
        })
    }

    pub fn records(&self) -> &[WeatherRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct towns in first-seen order
    pub fn towns(&self) -> &[String] {
        &self.towns
    }

    pub fn has_town(&self, town: &str) -> bool {
        self.towns.iter().any(|t| t == town)
    }

    pub fn date_bounds(&self) -> DateRange {
        self.date_bounds
    }

    /// Every town selected over the full date range
    pub fn default_selection(&self) -> Selection {
        Selection::new(self.towns.iter().cloned(), self.date_bounds)
    }

    /// Build a validated selection; omitted parts default to all towns and the
    /// full date range
    pub fn selection(
        &self,
        towns: Option<Vec<String>>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Selection> {
        let range = DateRange::new(
            start.unwrap_or(self.date_bounds.start()),
            end.unwrap_or(self.date_bounds.end()),
        )?;

        let selection = match towns {
            Some(towns) => Selection::new(towns, range),
            None => self.default_selection().with_date_range(range),
        };

        self.validate_selection(&selection)?;
        Ok(selection)
    }

    pub fn validate_selection(&self, selection: &Selection) -> Result<()> {
        if let Some(unknown) = selection.towns.iter().find(|t| !self.has_town(t)) {
            return Err(DashboardError::UnknownTown(unknown.clone()));
        }

        for date in [selection.date_range.start(), selection.date_range.end()] {
            if !self.date_bounds.contains(date) {
                return Err(DashboardError::DateOutOfBounds {
                    date,
                    min: self.date_bounds.start(),
                    max: self.date_bounds.end(),
                });
            }
        }

        Ok(())
    }
}
