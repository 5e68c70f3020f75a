use crate::error::{DashboardError, Result};
use crate::models::{DateRange, Selection, WeatherTable};
use crate::processors::{DashboardPipeline, DashboardView};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

/// Holds the table, the current selection and the view computed from them.
/// Every change re-runs the whole pipeline and replaces the view.
pub struct DashboardSession {
    table: Arc<WeatherTable>,
    pipeline: DashboardPipeline,
    selection: Selection,
    view: DashboardView,
}

impl DashboardSession {
    pub fn new(table: Arc<WeatherTable>, pipeline: DashboardPipeline) -> Self {
        let selection = table.default_selection();
        let view = pipeline.run(&table, &selection);

        Self {
            table,
            pipeline,
            selection,
            view,
        }
    }

    pub fn table(&self) -> &WeatherTable {
        &self.table
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Replace the selection; an invalid selection leaves the session unchanged
    pub fn select(&mut self, selection: Selection) -> Result<&DashboardView> {
        self.table.validate_selection(&selection)?;
        self.selection = selection;
        Ok(self.recompute())
    }

    pub fn set_towns(&mut self, towns: Vec<String>) -> Result<&DashboardView> {
        let selection = Selection::new(towns, self.selection.date_range);
        self.select(selection)
    }

    pub fn add_town(&mut self, town: &str) -> Result<&DashboardView> {
        let mut selection = self.selection.clone();
        selection.towns.insert(town.to_string());
        self.select(selection)
    }

    pub fn remove_town(&mut self, town: &str) -> Result<&DashboardView> {
        if !self.table.has_town(town) {
            return Err(DashboardError::UnknownTown(town.to_string()));
        }

        let mut selection = self.selection.clone();
        selection.towns.remove(town);
        self.select(selection)
    }

    pub fn select_all_towns(&mut self) -> Result<&DashboardView> {
        let towns = self.table.towns().to_vec();
        self.set_towns(towns)
    }

    pub fn clear_towns(&mut self) -> Result<&DashboardView> {
        self.set_towns(Vec::new())
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<&DashboardView> {
        let selection = self
            .selection
            .clone()
            .with_date_range(DateRange::new(start, end)?);
        self.select(selection)
    }

    /// Back to all towns over the full date range
    pub fn reset(&mut self) -> &DashboardView {
        self.selection = self.table.default_selection();
        self.recompute()
    }

    /// Swap in a reloaded table, keeping the selection when it is still valid
    pub fn replace_table(&mut self, table: Arc<WeatherTable>) -> &DashboardView {
        self.table = table;

        if let Err(e) = self.table.validate_selection(&self.selection) {
            warn!("Selection no longer valid after reload ({}), resetting", e);
            self.selection = self.table.default_selection();
        }

        info!(rows = self.table.len(), "Dashboard table replaced");
        self.recompute()
    }

    fn recompute(&mut self) -> &DashboardView {
        self.view = self.pipeline.run(&self.table, &self.selection);
        &self.view
    }
}
