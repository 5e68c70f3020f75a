use serde::Serialize;

/// Mean `avg_temp_c` for one town over the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TownAverage {
    pub town: String,
    /// `None` when the town has no non-null `avg_temp_c` in the subset
    pub mean_avg_temp_c: Option<f64>,
    /// Number of non-null values the mean was taken over
    pub observations: usize,
}

/// Per-town averages, ordered alphabetically by town
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TownAverages {
    entries: Vec<TownAverage>,
}

impl TownAverages {
    pub(crate) fn from_sorted(entries: Vec<TownAverage>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TownAverage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn towns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.town.as_str())
    }

    /// Towns with a defined mean, paired with that mean
    pub fn means(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter_map(|e| e.mean_avg_temp_c.map(|m| (e.town.as_str(), m)))
    }

    pub fn mean_of(&self, town: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.town == town)
            .and_then(|e| e.mean_avg_temp_c)
    }

    pub fn get(&self, town: &str) -> Option<&TownAverage> {
        self.entries.iter().find(|e| e.town == town)
    }
}
