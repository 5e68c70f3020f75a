use crate::models::{DateRange, Selection, WeatherRecord};
use std::collections::BTreeSet;

/// Select the records whose town is in `selected_towns` and whose date lies
/// in `date_range` (inclusive). Source order is preserved; an empty town set
/// selects nothing.
pub fn filter<'a>(
    records: &'a [WeatherRecord],
    selected_towns: &BTreeSet<String>,
    date_range: &DateRange,
) -> Vec<&'a WeatherRecord> {
    if selected_towns.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|r| selected_towns.contains(&r.town) && date_range.contains(r.date))
        .collect()
}

/// A filter bound to one selection
#[derive(Debug, Clone)]
pub struct RecordFilter {
    selection: Selection,
}

impl RecordFilter {
    pub fn new(selection: Selection) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn matches(&self, record: &WeatherRecord) -> bool {
        self.selection.includes_town(&record.town)
            && self.selection.date_range.contains(record.date)
    }

    pub fn apply<'a>(&self, records: &'a [WeatherRecord]) -> Vec<&'a WeatherRecord> {
        filter(records, &self.selection.towns, &self.selection.date_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(town: &str, date: NaiveDate, avg: f64) -> WeatherRecord {
        WeatherRecord::builder()
            .town(town)
            .date(date)
            .avg_temp(avg)
            .build()
            .unwrap()
    }

    fn scenario_records() -> Vec<WeatherRecord> {
        vec![
            record("A", ymd(2024, 1, 1), 20.0),
            record("A", ymd(2024, 1, 2), 22.0),
            record("B", ymd(2024, 1, 1), 30.0),
        ]
    }

    fn month_of_records() -> Vec<WeatherRecord> {
        let towns = ["Nairobi", "Mombasa", "Kisumu"];
        (1..=31)
            .flat_map(|day| {
                towns
                    .iter()
                    .map(move |town| record(town, ymd(2024, 1, day), 15.0 + day as f64))
            })
            .collect()
    }

    fn towns(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn full_range(records: &[WeatherRecord]) -> DateRange {
        let min = records.iter().map(|r| r.date).min().unwrap();
        let max = records.iter().map(|r| r.date).max().unwrap();
        DateRange::new(min, max).unwrap()
    }

    #[test]
    fn test_single_town_scenario() {
        let records = scenario_records();
        let range = DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 2)).unwrap();

        let subset = filter(&records, &towns(&["A"]), &range);

        assert_eq!(subset, vec![&records[0], &records[1]]);
    }

    #[test]
    fn test_date_excludes_other_rows() {
        let records = scenario_records();
        let range = DateRange::single_day(ymd(2024, 1, 2));

        let subset = filter(&records, &towns(&["A", "B"]), &range);

        assert_eq!(subset, vec![&records[1]]);
    }

    #[test]
    fn test_no_towns_selects_nothing() {
        let records = scenario_records();
        let subset = filter(&records, &BTreeSet::new(), &full_range(&records));
        assert!(subset.is_empty());
    }

    #[test]
    fn test_unconstrained_selection_is_identity() {
        let records = month_of_records();
        let all = towns(&["Nairobi", "Mombasa", "Kisumu"]);

        let subset = filter(&records, &all, &full_range(&records));

        assert_eq!(subset.len(), records.len());
        assert!(subset.iter().zip(&records).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_disjoint_ranges_partition_rows() {
        let records = month_of_records();
        let all = towns(&["Nairobi", "Mombasa", "Kisumu"]);
        let first = DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 10)).unwrap();
        let second = DateRange::new(ymd(2024, 1, 11), ymd(2024, 1, 20)).unwrap();
        let third = DateRange::new(ymd(2024, 1, 21), ymd(2024, 1, 31)).unwrap();

        let a = filter(&records, &all, &first);
        let b = filter(&records, &all, &second);
        let c = filter(&records, &all, &third);

        assert!(a.iter().all(|r| !b.contains(r) && !c.contains(r)));
        assert!(b.iter().all(|r| !c.contains(r)));
        assert_eq!(a.len() + b.len() + c.len(), records.len());
    }

    #[test]
    fn test_preserves_source_order() {
        let records = month_of_records();
        let range = DateRange::new(ymd(2024, 1, 5), ymd(2024, 1, 8)).unwrap();

        let subset = filter(&records, &towns(&["Kisumu", "Nairobi"]), &range);
        let positions: Vec<usize> = subset
            .iter()
            .map(|r| records.iter().position(|x| std::ptr::eq(x, *r)).unwrap())
            .collect();

        assert_eq!(subset.len(), 8);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = month_of_records();
        let selection = Selection::new(
            ["Mombasa"],
            DateRange::new(ymd(2024, 1, 3), ymd(2024, 1, 9)).unwrap(),
        );
        let record_filter = RecordFilter::new(selection);

        let first = record_filter.apply(&records);
        let second = record_filter.apply(&records);

        assert_eq!(first, second);
        assert!(first.iter().all(|r| record_filter.matches(r)));
    }
}
