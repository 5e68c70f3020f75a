use crate::models::{TownAverage, TownAverages, WeatherRecord};
use std::collections::BTreeMap;

/// Mean of non-null `avg_temp_c` per town, ordered alphabetically by town.
/// Towns whose values are all null keep an entry with no mean.
pub fn average_by_town<'a, I>(subset: I) -> TownAverages
where
    I: IntoIterator<Item = &'a WeatherRecord>,
{
    let mut groups: BTreeMap<&'a str, (f64, usize)> = BTreeMap::new();

    for record in subset {
        let (sum, count) = groups.entry(record.town.as_str()).or_insert((0.0, 0));
        if let Some(value) = record.avg_temp_c {
            *sum += value;
            *count += 1;
        }
    }

    let entries = groups
        .into_iter()
        .map(|(town, (sum, count))| TownAverage {
            town: town.to_string(),
            mean_avg_temp_c: (count > 0).then(|| sum / count as f64),
            observations: count,
        })
        .collect();

    TownAverages::from_sorted(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(town: &str, day: u32, avg: Option<f64>) -> WeatherRecord {
        let mut record = WeatherRecord::new(town.to_string(), ymd(2024, 1, day));
        record.avg_temp_c = avg;
        record
    }

    #[test]
    fn test_mean_per_town() {
        let records = vec![record("A", 1, Some(20.0)), record("A", 2, Some(22.0))];

        let averages = average_by_town(&records);

        assert_eq!(averages.len(), 1);
        assert_eq!(averages.mean_of("A"), Some(21.0));
        assert_eq!(averages.get("A").map(|a| a.observations), Some(2));
    }

    #[test]
    fn test_empty_subset() {
        let averages = average_by_town(Vec::<&WeatherRecord>::new());
        assert!(averages.is_empty());
        assert_eq!(averages.means().count(), 0);
    }

    #[test]
    fn test_nulls_are_skipped_not_zero() {
        let records = vec![
            record("Nairobi", 1, Some(18.0)),
            record("Nairobi", 2, None),
            record("Nairobi", 3, Some(20.0)),
        ];

        let averages = average_by_town(&records);

        assert_eq!(averages.mean_of("Nairobi"), Some(19.0));
        assert_eq!(averages.get("Nairobi").unwrap().observations, 2);
    }

    #[test]
    fn test_all_null_town_has_no_mean() {
        let records = vec![
            record("Lodwar", 1, None),
            record("Lodwar", 2, None),
            record("Kisumu", 1, Some(24.0)),
        ];

        let averages = average_by_town(&records);

        assert_eq!(averages.mean_of("Lodwar"), None);
        assert_eq!(averages.get("Lodwar").unwrap().mean_avg_temp_c, None);
        let defined: Vec<(&str, f64)> = averages.means().collect();
        assert_eq!(defined, vec![("Kisumu", 24.0)]);
    }

    #[test]
    fn test_alphabetical_order_and_subset_of_towns() {
        let records = vec![
            record("Nyeri", 1, Some(16.0)),
            record("Garissa", 1, Some(33.0)),
            record("Mombasa", 1, Some(28.0)),
            record("Garissa", 2, Some(35.0)),
        ];

        let averages = average_by_town(&records);
        let towns: Vec<&str> = averages.towns().collect();

        assert_eq!(towns, vec!["Garissa", "Mombasa", "Nyeri"]);
        assert!(towns.iter().all(|t| records.iter().any(|r| r.town == *t)));
        assert_eq!(averages.mean_of("Garissa"), Some(34.0));
    }

    #[test]
    fn test_accepts_filtered_references() {
        let records = vec![record("A", 1, Some(20.0)), record("B", 1, Some(30.0))];
        let subset: Vec<&WeatherRecord> = records.iter().filter(|r| r.town == "B").collect();

        let averages = average_by_town(subset);

        assert_eq!(averages.towns().collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(averages.mean_of("B"), Some(30.0));
    }
}
