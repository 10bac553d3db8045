//! Joins observations for one year to county boundaries.

use geo::MultiPolygon;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{IiveError, Result};
use crate::geometry::Region;
use crate::region::normalize_region_name;
use crate::types::{Gender, GenderSelection, RegionFilter, StatTable};

/// A county with its natural increase for the selected year and gender
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord<'a> {
    pub region_name: String,
    pub geometry: &'a MultiPolygon<f64>,
    pub natural_increase_total: i64,
    pub natural_increase_male: i64,
    pub natural_increase_female: i64,
    pub year: i32,
}

#[derive(Default)]
struct GenderValues {
    male: Option<i64>,
    female: Option<i64>,
    unreported: bool,
}

impl GenderValues {
    fn add(&mut self, gender: Gender, value: Option<i64>) {
        let Some(value) = value else {
            self.unreported = true;
            return;
        };
        let slot = match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
        };
        *slot = Some(slot.unwrap_or(0) + value);
    }

    fn both(&self) -> Option<(i64, i64)> {
        if self.unreported {
            return None;
        }
        Some((self.male?, self.female?))
    }
}

/// Build the per-county view for one year.
///
/// The table must carry both gender value columns, whatever the selection.
/// Observations are matched to regions by canonical name; counties missing
/// on either side are left out. Repeated observations for the same county
/// and gender are summed. Every joined county must have reported male and
/// female values, otherwise the whole view fails with `MissingColumns`.
/// The result is sorted by region name.
pub fn build_view<'a>(
    table: &StatTable,
    regions: &'a [Region],
    year: i32,
    gender: GenderSelection,
    region_filter: &RegionFilter,
) -> Result<Vec<JoinedRecord<'a>>> {
    let missing = table.missing_genders();
    if !missing.is_empty() {
        let columns: Vec<String> = missing.iter().map(|g| g.column_name()).collect();
        return Err(IiveError::MissingColumns(format!(
            "'{}'",
            columns.join("' ja '")
        )));
    }

    let mut by_region: BTreeMap<&str, GenderValues> = BTreeMap::new();
    for obs in table.observations.iter().filter(|o| o.year == year) {
        by_region
            .entry(normalize_region_name(&obs.region_name))
            .or_default()
            .add(obs.gender, obs.natural_increase);
    }

    let mut records = Vec::new();
    for region in regions {
        let Some(values) = by_region.get(region.canonical_name.as_str()) else {
            continue;
        };

        let Some((male, female)) = values.both() else {
            return Err(IiveError::MissingColumns(format!(
                "male/female natural increase for region '{}'",
                region.canonical_name
            )));
        };

        let total = match gender {
            GenderSelection::All => male + female,
            GenderSelection::Male => male,
            GenderSelection::Female => female,
        };

        records.push(JoinedRecord {
            region_name: region.canonical_name.clone(),
            geometry: &region.geometry,
            natural_increase_total: total,
            natural_increase_male: male,
            natural_increase_female: female,
            year,
        });
    }

    debug!(
        "Joined {} of {} regions for {}",
        records.len(),
        regions.len(),
        year
    );

    records.retain(|r| region_filter.matches(&r.region_name));
    records.sort_by(|a, b| a.region_name.cmp(&b.region_name));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Observation;
    use geo::polygon;

    const ALL: &RegionFilter = &RegionFilter::All;

    fn square(x: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![polygon![
            (x: x, y: 0.0),
            (x: x + 1.0, y: 0.0),
            (x: x + 1.0, y: 1.0),
            (x: x, y: 1.0),
        ]])
    }

    fn regions() -> Vec<Region> {
        vec![
            Region::new("Tartu maakond", square(2.0)),
            Region::new("Harju", square(0.0)),
            Region::new("Hiiu", square(1.0)),
        ]
    }

    fn observations() -> Vec<Observation> {
        vec![
            Observation::new(2020, "37", "Harju maakond", Gender::Male, 500),
            Observation::new(2020, "37", "Harju maakond", Gender::Female, 480),
            Observation::new(2020, "78", "Tartu maakond", Gender::Male, -20),
            Observation::new(2020, "78", "Tartu maakond", Gender::Female, 35),
            Observation::new(2020, "86", "Võru maakond", Gender::Male, -100),
            Observation::new(2020, "86", "Võru maakond", Gender::Female, -90),
            Observation::new(2019, "37", "Harju maakond", Gender::Male, 610),
            Observation::new(2019, "37", "Harju maakond", Gender::Female, 590),
        ]
    }

    fn table() -> StatTable {
        StatTable::from_observations(observations())
    }

    fn only(name: &str) -> RegionFilter {
        RegionFilter::Only(name.to_string())
    }

    #[test]
    fn test_single_region_scenario() {
        let table = StatTable::from_observations(vec![
            Observation::new(2020, "37", "Harju maakond", Gender::Male, 500),
            Observation::new(2020, "37", "Harju maakond", Gender::Female, 480),
        ]);
        let regions = vec![Region::new("Harju", square(0.0))];

        let view = build_view(&table, &regions, 2020, GenderSelection::All, ALL).unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].region_name, "Harju");
        assert_eq!(view[0].natural_increase_total, 980);

        let empty = build_view(&table, &regions, 2019, GenderSelection::All, ALL).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_only_requested_year() {
        let regions = regions();
        let table = table();
        for &year in &table.years {
            let view = build_view(&table, &regions, year, GenderSelection::All, ALL).unwrap();
            assert!(view.iter().all(|r| r.year == year));
        }

        let view = build_view(&table, &regions, 2019, GenderSelection::All, ALL).unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].natural_increase_total, 1200);
    }

    #[test]
    fn test_inner_join_and_sorting() {
        let regions = regions();
        let table = table();
        let view = build_view(&table, &regions, 2020, GenderSelection::All, ALL).unwrap();

        // Hiiu has no data, Võru has no geometry
        let names: Vec<&str> = view.iter().map(|r| r.region_name.as_str()).collect();
        assert_eq!(names, vec!["Harju", "Tartu"]);

        let filtered_obs = table.observations.iter().filter(|o| o.year == 2020).count();
        assert!(view.len() <= regions.len().min(filtered_obs));
    }

    #[test]
    fn test_gender_selection_totals() {
        let regions = regions();
        let table = table();

        for gender in GenderSelection::ALL {
            let view = build_view(&table, &regions, 2020, gender, ALL).unwrap();
            for r in &view {
                let expected = match gender {
                    GenderSelection::All => r.natural_increase_male + r.natural_increase_female,
                    GenderSelection::Male => r.natural_increase_male,
                    GenderSelection::Female => r.natural_increase_female,
                };
                assert_eq!(r.natural_increase_total, expected);
            }
        }

        let tartu =
            build_view(&table, &regions, 2020, GenderSelection::Female, &only("Tartu")).unwrap();
        assert_eq!(tartu[0].natural_increase_total, 35);
    }

    #[test]
    fn test_region_filter() {
        let regions = regions();
        let table = table();
        let all = GenderSelection::All;

        let harju = build_view(&table, &regions, 2020, all, &only("Harju")).unwrap();
        assert_eq!(harju.len(), 1);
        assert_eq!(harju[0].region_name, "Harju");

        let none = build_view(&table, &regions, 2020, all, &only("Pärnu")).unwrap();
        assert!(none.is_empty());

        // Hiiu has geometry but no data
        let hiiu = build_view(&table, &regions, 2020, all, &only("Hiiu")).unwrap();
        assert!(hiiu.is_empty());
    }

    #[test]
    fn test_missing_gender_column() {
        let regions = regions();
        let table = StatTable::from_observations(
            observations()
                .into_iter()
                .filter(|o| o.gender == Gender::Male)
                .collect(),
        );

        for gender in GenderSelection::ALL {
            for filter in [RegionFilter::All, only("Pärnu")] {
                let err = build_view(&table, &regions, 2020, gender, &filter).unwrap_err();
                assert!(matches!(err, IiveError::MissingColumns(_)));
                assert!(err.to_string().contains("Naised Loomulik iive"));
            }
        }

        // a year without any rows still needs both columns
        let err = build_view(&table, &regions, 1990, GenderSelection::Male, ALL).unwrap_err();
        assert!(matches!(err, IiveError::MissingColumns(_)));
    }

    #[test]
    fn test_unreported_county_values() {
        let regions = regions();
        let mut obs = observations();
        obs.push(Observation::unreported(2020, "39", "Hiiu maakond", Gender::Male));
        obs.push(Observation::unreported(2020, "39", "Hiiu maakond", Gender::Female));
        let table = StatTable::from_observations(obs);

        let err = build_view(&table, &regions, 2020, GenderSelection::All, ALL).unwrap_err();
        assert!(matches!(err, IiveError::MissingColumns(_)));
        assert!(err.to_string().contains("Hiiu"));

        // other years are unaffected
        let view = build_view(&table, &regions, 2019, GenderSelection::All, ALL).unwrap();
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_one_unreported_gender_fails_the_view() {
        let regions = vec![Region::new("Harju", square(0.0))];
        let table = StatTable::from_observations(vec![
            Observation::new(2021, "37", "Harju maakond", Gender::Male, 410),
            Observation::unreported(2021, "37", "Harju maakond", Gender::Female),
        ]);

        for gender in GenderSelection::ALL {
            let err = build_view(&table, &regions, 2021, gender, ALL).unwrap_err();
            assert!(matches!(err, IiveError::MissingColumns(_)));
        }
    }

    #[test]
    fn test_unknown_county_is_dropped_by_join() {
        let regions = regions();
        let mut obs = observations();
        obs.push(Observation::new(2020, "", "Kogu Eesti", Gender::Male, 1));
        obs.push(Observation::new(2020, "", "Kogu Eesti", Gender::Female, 1));
        let table = StatTable::from_observations(obs);

        let view = build_view(&table, &regions, 2020, GenderSelection::All, ALL).unwrap();
        let names: Vec<&str> = view.iter().map(|r| r.region_name.as_str()).collect();
        assert_eq!(names, vec!["Harju", "Tartu"]);
    }

    #[test]
    fn test_duplicate_observations_are_summed() {
        let regions = regions();
        let mut obs = observations();
        obs.push(Observation::new(2020, "37", "Harju", Gender::Male, 10));
        let table = StatTable::from_observations(obs);

        let view = build_view(&table, &regions, 2020, GenderSelection::Male, ALL).unwrap();
        assert_eq!(view[0].natural_increase_total, 510);
    }
}
