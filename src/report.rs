use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::json;

use crate::types::RegionFilter;
use crate::view::JoinedRecord;

pub const VALUE_LABEL: &str = "Loomulik iive";
pub const NO_DATA_MESSAGE: &str = "Valitud piirkonnal puuduvad andmed.";

/// Heading for a map of one year
pub fn map_title(year: i32, region: &RegionFilter) -> String {
    match region {
        RegionFilter::All => format!("{} maakonniti aastal {}", VALUE_LABEL, year),
        RegionFilter::Only(name) => {
            format!("{} maakonnas {} aastal {}", VALUE_LABEL, name, year)
        }
    }
}

/// Plain-text table with 1-based row numbers
pub fn format_table(records: &[JoinedRecord<'_>]) -> String {
    let name_width = records
        .iter()
        .map(|r| r.region_name.chars().count())
        .chain(std::iter::once("Maakond".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!(
        "{:>3}  {:<width$}  {:>13}\n",
        "",
        "Maakond",
        VALUE_LABEL,
        width = name_width
    );
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<width$}  {:>13}\n",
            i + 1,
            record.region_name,
            record.natural_increase_total,
            width = name_width
        ));
    }
    out
}

/// Convert a view into features with the county name and values as properties
pub fn to_feature_collection(records: &[JoinedRecord<'_>]) -> FeatureCollection {
    let features = records
        .iter()
        .map(|record| {
            let mut properties = JsonObject::new();
            properties.insert("Maakond".to_string(), json!(record.region_name));
            properties.insert("Aasta".to_string(), json!(record.year));
            properties.insert(VALUE_LABEL.to_string(), json!(record.natural_increase_total));
            properties.insert("Mehed".to_string(), json!(record.natural_increase_male));
            properties.insert("Naised".to_string(), json!(record.natural_increase_female));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(record.geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
