use serde::Serialize;
use std::collections::BTreeSet;

use crate::region::county_codes;
use crate::types::Gender;

/// Years the dashboard covers
pub const FIRST_YEAR: i32 = 2014;
pub const LAST_YEAR: i32 = 2023;

/// Filter sets sent to the statistics service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatQuery {
    pub years: BTreeSet<i32>,
    pub regions: BTreeSet<String>,
    pub genders: BTreeSet<Gender>,
}

impl StatQuery {
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        regions: impl IntoIterator<Item = impl Into<String>>,
        genders: impl IntoIterator<Item = Gender>,
    ) -> Self {
        Self {
            years: years.into_iter().collect(),
            regions: regions.into_iter().map(Into::into).collect(),
            genders: genders.into_iter().collect(),
        }
    }

    /// Build the PxWeb request body
    pub fn payload(&self) -> QueryPayload {
        QueryPayload {
            query: vec![
                Dimension::items("Aasta", self.years.iter().map(|y| y.to_string())),
                Dimension::items("Maakond", self.regions.iter().cloned()),
                Dimension::items("Sugu", self.genders.iter().map(|g| g.code().to_string())),
            ],
            response: ResponseFormat {
                format: "csv".to_string(),
            },
        }
    }
}

impl Default for StatQuery {
    /// The fixed query: every supported year, county and gender
    fn default() -> Self {
        Self::new(FIRST_YEAR..=LAST_YEAR, county_codes(), Gender::ALL)
    }
}

#[derive(Debug, Serialize)]
pub struct QueryPayload {
    pub query: Vec<Dimension>,
    pub response: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub struct Dimension {
    pub code: String,
    pub selection: Selection,
}

impl Dimension {
    fn items(code: &str, values: impl Iterator<Item = String>) -> Self {
        Self {
            code: code.to_string(),
            selection: Selection {
                filter: "item".to_string(),
                values: values.collect(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Selection {
    pub filter: String,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    pub format: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_payload_shape() {
        let payload = serde_json::to_value(StatQuery::default().payload()).unwrap();

        let dims = payload["query"].as_array().unwrap();
        assert_eq!(dims.len(), 3);
        assert_eq!(dims[0]["code"], "Aasta");
        assert_eq!(dims[0]["selection"]["values"].as_array().unwrap().len(), 10);
        assert_eq!(dims[0]["selection"]["values"][0], "2014");
        assert_eq!(dims[1]["code"], "Maakond");
        assert_eq!(dims[1]["selection"]["values"].as_array().unwrap().len(), 15);
        assert_eq!(dims[2]["code"], "Sugu");
        assert_eq!(dims[2]["selection"]["values"], json!(["2", "3"]));
        assert_eq!(payload["response"], json!({"format": "csv"}));
    }

    #[test]
    fn test_custom_query() {
        let query = StatQuery::new([2020], ["37"], [Gender::Female]);
        let payload = serde_json::to_value(query.payload()).unwrap();
        assert_eq!(payload["query"][0]["selection"]["filter"], "item");
        assert_eq!(payload["query"][1]["selection"]["values"], json!(["37"]));
        assert_eq!(payload["query"][2]["selection"]["values"], json!(["3"]));
    }
}
