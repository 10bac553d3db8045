use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::error::{IiveError, Result};
use crate::region::region_code_for;
use crate::types::{Gender, Observation, StatTable};

pub const YEAR_COLUMN: &str = "Aasta";
pub const REGION_COLUMN: &str = "Maakond";

/// Cell values the service uses for "no data"
const MISSING_MARKERS: &[&str] = &["", "..", "...", "-"];

const BOM: &str = "\u{feff}";

/// Decode a response body as UTF-8, dropping a leading byte-order mark
pub fn decode_body(body: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(body)
        .map_err(|e| IiveError::data_format(format!("response is not UTF-8: {}", e)))?;
    Ok(text.strip_prefix(BOM).unwrap_or(text))
}

/// Parse the CSV table into one observation per year, county and gender.
///
/// The table is wide: `Aasta`, `Maakond`, then one value column per gender
/// (`Mehed ...`, `Naised ...`). The gender columns found are recorded in the
/// table so the joiner can reject a response lacking one. Cells marked as not
/// reported become observations without a value. Counties outside the
/// requested list are kept without a code and left for the join to drop.
pub fn parse_observations(text: &str) -> Result<StatTable> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IiveError::data_format(format!("unreadable header row: {}", e)))?
        .clone();

    let year_idx = column_index(&headers, YEAR_COLUMN)?;
    let region_idx = column_index(&headers, REGION_COLUMN)?;
    let gender_columns: Vec<(usize, Gender)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| Gender::from_column(h).map(|g| (idx, g)))
        .collect();

    debug!(
        "CSV columns: {:?}, gender columns: {}",
        headers,
        gender_columns.len()
    );

    let mut table = StatTable {
        genders: gender_columns.iter().map(|&(_, g)| g).collect(),
        ..StatTable::default()
    };

    for (line, result) in reader.records().enumerate() {
        // header is line 1
        let line = line + 2;
        let record = result
            .map_err(|e| IiveError::data_format(format!("line {}: {}", line, e)))?;

        let year_cell = field(&record, year_idx, line)?;
        let year: i32 = year_cell.parse().map_err(|_| {
            IiveError::data_format(format!("line {}: invalid year '{}'", line, year_cell))
        })?;

        table.years.insert(year);

        let region_name = field(&record, region_idx, line)?;
        let region_code = region_code_for(region_name).unwrap_or_else(|| {
            warn!("line {}: unknown county '{}'", line, region_name);
            ""
        });

        for &(idx, gender) in &gender_columns {
            let cell = field(&record, idx, line)?;
            if MISSING_MARKERS.contains(&cell) {
                table.observations.push(Observation::unreported(
                    year,
                    region_code,
                    region_name,
                    gender,
                ));
                continue;
            }
            let value: i64 = cell.parse().map_err(|_| {
                IiveError::data_format(format!(
                    "line {}: invalid value '{}' in column '{}'",
                    line, cell, &headers[idx]
                ))
            })?;

            table.observations.push(Observation::new(
                year,
                region_code,
                region_name,
                gender,
                value,
            ));
        }
    }

    Ok(table)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| IiveError::data_format(format!("missing column '{}'", name)))
}

fn field<'r>(record: &'r StringRecord, idx: usize, line: usize) -> Result<&'r str> {
    record
        .get(idx)
        .ok_or_else(|| IiveError::data_format(format!("line {}: too few fields", line)))
}
