use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::geometry::{load_regions, Region};
use crate::region::ALL_REGIONS_LABEL;
use crate::scale::ColorScale;
use crate::stat::{StatClient, StatQuery, Transport};
use crate::types::{GenderSelection, Observation, RegionFilter, StatTable};
use crate::ui::{Phase, Ui};
use crate::view::{build_view, JoinedRecord};

/// User choices that determine one rendered view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub year: i32,
    pub gender: GenderSelection,
    pub region: RegionFilter,
}

impl Selection {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            gender: GenderSelection::All,
            region: RegionFilter::All,
        }
    }
}

/// Records to draw plus the colour scale of the unfiltered view
#[derive(Debug)]
pub struct ViewSnapshot<'a> {
    pub records: Vec<JoinedRecord<'a>>,
    pub scale: Option<ColorScale>,
}

/// Observations and boundaries loaded once for the lifetime of the program
pub struct Session {
    table: StatTable,
    regions: Vec<Region>,
}

impl Session {
    pub fn new(table: StatTable, regions: Vec<Region>) -> Self {
        Self { table, regions }
    }

    /// Fetch the statistics and load the boundary file
    pub fn load<T: Transport>(
        client: &StatClient<T>,
        query: &StatQuery,
        geometry_path: &Path,
        name_property: &str,
        ui: &mut impl Ui,
    ) -> Result<Self> {
        ui.set_phase(Phase::Fetching);
        ui.set_info(client.url());
        let table = client.fetch_observations(query)?;
        ui.log(format!("Fetched {} observations", table.observations.len()));

        ui.set_phase(Phase::LoadingRegions);
        ui.set_info(geometry_path.display().to_string());
        let regions = load_regions(geometry_path, name_property)?;
        ui.log(format!("Loaded {} regions", regions.len()));

        ui.set_phase(Phase::Ready);
        ui.set_info("Andmed edukalt laetud!");
        info!(
            "Session ready: {} observations, {} regions",
            table.observations.len(),
            regions.len()
        );

        Ok(Self::new(table, regions))
    }

    pub fn observations(&self) -> &[Observation] {
        &self.table.observations
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Years present in the response, ascending
    pub fn years(&self) -> Vec<i32> {
        self.table.years.iter().copied().collect()
    }

    /// Region selector entries: the "all regions" sentinel, then every
    /// county present in the view for this year
    pub fn region_options(&self, year: i32, gender: GenderSelection) -> Result<Vec<String>> {
        let full = build_view(
            &self.table,
            &self.regions,
            year,
            gender,
            &RegionFilter::All,
        )?;
        let mut options = vec![ALL_REGIONS_LABEL.to_string()];
        options.extend(full.into_iter().map(|r| r.region_name));
        Ok(options)
    }

    /// Build the view for a selection.
    ///
    /// The colour scale is always computed over every county of the year,
    /// before the region filter is applied.
    pub fn render(&self, selection: &Selection) -> Result<ViewSnapshot<'_>> {
        let mut records = build_view(
            &self.table,
            &self.regions,
            selection.year,
            selection.gender,
            &RegionFilter::All,
        )?;
        let scale = ColorScale::from_records(&records);
        records.retain(|r| selection.region.matches(&r.region_name));

        Ok(ViewSnapshot { records, scale })
    }
}
