use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Gender dimension of the statistics table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Code of this gender in the `Sugu` dimension
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "2",
            Gender::Female => "3",
        }
    }

    /// Column header prefix used by the CSV response
    pub fn column_prefix(self) -> &'static str {
        match self {
            Gender::Male => "Mehed",
            Gender::Female => "Naised",
        }
    }

    /// Expected CSV header of this gender's value column
    pub fn column_name(self) -> String {
        format!("{} Loomulik iive", self.column_prefix())
    }

    pub fn from_column(header: &str) -> Option<Self> {
        Gender::ALL
            .into_iter()
            .find(|g| header.trim_start().starts_with(g.column_prefix()))
    }
}

/// One value of natural increase for a year, county and gender.
/// `None` when the service marked the cell as not reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub year: i32,
    pub region_code: String,
    pub region_name: String,
    pub gender: Gender,
    pub natural_increase: Option<i64>,
}

impl Observation {
    pub fn new(
        year: i32,
        region_code: impl Into<String>,
        region_name: impl Into<String>,
        gender: Gender,
        natural_increase: i64,
    ) -> Self {
        Self {
            year,
            region_code: region_code.into(),
            region_name: region_name.into(),
            gender,
            natural_increase: Some(natural_increase),
        }
    }

    pub fn unreported(
        year: i32,
        region_code: impl Into<String>,
        region_name: impl Into<String>,
        gender: Gender,
    ) -> Self {
        Self {
            natural_increase: None,
            ..Self::new(year, region_code, region_name, gender, 0)
        }
    }
}

/// Observations of one response together with the gender value columns
/// and years the table carried
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatTable {
    pub observations: Vec<Observation>,
    pub genders: BTreeSet<Gender>,
    pub years: BTreeSet<i32>,
}

impl StatTable {
    /// Table whose gender columns and years are those of the observations
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self {
            genders: observations.iter().map(|o| o.gender).collect(),
            years: observations.iter().map(|o| o.year).collect(),
            observations,
        }
    }

    /// Gender value columns absent from the table
    pub fn missing_genders(&self) -> Vec<Gender> {
        Gender::ALL
            .into_iter()
            .filter(|g| !self.genders.contains(g))
            .collect()
    }
}

/// Which gender values feed the total of a joined record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderSelection {
    #[default]
    All,
    Male,
    Female,
}

impl GenderSelection {
    pub const ALL: [GenderSelection; 3] = [
        GenderSelection::All,
        GenderSelection::Male,
        GenderSelection::Female,
    ];

    /// Selector label shown to the user
    pub fn label(self) -> &'static str {
        match self {
            GenderSelection::All => "Kõik",
            GenderSelection::Male => "Mehed",
            GenderSelection::Female => "Naised",
        }
    }
}

impl fmt::Display for GenderSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for GenderSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "kõik" => Ok(GenderSelection::All),
            "male" | "mehed" => Ok(GenderSelection::Male),
            "female" | "naised" => Ok(GenderSelection::Female),
            other => Err(format!(
                "unknown gender '{}' (expected all, male or female)",
                other
            )),
        }
    }
}

/// Restricts a view to a single canonical region name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Only(String),
}

impl RegionFilter {
    /// Build a filter from a selector value, treating the sentinel as `All`
    pub fn from_selection(value: Option<&str>) -> Self {
        match value {
            None => RegionFilter::All,
            Some(v) if v == crate::region::ALL_REGIONS_LABEL => RegionFilter::All,
            Some(v) => RegionFilter::Only(v.to_string()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(wanted) => wanted == name,
        }
    }
}
