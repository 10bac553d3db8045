//! Selector state for the dashboard, independent of the terminal

use crate::pipeline::Selection;
use crate::region::ALL_REGIONS_LABEL;
use crate::scale::Palette;
use crate::types::{GenderSelection, RegionFilter};

/// Which selector arrow keys act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Year,
    Gender,
    Region,
    Palette,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Year, Focus::Gender, Focus::Region, Focus::Palette];

    fn index(self) -> usize {
        Focus::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Selectors {
    years: Vec<i32>,
    year_idx: usize,
    gender_idx: usize,
    regions: Vec<String>,
    region_idx: usize,
    palette_idx: usize,
    focus: Focus,
}

impl Selectors {
    /// Start on the first year with all regions and both genders
    pub fn new(years: Vec<i32>) -> Self {
        Self {
            years,
            year_idx: 0,
            gender_idx: 0,
            regions: vec![ALL_REGIONS_LABEL.to_string()],
            region_idx: 0,
            palette_idx: 0,
            focus: Focus::Year,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn next_focus(&mut self) {
        self.focus = Focus::ORDER[(self.focus.index() + 1) % Focus::ORDER.len()];
    }

    pub fn prev_focus(&mut self) {
        let len = Focus::ORDER.len();
        self.focus = Focus::ORDER[(self.focus.index() + len - 1) % len];
    }

    /// Move the focused selector by `delta` entries, wrapping around.
    /// Returns true when the selected value changed.
    pub fn shift(&mut self, delta: isize) -> bool {
        let (idx, len) = match self.focus {
            Focus::Year => (&mut self.year_idx, self.years.len()),
            Focus::Gender => (&mut self.gender_idx, GenderSelection::ALL.len()),
            Focus::Region => (&mut self.region_idx, self.regions.len()),
            Focus::Palette => (&mut self.palette_idx, Palette::ALL.len()),
        };
        if len <= 1 {
            return false;
        }
        let next = (*idx as isize + delta).rem_euclid(len as isize) as usize;
        let changed = next != *idx;
        *idx = next;
        changed
    }

    /// Replace the region entries, keeping the current region if it is
    /// still offered
    pub fn set_region_options(&mut self, regions: Vec<String>) {
        let current = self.regions.get(self.region_idx).cloned();
        self.region_idx = current
            .and_then(|name| regions.iter().position(|r| *r == name))
            .unwrap_or(0);
        self.regions = regions;
    }

    pub fn year(&self) -> Option<i32> {
        self.years.get(self.year_idx).copied()
    }

    pub fn gender(&self) -> GenderSelection {
        GenderSelection::ALL[self.gender_idx]
    }

    pub fn region_label(&self) -> &str {
        self.regions
            .get(self.region_idx)
            .map(String::as_str)
            .unwrap_or(ALL_REGIONS_LABEL)
    }

    pub fn palette(&self) -> Palette {
        Palette::ALL[self.palette_idx]
    }

    /// Current selection, `None` when there is no data at all
    pub fn selection(&self) -> Option<Selection> {
        Some(Selection {
            year: self.year()?,
            gender: self.gender(),
            region: RegionFilter::from_selection(Some(self.region_label())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_selection() {
        let selectors = Selectors::new(vec![2014, 2015]);
        let selection = selectors.selection().unwrap();
        assert_eq!(selection.year, 2014);
        assert_eq!(selection.gender, GenderSelection::All);
        assert_eq!(selection.region, RegionFilter::All);
        assert_eq!(selectors.palette(), Palette::Viridis);
    }

    #[test]
    fn test_no_years() {
        assert!(Selectors::new(vec![]).selection().is_none());
    }

    #[test]
    fn test_focus_cycle() {
        let mut selectors = Selectors::new(vec![2014]);
        selectors.next_focus();
        assert_eq!(selectors.focus(), Focus::Gender);
        selectors.prev_focus();
        selectors.prev_focus();
        assert_eq!(selectors.focus(), Focus::Palette);
    }

    #[test]
    fn test_shift_wraps() {
        let mut selectors = Selectors::new(vec![2014, 2015, 2016]);
        assert!(selectors.shift(-1));
        assert_eq!(selectors.year(), Some(2016));
        assert!(selectors.shift(1));
        assert_eq!(selectors.year(), Some(2014));

        selectors.next_focus();
        selectors.shift(2);
        assert_eq!(selectors.gender(), GenderSelection::Female);

        // a single entry never changes
        selectors.next_focus();
        assert!(!selectors.shift(1));
    }

    #[test]
    fn test_region_options_keep_current() {
        let mut selectors = Selectors::new(vec![2020]);
        selectors.set_region_options(vec![
            ALL_REGIONS_LABEL.to_string(),
            "Harju".to_string(),
            "Tartu".to_string(),
        ]);
        selectors.next_focus();
        selectors.next_focus();
        selectors.shift(2);
        assert_eq!(selectors.region_label(), "Tartu");

        selectors.set_region_options(vec![
            ALL_REGIONS_LABEL.to_string(),
            "Tartu".to_string(),
        ]);
        assert_eq!(selectors.region_label(), "Tartu");
        assert_eq!(
            selectors.selection().unwrap().region,
            RegionFilter::Only("Tartu".to_string())
        );

        selectors.set_region_options(vec![ALL_REGIONS_LABEL.to_string()]);
        assert_eq!(selectors.region_label(), ALL_REGIONS_LABEL);
    }
}
