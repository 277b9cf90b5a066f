use std::collections::BTreeSet;

use serde::Deserialize;

use super::model::{LaunchDataset, LaunchRecord};
use crate::error::ApiError;

/// Wire token the controls use for "no restriction".
pub const ALL: &str = "ALL";

// ---------------------------------------------------------------------------
// Selection state: what the controls currently ask for
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SiteSelection {
    AllSites,
    /// Union of the named sites. An empty set matches nothing.
    SpecificSites(BTreeSet<String>),
}

impl SiteSelection {
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::AllSites => true,
            SiteSelection::SpecificSites(sites) => sites.contains(site),
        }
    }

    /// The site name when exactly one site is selected.
    pub fn single(&self) -> Option<&str> {
        match self {
            SiteSelection::SpecificSites(sites) if sites.len() == 1 => {
                sites.iter().next().map(String::as_str)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategorySelection {
    AllCategories,
    Category(String),
}

impl CategorySelection {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategorySelection::AllCategories => true,
            CategorySelection::Category(c) => c == category,
        }
    }
}

/// Inclusive payload window `[lo, hi]` in kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    lo: f64,
    hi: f64,
}

impl PayloadRange {
    pub fn new(lo: f64, hi: f64) -> Result<Self, ApiError> {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(ApiError::InvalidRange { lo, hi });
        }
        Ok(PayloadRange { lo, hi })
    }

    pub fn contains(&self, mass: f64) -> bool {
        self.lo <= mass && mass <= self.hi
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub sites: SiteSelection,
    pub category: CategorySelection,
    pub payload: PayloadRange,
}

impl Selection {
    /// The controls' initial state: every site, every category, the full
    /// payload span of the dataset.
    pub fn everything(dataset: &LaunchDataset) -> Self {
        Selection {
            sites: SiteSelection::AllSites,
            category: CategorySelection::AllCategories,
            payload: PayloadRange {
                lo: dataset.min_payload(),
                hi: dataset.max_payload(),
            },
        }
    }

    /// Whether a single record survives every filter step.
    pub fn admits(&self, record: &LaunchRecord) -> bool {
        self.payload.contains(record.payload_mass)
            && self.sites.matches(&record.launch_site)
            && self.category.matches(&record.booster_category)
    }
}

// ---------------------------------------------------------------------------
// Wire form of the selection, as posted by the page
// ---------------------------------------------------------------------------

/// Control values as the browser sends them. `"ALL"` is only meaningful here;
/// it is turned into the tagged variants by [`SelectionRequest::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectionRequest {
    pub sites: Option<Vec<String>>,
    pub category: Option<String>,
    pub payload: Option<[f64; 2]>,
}

impl SelectionRequest {
    /// Resolve against the dataset; absent fields take the control defaults.
    pub fn resolve(self, dataset: &LaunchDataset) -> Result<Selection, ApiError> {
        let defaults = Selection::everything(dataset);

        let sites = match self.sites {
            None => defaults.sites,
            Some(list) if list.iter().any(|s| s == ALL) => SiteSelection::AllSites,
            Some(list) => SiteSelection::SpecificSites(list.into_iter().collect()),
        };

        let category = match self.category {
            None => defaults.category,
            Some(c) if c == ALL => CategorySelection::AllCategories,
            Some(c) => CategorySelection::Category(c),
        };

        let payload = match self.payload {
            None => defaults.payload,
            Some([lo, hi]) => PayloadRange::new(lo, hi)?,
        };

        Ok(Selection {
            sites,
            category,
            payload,
        })
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Records that survived a [`Selection`], in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: Vec<&'a LaunchRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn records(&self) -> &[&'a LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Return indices of records that pass the selection.
///
/// Steps, each narrowing the previous result:
/// * payload mass within `[lo, hi]`, both ends inclusive
/// * launch site in the selected set, unless every site is selected
/// * booster category equal to the selected one, unless every category is selected
pub fn filtered_indices(dataset: &LaunchDataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.admits(r))
        .map(|(i, _)| i)
        .collect()
}

/// Filter the full dataset. Always starts from the complete table.
pub fn apply<'a>(dataset: &'a LaunchDataset, selection: &Selection) -> FilteredView<'a> {
    let records = filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| &dataset.records()[i])
        .collect();
    FilteredView { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{record, Outcome};

    fn two_sites() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record(1, "S1", 500.0, "FT", Outcome::Success),
            record(2, "S2", 9000.0, "B4", Outcome::Failure),
        ])
        .unwrap()
    }

    fn sample() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record(1, "CCAFS LC-40", 0.0, "v1.0", Outcome::Failure),
            record(2, "CCAFS LC-40", 525.0, "v1.0", Outcome::Failure),
            record(3, "VAFB SLC-4E", 500.0, "v1.1", Outcome::Failure),
            record(4, "KSC LC-39A", 2490.0, "FT", Outcome::Success),
            record(5, "KSC LC-39A", 5300.0, "FT", Outcome::Success),
            record(6, "CCAFS SLC-40", 3600.0, "FT", Outcome::Failure),
            record(7, "VAFB SLC-4E", 9600.0, "B4", Outcome::Success),
            record(8, "KSC LC-39A", 3000.0, "B5", Outcome::Success),
        ])
        .unwrap()
    }

    fn select(sites: SiteSelection, category: CategorySelection, lo: f64, hi: f64) -> Selection {
        Selection {
            sites,
            category,
            payload: PayloadRange::new(lo, hi).unwrap(),
        }
    }

    fn specific(names: &[&str]) -> SiteSelection {
        SiteSelection::SpecificSites(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn full_range_keeps_everything() {
        let ds = two_sites();
        let view = apply(&ds, &Selection::everything(&ds));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn narrowed_range_drops_light_payloads() {
        let ds = two_sites();
        let sel = select(SiteSelection::AllSites, CategorySelection::AllCategories, 600.0, 10000.0);
        let view = apply(&ds, &sel);
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0].launch_site, "S2");
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let ds = sample();
        let sel = select(SiteSelection::AllSites, CategorySelection::AllCategories, 525.0, 5300.0);
        let flights: Vec<u32> = apply(&ds, &sel).records().iter().map(|r| r.flight_number).collect();
        assert_eq!(flights, vec![2, 4, 5, 6, 8]);

        let point = select(SiteSelection::AllSites, CategorySelection::AllCategories, 9600.0, 9600.0);
        assert_eq!(filtered_indices(&ds, &point), vec![6]);
    }

    #[test]
    fn multi_site_selection_is_a_union() {
        let ds = sample();
        let any = CategorySelection::AllCategories;
        let a = filtered_indices(&ds, &select(specific(&["KSC LC-39A"]), any.clone(), 0.0, 10000.0));
        let b = filtered_indices(&ds, &select(specific(&["VAFB SLC-4E"]), any.clone(), 0.0, 10000.0));
        let both = filtered_indices(
            &ds,
            &select(specific(&["KSC LC-39A", "VAFB SLC-4E"]), any, 0.0, 10000.0),
        );

        let mut union: Vec<usize> = a.into_iter().chain(b).collect();
        union.sort_unstable();
        assert_eq!(both, union);
    }

    #[test]
    fn category_is_an_exact_match() {
        let ds = sample();
        let sel = select(
            SiteSelection::AllSites,
            CategorySelection::Category("FT".to_string()),
            0.0,
            10000.0,
        );
        assert_eq!(filtered_indices(&ds, &sel), vec![3, 4, 5]);
    }

    #[test]
    fn all_steps_narrow_together() {
        let ds = sample();
        let sel = select(
            specific(&["KSC LC-39A", "CCAFS SLC-40"]),
            CategorySelection::Category("FT".to_string()),
            3000.0,
            10000.0,
        );
        assert_eq!(filtered_indices(&ds, &sel), vec![4, 5]);
    }

    #[test]
    fn empty_site_set_matches_nothing() {
        let ds = sample();
        let sel = select(specific(&[]), CategorySelection::AllCategories, 0.0, 10000.0);
        assert!(apply(&ds, &sel).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample();
        let sel = select(specific(&["KSC LC-39A", "VAFB SLC-4E"]), CategorySelection::AllCategories, 400.0, 6000.0);
        let once: Vec<LaunchRecord> = apply(&ds, &sel).records().iter().map(|r| (*r).clone()).collect();

        let rebuilt = LaunchDataset::from_records(once.clone()).unwrap();
        let twice: Vec<LaunchRecord> = apply(&rebuilt, &sel).records().iter().map(|r| (*r).clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn request_all_token_wins_over_named_sites() {
        let ds = sample();
        let req = SelectionRequest {
            sites: Some(vec!["KSC LC-39A".to_string(), ALL.to_string()]),
            category: Some(ALL.to_string()),
            payload: Some([0.0, 10000.0]),
        };
        let sel = req.resolve(&ds).unwrap();
        assert_eq!(sel.sites, SiteSelection::AllSites);
        assert_eq!(sel.category, CategorySelection::AllCategories);
    }

    #[test]
    fn request_defaults_to_full_dataset() {
        let ds = sample();
        let sel = SelectionRequest::default().resolve(&ds).unwrap();
        assert_eq!(sel, Selection::everything(&ds));
        assert_eq!(sel.payload, PayloadRange::new(0.0, 9600.0).unwrap());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let ds = sample();
        let req = SelectionRequest {
            payload: Some([5000.0, 100.0]),
            ..Default::default()
        };
        assert!(matches!(req.resolve(&ds), Err(ApiError::InvalidRange { .. })));
    }

    #[test]
    fn single_site_is_detected() {
        assert_eq!(specific(&["S1"]).single(), Some("S1"));
        assert_eq!(specific(&["S1", "S2"]).single(), None);
        assert_eq!(SiteSelection::AllSites.single(), None);
    }
}
