use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Column names of the source table
// ---------------------------------------------------------------------------

pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const COL_CLASS: &str = "class";

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Parse the numeric class value. Anything other than 0 or 1 is rejected.
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())
    }
}

impl Serialize for Outcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.class())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub flight_number: u32,
    pub launch_site: String,
    /// Kilograms, always finite and non-negative.
    pub payload_mass: f64,
    pub booster_version: String,
    pub booster_category: String,
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    launch_sites: Vec<String>,
    /// Distinct booster-version categories in order of first appearance.
    categories: Vec<String>,
    min_payload: f64,
    max_payload: f64,
}

impl LaunchDataset {
    /// Build column indices and payload bounds from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let launch_sites = unique_in_order(records.iter().map(|r| r.launch_site.as_str()));
        let categories = unique_in_order(records.iter().map(|r| r.booster_category.as_str()));

        let (min_payload, max_payload) = records.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), r| (lo.min(r.payload_mass), hi.max(r.payload_mass)),
        );

        Ok(LaunchDataset {
            records,
            launch_sites,
            categories,
            min_payload,
            max_payload,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn launch_sites(&self) -> &[String] {
        &self.launch_sites
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Smallest payload mass over the whole dataset.
    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    /// Largest payload mass over the whole dataset.
    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
pub(crate) fn record(
    flight_number: u32,
    site: &str,
    payload_mass: f64,
    category: &str,
    outcome: Outcome,
) -> LaunchRecord {
    LaunchRecord {
        flight_number,
        launch_site: site.to_string(),
        payload_mass,
        booster_version: format!("F9 {category} B10{flight_number:02}"),
        booster_category: category.to_string(),
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_and_unique_values_follow_first_appearance() {
        let ds = LaunchDataset::from_records(vec![
            record(1, "KSC LC-39A", 2500.0, "FT", Outcome::Success),
            record(2, "CCAFS LC-40", 0.0, "v1.0", Outcome::Failure),
            record(3, "KSC LC-39A", 9600.0, "B4", Outcome::Success),
            record(4, "VAFB SLC-4E", 475.0, "FT", Outcome::Failure),
        ])
        .unwrap();

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 9600.0);
        assert_eq!(ds.launch_sites(), ["KSC LC-39A", "CCAFS LC-40", "VAFB SLC-4E"]);
        assert_eq!(ds.categories(), ["FT", "v1.0", "B4"]);
    }

    #[test]
    fn empty_dataset_is_a_load_failure() {
        assert!(matches!(
            LaunchDataset::from_records(Vec::new()),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn outcome_accepts_only_binary_classes() {
        assert_eq!(Outcome::from_class(0), Some(Outcome::Failure));
        assert_eq!(Outcome::from_class(1), Some(Outcome::Success));
        assert_eq!(Outcome::from_class(2), None);
        assert_eq!(Outcome::from_class(-1), None);
        assert_eq!(serde_json::to_string(&Outcome::Success).unwrap(), "1");
    }
}
