use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredView;
use super::model::Outcome;

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_launches: usize,
    pub successes: usize,
    /// Percentage in `[0, 100]`; zero when nothing matched.
    pub success_rate: f64,
}

impl Summary {
    pub fn of(view: &FilteredView<'_>) -> Self {
        let total_launches = view.len();
        let successes = view
            .records()
            .iter()
            .filter(|r| r.outcome.is_success())
            .count();
        let success_rate = if total_launches > 0 {
            successes as f64 / total_launches as f64 * 100.0
        } else {
            0.0
        };
        Summary {
            total_launches,
            successes,
            success_rate,
        }
    }

    /// The three text lines shown above the charts.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Total Launches: {}", self.total_launches),
            format!("Successful Launches: {}", self.successes),
            format!("Success Rate: {:.2}%", self.success_rate),
        ]
    }
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSuccesses {
    pub site: String,
    pub successes: usize,
}

/// Sum of outcome class per launch site, sites in order of first appearance.
/// Sites without a single success still get a (zero) entry.
pub fn successes_by_site(view: &FilteredView<'_>) -> Vec<SiteSuccesses> {
    let mut out: Vec<SiteSuccesses> = Vec::new();
    for r in view.records() {
        let idx = match out.iter().position(|s| s.site == r.launch_site) {
            Some(idx) => idx,
            None => {
                out.push(SiteSuccesses {
                    site: r.launch_site.clone(),
                    successes: 0,
                });
                out.len() - 1
            }
        };
        out[idx].successes += usize::from(r.outcome.class());
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeCount {
    pub class: Outcome,
    pub count: usize,
}

/// Count of each outcome class present in the view, most frequent first.
/// Classes that never occur are omitted.
pub fn outcome_counts(view: &FilteredView<'_>) -> Vec<OutcomeCount> {
    let mut counts: BTreeMap<Outcome, usize> = BTreeMap::new();
    for r in view.records() {
        *counts.entry(r.outcome).or_default() += 1;
    }
    let mut out: Vec<OutcomeCount> = counts
        .into_iter()
        .map(|(class, count)| OutcomeCount { class, count })
        .collect();
    // Stable sort keeps ascending class order among ties.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlightRate {
    pub flight_number: u32,
    /// Mean outcome class of all rows sharing this flight number.
    pub success_rate: f64,
}

/// Mean outcome class per flight number, ascending by flight number.
pub fn success_rate_by_flight(view: &FilteredView<'_>) -> Vec<FlightRate> {
    let mut groups: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for r in view.records() {
        let (sum, n) = groups.entry(r.flight_number).or_default();
        *sum += usize::from(r.outcome.class());
        *n += 1;
    }
    groups
        .into_iter()
        .map(|(flight_number, (sum, n))| FlightRate {
            flight_number,
            success_rate: sum as f64 / n as f64,
        })
        .collect()
}
