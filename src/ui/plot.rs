use serde::Serialize;

use crate::color::{ColorMap, Rgb};
use crate::data::aggregate::{
    outcome_counts, success_rate_by_flight, successes_by_site, FlightRate, OutcomeCount,
    SiteSuccesses,
};
use crate::data::filter::{FilteredView, SiteSelection};
use crate::data::model::Outcome;

// ---------------------------------------------------------------------------
// Plot descriptions handed to the browser-side renderer
// ---------------------------------------------------------------------------

pub const NO_DATA_TITLE: &str = "No data to display";

/// Launch outcomes as a pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PieChart {
    NoData {
        title: String,
    },
    /// Success count per site (all sites, or several selected).
    SuccessBySite {
        title: String,
        slices: Vec<SiteSuccesses>,
    },
    /// Success vs failure split for exactly one selected site.
    OutcomeSplit {
        title: String,
        site: String,
        slices: Vec<OutcomeCount>,
    },
}

pub fn pie_chart(view: &FilteredView<'_>, sites: &SiteSelection) -> PieChart {
    if view.is_empty() {
        return PieChart::NoData {
            title: NO_DATA_TITLE.to_string(),
        };
    }
    match sites.single() {
        Some(site) => PieChart::OutcomeSplit {
            title: format!("Success vs Failure for {site}"),
            site: site.to_string(),
            slices: outcome_counts(view),
        },
        None => PieChart::SuccessBySite {
            title: "Total Success Launches by Site".to_string(),
            slices: successes_by_site(view),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass: f64,
    pub class: Outcome,
    pub flight_number: u32,
    pub booster_version: String,
}

/// One colour group of the scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub category: String,
    pub color: Rgb,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Traces in order of each category's first appearance in the view.
    pub traces: Vec<ScatterTrace>,
}

/// Payload mass against outcome, one point per record. No aggregation, and
/// an empty view is just an empty plot.
pub fn scatter_chart(view: &FilteredView<'_>, colors: &ColorMap) -> ScatterChart {
    let mut traces: Vec<ScatterTrace> = Vec::new();
    for r in view.records() {
        let point = ScatterPoint {
            payload_mass: r.payload_mass,
            class: r.outcome,
            flight_number: r.flight_number,
            booster_version: r.booster_version.clone(),
        };
        match traces.iter_mut().find(|t| t.category == r.booster_category) {
            Some(trace) => trace.points.push(point),
            None => traces.push(ScatterTrace {
                category: r.booster_category.clone(),
                color: colors.color_for(&r.booster_category),
                points: vec![point],
            }),
        }
    }

    ScatterChart {
        title: "Payload vs Success".to_string(),
        x_label: "Payload Mass (kg)".to_string(),
        y_label: "class".to_string(),
        traces,
    }
}

/// Mean success per flight number, connected in flight order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LineChart {
    NoData {
        title: String,
    },
    SuccessRate {
        title: String,
        x_label: String,
        y_label: String,
        markers: bool,
        points: Vec<FlightRate>,
    },
}

pub fn line_chart(view: &FilteredView<'_>) -> LineChart {
    if view.is_empty() {
        return LineChart::NoData {
            title: NO_DATA_TITLE.to_string(),
        };
    }
    LineChart::SuccessRate {
        title: "Success Rate Over Flight Number".to_string(),
        x_label: "Flight Number".to_string(),
        y_label: "Success Rate".to_string(),
        markers: true,
        points: success_rate_by_flight(view),
    }
}
