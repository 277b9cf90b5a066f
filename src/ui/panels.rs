use minijinja::{context, Environment};
use serde::Serialize;

use crate::data::filter::ALL;
use crate::data::model::LaunchDataset;

const PAGE_TEMPLATE: &str = include_str!("../../templates/dashboard.html");

// ---------------------------------------------------------------------------
// Control surface – what the page's widgets offer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    fn new(value: &str) -> Self {
        Self {
            label: value.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
    /// Initial handles: the dataset's payload bounds.
    pub value: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controls {
    /// Sites in order of first appearance, then `ALL`.
    pub site_options: Vec<DropdownOption>,
    pub site_default: Vec<String>,
    /// Categories in order of first appearance, then `ALL`.
    pub category_options: Vec<DropdownOption>,
    pub category_default: String,
    pub payload: RangeSlider,
}

impl Controls {
    pub fn for_dataset(dataset: &LaunchDataset) -> Self {
        let with_all = |values: &[String]| -> Vec<DropdownOption> {
            values
                .iter()
                .map(|v| DropdownOption::new(v))
                .chain(std::iter::once(DropdownOption::new(ALL)))
                .collect()
        };

        let marks = [0.0, 2500.0, 5000.0, 7500.0, 10000.0]
            .into_iter()
            .map(|value| SliderMark {
                value,
                label: format!("{value}"),
            })
            .collect();

        Controls {
            site_options: with_all(dataset.launch_sites()),
            site_default: vec![ALL.to_string()],
            category_options: with_all(dataset.categories()),
            category_default: ALL.to_string(),
            payload: RangeSlider {
                min: 0.0,
                max: 10000.0,
                step: 1000.0,
                marks,
                value: [dataset.min_payload(), dataset.max_payload()],
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Render the dashboard page with its controls populated from the dataset.
pub fn render_page(dataset: &LaunchDataset) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("dashboard.html", PAGE_TEMPLATE)?;
    let template = env.get_template("dashboard.html")?;
    template.render(context! {
        title => "SpaceX Launch Records Dashboard",
        controls => Controls::for_dataset(dataset),
    })
}
