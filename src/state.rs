use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::model::LaunchDataset;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the handlers read. Built once at startup and never mutated,
/// so concurrent requests share it without locking.
pub struct AppState {
    /// The loaded dataset.
    pub dataset: LaunchDataset,

    /// Booster category → colour, fixed for the process lifetime.
    pub color_map: ColorMap,

    /// Rendered dashboard page.
    pub page: String,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Ingest the loaded dataset, derive colours and render the page.
    pub fn new(dataset: LaunchDataset) -> Result<Self, minijinja::Error> {
        let color_map = ColorMap::new(dataset.categories());
        let page = panels::render_page(&dataset)?;
        Ok(Self {
            dataset,
            color_map,
            page,
        })
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
