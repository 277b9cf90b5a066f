//! One handler per dashboard output. Each takes the posted control values,
//! filters the full dataset from scratch and returns a single view.

use axum::extract::{FromRequest, State};
use axum::response::Html;
use axum::Json;
use serde::Serialize;

use super::panels::Controls;
use super::plot::{line_chart, pie_chart, scatter_chart, LineChart, PieChart, ScatterChart};
use crate::data::aggregate::Summary;
use crate::data::filter::{apply, FilteredView, Selection, SelectionRequest};
use crate::error::ApiError;
use crate::state::{AppState, SharedState};

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: Summary,
    pub lines: [String; 3],
}

impl From<Summary> for SummaryResponse {
    fn from(summary: Summary) -> Self {
        Self {
            lines: summary.lines(),
            summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub summary: SummaryResponse,
    pub pie: PieChart,
    pub scatter: ScatterChart,
    pub line: LineChart,
}

/// `Json` whose rejections are answered like any other [`ApiError`]: logged,
/// and returned as a JSON `{"error": ...}` body the page can show.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Resolve the request and filter the full dataset.
fn filter<'a>(
    state: &'a AppState,
    request: SelectionRequest,
    output: &str,
) -> Result<(Selection, FilteredView<'a>), ApiError> {
    let selection = request.resolve(&state.dataset)?;
    let view = apply(&state.dataset, &selection);
    log::debug!("{output}: {selection:?} -> {} rows", view.len());
    Ok((selection, view))
}

/// GET / - the dashboard page
pub async fn index(State(state): State<SharedState>) -> Html<String> {
    Html(state.page.clone())
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// GET /api/controls - widget options and defaults
pub async fn controls(State(state): State<SharedState>) -> Json<Controls> {
    Json(Controls::for_dataset(&state.dataset))
}

/// POST /api/summary
pub async fn summary(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SelectionRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let (_, view) = filter(&state, request, "summary")?;
    Ok(Json(Summary::of(&view).into()))
}

/// POST /api/charts/pie
pub async fn pie(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SelectionRequest>,
) -> Result<Json<PieChart>, ApiError> {
    let (selection, view) = filter(&state, request, "pie")?;
    Ok(Json(pie_chart(&view, &selection.sites)))
}

/// POST /api/charts/scatter
pub async fn scatter(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SelectionRequest>,
) -> Result<Json<ScatterChart>, ApiError> {
    let (_, view) = filter(&state, request, "scatter")?;
    Ok(Json(scatter_chart(&view, &state.color_map)))
}

/// POST /api/charts/line
pub async fn line(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SelectionRequest>,
) -> Result<Json<LineChart>, ApiError> {
    let (_, view) = filter(&state, request, "line")?;
    Ok(Json(line_chart(&view)))
}

/// POST /api/dashboard - every output for one interaction
pub async fn dashboard(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SelectionRequest>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let (selection, view) = filter(&state, request, "dashboard")?;
    Ok(Json(DashboardResponse {
        summary: Summary::of(&view).into(),
        pie: pie_chart(&view, &selection.sites),
        scatter: scatter_chart(&view, &state.color_map),
        line: line_chart(&view),
    }))
}
