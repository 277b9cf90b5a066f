use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;
use crate::ui::callbacks;

// ---------------------------------------------------------------------------
// Router: page, control description and one route per output
// ---------------------------------------------------------------------------

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        // Page
        .route("/", get(callbacks::index))
        .route("/health", get(callbacks::health))
        // Controls
        .route("/api/controls", get(callbacks::controls))
        // Callbacks
        .route("/api/summary", post(callbacks::summary))
        .route("/api/charts/pie", post(callbacks::pie))
        .route("/api/charts/scatter", post(callbacks::scatter))
        .route("/api/charts/line", post(callbacks::line))
        .route("/api/dashboard", post(callbacks::dashboard))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::data::model::{record, LaunchDataset, Outcome};
    use crate::state::AppState;

    fn router() -> Router {
        let dataset = LaunchDataset::from_records(vec![
            record(1, "S1", 500.0, "FT", Outcome::Success),
            record(2, "S2", 9000.0, "B4", Outcome::Failure),
        ])
        .unwrap();
        build_router(AppState::new(dataset).unwrap().shared())
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(uri, "application/json", body.to_string()).await
    }

    async fn post_raw(uri: &str, content_type: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn serves_the_page() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("site-dropdown"));
    }

    #[tokio::test]
    async fn summary_for_full_selection() {
        let (status, body) = post_json(
            "/api/summary",
            json!({ "sites": ["ALL"], "category": "ALL", "payload": [0.0, 10000.0] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_launches"], 2);
        assert_eq!(body["successes"], 1);
        assert_eq!(body["lines"][2], "Success Rate: 50.00%");
    }

    #[tokio::test]
    async fn empty_selection_degrades_every_view() {
        let (status, body) = post_json("/api/dashboard", json!({ "payload": [20000.0, 30000.0] })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["total_launches"], 0);
        assert_eq!(body["summary"]["lines"][2], "Success Rate: 0.00%");
        assert_eq!(body["pie"]["mode"], "no_data");
        assert_eq!(body["pie"]["title"], "No data to display");
        assert_eq!(body["line"]["mode"], "no_data");
        assert_eq!(body["scatter"]["traces"], json!([]));
    }

    #[tokio::test]
    async fn single_site_pie_splits_by_class() {
        let (status, body) = post_json("/api/charts/pie", json!({ "sites": ["S1"] })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "outcome_split");
        assert_eq!(body["slices"], json!([{ "class": 1, "count": 1 }]));
    }

    #[tokio::test]
    async fn scatter_and_line_follow_the_filter() {
        let (_, scatter) = post_json("/api/charts/scatter", json!({ "category": "B4" })).await;
        assert_eq!(scatter["traces"][0]["category"], "B4");
        assert_eq!(scatter["traces"][0]["points"][0]["flight_number"], 2);

        let (_, line) = post_json("/api/charts/line", json!({})).await;
        assert_eq!(line["mode"], "success_rate");
        assert_eq!(line["points"], json!([
            { "flight_number": 1, "success_rate": 1.0 },
            { "flight_number": 2, "success_rate": 0.0 },
        ]));
    }

    #[tokio::test]
    async fn inverted_range_is_a_bad_request() {
        let (status, body) = post_json("/api/summary", json!({ "payload": [9000.0, 10.0] })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("invalid payload range"));
    }

    #[tokio::test]
    async fn wrongly_typed_field_gets_a_json_error() {
        let (status, body) = post_json("/api/dashboard", json!({ "sites": "S1" })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().starts_with("malformed request body"));
    }

    #[tokio::test]
    async fn unparsable_body_gets_a_json_error() {
        let (status, body) = post_raw("/api/summary", "application/json", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_content_type_gets_a_json_error() {
        let (status, body) = post_raw("/api/charts/line", "text/plain", "{}".to_string()).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body["error"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn controls_describe_the_widgets() {
        let request = Request::builder().uri("/api/controls").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["payload"]["value"], json!([500.0, 9000.0]));
        assert_eq!(body["site_options"][2]["value"], "ALL");
    }
}
