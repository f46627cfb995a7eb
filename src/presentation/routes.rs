// Route table for the dashboard API
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_panel, add_spec, dashboard_events, dashboard_page, get_dashboard, health_check,
    list_datasets, remove_spec, set_specs,
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/healthz", get(health_check))
        .route("/api/datasets", get(list_datasets))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/dashboard/events", get(dashboard_events))
        .route("/api/dashboard/specs", post(add_spec).put(set_specs))
        .route("/api/dashboard/specs/:index", delete(remove_spec))
        .route("/api/dashboard/panels", post(add_panel))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_renderer::DashboardRenderer;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::panel_service::PanelService;
    use crate::domain::chart::{ChartKind, ChartSpec, Layout, Trace};
    use crate::infrastructure::file_source::FileResultSource;
    use crate::infrastructure::html_surface::HtmlSurface;
    use reqwest::StatusCode;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    struct TestServer {
        base: String,
        dashboard: DashboardService,
        client: reqwest::Client,
        _data: TempDir,
    }

    impl TestServer {
        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base, path)
        }
    }

    fn chart(title: &str) -> ChartSpec {
        ChartSpec::new(
            vec![Trace::new(
                ChartKind::Bar,
                "Avg. Net Profit/Loss".to_string(),
                vec!["Strategy A".to_string(), "Strategy B".to_string()],
                vec![10.0, 15.0],
            )],
            Layout::new(title, "Strategy", "Amount ($)"),
        )
        .unwrap()
    }

    async fn start(initial: Vec<ChartSpec>) -> TestServer {
        let data = tempfile::tempdir().unwrap();
        std::fs::write(
            data.path().join("strategy_performance.json"),
            json!([
                { "Strategy_Name": "TMD", "Win_Rate_Percentage": 42.0 },
                { "Strategy_Name": "Pass Line", "Win_Rate_Percentage": 46.0 },
            ])
            .to_string(),
        )
        .unwrap();

        let panel_service = PanelService::new(Arc::new(FileResultSource::new(data.path())));
        let mut renderer = DashboardRenderer::new(HtmlSurface::new("Test Dashboard"));
        renderer.initialize(initial).unwrap();
        let dashboard = DashboardService::spawn(renderer);

        let state = Arc::new(AppState {
            dashboard: dashboard.clone(),
            panel_service,
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(state)).await });

        TestServer {
            base: format!("http://{}", addr),
            dashboard,
            client: reqwest::Client::new(),
            _data: data,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = start(Vec::new()).await;
        let response = server.client.get(server.url("/healthz")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_list_datasets() {
        let server = start(Vec::new()).await;
        let datasets: Vec<String> = server
            .client
            .get(server.url("/api/datasets"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(datasets, vec!["strategy_performance"]);
    }

    #[tokio::test]
    async fn test_put_then_post_specs() {
        let server = start(Vec::new()).await;

        let response = server
            .client
            .put(server.url("/api/dashboard/specs"))
            .json(&vec![chart("A"), chart("B")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = server
            .client
            .post(server.url("/api/dashboard/specs"))
            .json(&chart("C"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = server
            .client
            .get(server.url("/api/dashboard"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let titles: Vec<_> = body["specs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["layout"]["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(body["figures"].as_array().unwrap().len(), 3);
        assert_eq!(body["revision"], 2);
    }

    #[tokio::test]
    async fn test_unknown_chart_kind_is_bad_request() {
        let server = start(vec![chart("Performance")]).await;

        let response = server
            .client
            .post(server.url("/api/dashboard/specs"))
            .json(&json!({
                "traces": [{ "kind": "pie", "label": "x", "categories": ["A"], "values": [1.0] }],
                "layout": {}
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("unknown variant `pie`"));

        let snapshot = server.dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.revision, 1);
        assert_eq!(snapshot.specs.len(), 1);
        assert!(snapshot.error.unwrap().contains("unknown variant `pie`"));
    }

    #[tokio::test]
    async fn test_malformed_spec_list_keeps_dashboard() {
        let server = start(vec![chart("Performance")]).await;

        let response = server
            .client
            .put(server.url("/api/dashboard/specs"))
            .header("content-type", "application/json")
            .body("[{\"traces\": ")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let snapshot = server.dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.specs.len(), 1);
        assert!(snapshot.error.is_some());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_spec() {
        let server = start(vec![chart("A"), chart("B")]).await;

        let response = server
            .client
            .delete(server.url("/api/dashboard/specs/0"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let removed: ChartSpec = response.json().await.unwrap();
        assert_eq!(removed.layout.title, "A");

        let response = server
            .client
            .delete(server.url("/api/dashboard/specs/5"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = server
            .client
            .delete(server.url("/api/dashboard/specs/abc"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());

        let snapshot = server.dashboard.snapshot().await.unwrap();
        let titles: Vec<_> = snapshot.specs.iter().map(|s| s.layout.title.as_str()).collect();
        assert_eq!(titles, vec!["B"]);
        assert!(snapshot.error.is_some());
    }

    #[tokio::test]
    async fn test_add_panel_from_dataset() {
        let server = start(vec![chart("Performance")]).await;

        let response = server
            .client
            .post(server.url("/api/dashboard/panels"))
            .json(&json!({
                "id": "win_rate",
                "dataset": "strategy_performance",
                "metric_field": "Win_Rate_Percentage",
                "chart": { "kind": "line", "title": "Win Rate" }
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let spec: ChartSpec = response.json().await.unwrap();
        assert_eq!(spec.traces[0].categories, vec!["TMD", "Pass Line"]);

        let snapshot = server.dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.specs.len(), 2);
        assert_eq!(snapshot.specs[1].layout.title, "Win Rate");
    }

    #[tokio::test]
    async fn test_failed_panel_build_shows_error() {
        let server = start(vec![chart("Performance")]).await;

        let response = server
            .client
            .post(server.url("/api/dashboard/panels"))
            .json(&json!({
                "id": "missing",
                "dataset": "no_such_dataset",
                "metric_field": "Win_Rate_Percentage",
                "chart": { "kind": "bar" }
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = server
            .client
            .post(server.url("/api/dashboard/panels"))
            .json(&json!({ "id": "empty", "chart": { "kind": "bar" } }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let snapshot = server.dashboard.snapshot().await.unwrap();
        assert_eq!(snapshot.specs.len(), 1);
        assert_eq!(snapshot.revision, 2);
        assert!(snapshot.error.unwrap().contains("neither records nor a dataset"));
    }

    #[tokio::test]
    async fn test_events_start_with_current_revision() {
        let server = start(Vec::new()).await;
        server.dashboard.add_spec(chart("A")).await.unwrap();

        let mut response = server
            .client
            .get(server.url("/api/dashboard/events"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let chunk = response.chunk().await.unwrap().unwrap();
        let text = String::from_utf8_lossy(&chunk);
        assert!(text.contains("event: revision"));
        assert!(text.contains("data: 1"));
    }

    #[tokio::test]
    async fn test_page_carries_revision() {
        let server = start(vec![chart("Performance")]).await;
        server.dashboard.remove_spec(9).await.unwrap_err();

        let page = server
            .client
            .get(server.url("/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("const revision = \"1\";"));
        assert!(page.contains("out of range"));
    }
}
