//! End-to-end report assembly against an in-memory data source.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

use deliverydash::client::{ApiStatus, DataSource};
use deliverydash::records::{CorrelationRecord, RatingRecord};
use deliverydash::report::{build_report, load_geojson, write_report};

const RATING_JSON: &str = r#"[
    {"delivery_status": "Late Delivery", "avg_review_score": 2.57, "total_orders": 7661},
    {"delivery_status": "On Time", "avg_review_score": 4.29, "total_orders": 88989}
]"#;

const COREL_JSON: &str = r#"[
    {"seller_city": "sombrio", "seller_state": "SC", "total": 14, "late_orders": 5,
     "avg_weight_per_order": "22000.00", "Delay_Rate": "35.71"},
    {"seller_city": "sao paulo", "seller_state": "sp ", "total": 2000, "late_orders": 160,
     "avg_weight_per_order": 2100.5, "Delay_Rate": 8.0},
    {"seller_city": "curitiba", "seller_state": "PR", "total": 300, "late_orders": 18,
     "avg_weight_per_order": 900.0, "Delay_Rate": 6.0}
]"#;

const GEO_JSON: &str = r#"{"type": "FeatureCollection", "features": [{"id": "SP"}]}"#;

struct Fixture {
    rating: Option<&'static str>,
    corel: Option<&'static str>,
    geojson: Option<&'static str>,
    status: ApiStatus,
}

impl Fixture {
    fn online() -> Self {
        Fixture {
            rating: Some(RATING_JSON),
            corel: Some(COREL_JSON),
            geojson: Some(GEO_JSON),
            status: ApiStatus::Connected,
        }
    }

    fn offline() -> Self {
        Fixture { rating: None, corel: None, geojson: None, status: ApiStatus::Offline }
    }
}

#[async_trait]
impl DataSource for Fixture {
    async fn fetch_rating(&self) -> Result<Vec<RatingRecord>> {
        let body = self.rating.ok_or_else(|| anyhow!("rating offline"))?;
        Ok(serde_json::from_str(body)?)
    }

    async fn fetch_correlation(&self) -> Result<Vec<CorrelationRecord>> {
        let body = self.corel.ok_or_else(|| anyhow!("corel offline"))?;
        Ok(serde_json::from_str(body)?)
    }

    async fn fetch_geojson(&self) -> Result<serde_json::Value> {
        let body = self.geojson.ok_or_else(|| anyhow!("geojson offline"))?;
        Ok(serde_json::from_str(body)?)
    }

    async fn status(&self) -> ApiStatus {
        self.status
    }
}

#[tokio::test]
async fn full_report_has_every_artifact() {
    let report = build_report(&Fixture::online(), None).await;

    assert_eq!(report.status, ApiStatus::Connected);
    assert_eq!(report.rating_rows, 2);
    assert_eq!(report.correlation_rows, 3);
    assert!(report.rating_chart.is_some());
    assert_eq!(report.correlation_chart.as_ref().unwrap().trace_count(), 2);

    let line = report.trendline.unwrap();
    assert_eq!(line.start.x, 900.0);
    assert_eq!(line.end.x, 22000.0);
    assert!(line.fit.slope > 0.0);

    let map = report.delay_map.as_ref().unwrap();
    assert_eq!(map.data[0]["locations"][1], "SP");
    assert_eq!(map.data[0]["zmax"], 35.71);
    assert_eq!(map.data[0]["geojson"]["features"][0]["id"], "SP");
    assert!(report.map_error.is_none());

    assert!(report.table_html.contains(">sombrio</td>"));
}

#[tokio::test]
async fn failed_fetches_degrade_to_empty_report() {
    let report = build_report(&Fixture::offline(), None).await;

    assert_eq!(report.status_label, "○ API Offline");
    assert_eq!(report.rating_rows, 0);
    assert!(report.rating_chart.is_none());
    assert!(report.correlation_chart.is_none());
    assert!(report.delay_map.is_none());
    assert!(report.trendline.is_none());
    assert_eq!(
        report.map_error.as_deref(),
        Some("Could not load map data: geojson offline")
    );
    assert!(!report.table_html.contains("<thead>"));
}

#[tokio::test]
async fn partial_failure_keeps_other_endpoint() {
    let source = Fixture { corel: None, status: ApiStatus::Issue, ..Fixture::online() };
    let report = build_report(&source, None).await;
    assert!(report.rating_chart.is_some());
    assert!(report.correlation_chart.is_none());
}

#[tokio::test]
async fn local_geojson_overrides_the_api() {
    let local = json!({"type": "FeatureCollection", "features": [{"id": "PR"}]});
    let report = build_report(&Fixture::online(), Some(&local)).await;
    let map = report.delay_map.unwrap();
    assert_eq!(map.data[0]["geojson"]["features"][0]["id"], "PR");
    assert!(report.map_error.is_none());
}

#[tokio::test]
async fn local_geojson_covers_an_api_without_boundaries() {
    let source = Fixture { geojson: None, ..Fixture::online() };
    let local = json!({"type": "FeatureCollection", "features": []});
    let report = build_report(&source, Some(&local)).await;
    assert!(report.delay_map.is_some());
    assert!(report.map_error.is_none());
}

#[tokio::test]
async fn missing_boundaries_record_map_error() {
    let source = Fixture { geojson: None, ..Fixture::online() };
    let report = build_report(&source, None).await;
    assert!(report.delay_map.is_none());
    assert!(report.correlation_chart.is_some());
    let err = report.map_error.unwrap();
    assert!(err.starts_with("Could not load map data"));
}

#[tokio::test]
async fn report_files_are_written() {
    let report = build_report(&Fixture::online(), None).await;

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("nested/out");
    let written = write_report(&report, &out).unwrap();
    assert_eq!(written.len(), 2);

    let raw = fs::read_to_string(out.join("report.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["status"], "connected");
    assert_eq!(json["correlation_chart"]["data"][1]["name"], "Trendline");
    assert!(json.get("table_html").is_none());
    assert!(json["map_error"].is_null());

    let html = fs::read_to_string(out.join("table.html")).unwrap();
    assert!(html.starts_with("<table"));
}

#[test]
fn geojson_loading() {
    let dir = TempDir::new().unwrap();
    assert!(load_geojson(&dir.path().join("missing.json")).unwrap().is_none());

    let good = dir.path().join("brazil_geo.json");
    fs::write(&good, r#"{"type":"FeatureCollection","features":[{"id":"SP"}]}"#).unwrap();
    let geo = load_geojson(&good).unwrap().unwrap();
    assert_eq!(geo["features"][0]["id"], "SP");

    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{not json").unwrap();
    assert!(load_geojson(&bad).is_err());
}
