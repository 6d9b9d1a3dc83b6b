//! Dashboard assembly: fetch both endpoints, build every figure and the
//! details table, and write them out.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use crate::charts::{correlation_chart, delay_map, rating_chart, CorrelationChart, Figure};
use crate::client::{fetch_all, ApiStatus, DataSource};
use crate::logging::{info, obj, ts_now, v_num, v_str, warn, Domain};
use crate::table::render_table;
use crate::trendline::Trendline;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub status: ApiStatus,
    pub status_label: &'static str,
    pub rating_rows: usize,
    pub correlation_rows: usize,
    pub rating_chart: Option<Figure>,
    pub correlation_chart: Option<Figure>,
    pub delay_map: Option<Figure>,
    /// Shown in place of the map when no boundaries could be loaded.
    pub map_error: Option<String>,
    pub trendline: Option<Trendline>,
    #[serde(skip)]
    pub table_html: String,
}

/// Read a GeoJSON document; a missing file is not an error.
pub fn load_geojson(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        warn(
            Domain::Report,
            "geojson_missing",
            obj(&[("path", v_str(&path.to_string_lossy()))]),
        );
        return Ok(None);
    }
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(value))
}

fn log_fetch_failure(endpoint: &str, err: &anyhow::Error) {
    warn(
        Domain::Fetch,
        "fetch_failed",
        obj(&[
            ("endpoint", v_str(endpoint)),
            ("msg", v_str(&format!("{err:#}"))),
        ]),
    );
}

/// Fetch data and build all dashboard artifacts.
///
/// A failed data fetch is logged and treated as an empty data set, so the
/// corresponding charts are simply absent. Map boundaries come from
/// `geojson` when given, otherwise from the data source; if neither yields
/// them the map is replaced by `map_error`.
pub async fn build_report<S: DataSource + Sync + ?Sized>(
    source: &S,
    geojson: Option<&Value>,
) -> Report {
    let boundaries = async {
        match geojson {
            Some(geo) => Ok(Cow::Borrowed(geo)),
            None => source.fetch_geojson().await.map(Cow::Owned),
        }
    };
    let ((rating, corel), status, boundaries) =
        tokio::join!(fetch_all(source), source.status(), boundaries);

    let rating = rating.unwrap_or_else(|e| {
        log_fetch_failure("rating", &e);
        Vec::new()
    });
    let corel = corel.unwrap_or_else(|e| {
        log_fetch_failure("corel", &e);
        Vec::new()
    });

    let (delay_map, map_error) = match &boundaries {
        Ok(geo) => (delay_map(&corel, Some(geo.as_ref())), None),
        Err(e) => {
            log_fetch_failure("geojson", e);
            (None, Some(format!("Could not load map data: {e}")))
        }
    };

    let (correlation_chart, trendline) = match correlation_chart(&corel) {
        Some(CorrelationChart { figure, trendline }) => (Some(figure), trendline),
        None => (None, None),
    };

    let report = Report {
        generated_at: ts_now(),
        status,
        status_label: status.label(),
        rating_rows: rating.len(),
        correlation_rows: corel.len(),
        rating_chart: rating_chart(&rating),
        correlation_chart,
        delay_map,
        map_error,
        trendline,
        table_html: render_table(&corel),
    };

    info(
        Domain::Report,
        "built",
        obj(&[
            ("status", v_str(report.status_label)),
            ("rating_rows", v_num(report.rating_rows as f64)),
            ("correlation_rows", v_num(report.correlation_rows as f64)),
            ("has_trendline", Value::Bool(report.trendline.is_some())),
            ("has_map", Value::Bool(report.delay_map.is_some())),
        ]),
    );
    report
}

/// Write `report.json` and `table.html` into `out_dir`.
pub fn write_report(report: &Report, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let json_path = out_dir.join("report.json");
    let table_path = out_dir.join("table.html");

    fs::write(&json_path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("writing {}", json_path.display()))?;
    fs::write(&table_path, &report.table_html)
        .with_context(|| format!("writing {}", table_path.display()))?;

    info(
        Domain::Report,
        "written",
        obj(&[("dir", v_str(&out_dir.to_string_lossy()))]),
    );
    Ok(vec![json_path, table_path])
}
