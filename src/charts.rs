//! Plotly figure documents for the dashboard charts.
//!
//! Builders return `None` when there is nothing to plot; the page then
//! leaves the chart container empty.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::logging::{info, obj, v_num, v_str, warn, Domain};
use crate::records::{CorrelationRecord, RatingRecord};
use crate::trendline::{trendline, Trendline};

pub const LATE_COLOR: &str = "#A0001B";
pub const ON_TIME_COLOR: &str = "#05B431";
pub const TRENDLINE_COLOR: &str = "red";

/// Map center over Brazil.
pub const MAP_CENTER: (f64, f64) = (-14.235, -51.925);
pub const MAP_ZOOM: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    pub fn trace_count(&self) -> usize {
        self.data.len()
    }
}

// =============================================================================
// Rating bar chart
// =============================================================================

pub fn rating_chart(rows: &[RatingRecord]) -> Option<Figure> {
    if rows.is_empty() {
        return None;
    }

    let x: Vec<f64> = rows.iter().map(|r| r.avg_review_score).collect();
    let y: Vec<&str> = rows.iter().map(|r| r.delivery_status.as_str()).collect();
    let text: Vec<u64> = rows.iter().map(|r| r.total_orders).collect();
    let colors: Vec<&str> = rows
        .iter()
        .map(|r| if r.is_late() { LATE_COLOR } else { ON_TIME_COLOR })
        .collect();

    let trace = json!({
        "x": x,
        "y": y,
        "type": "bar",
        "orientation": "h",
        "text": text,
        "marker": { "color": colors },
        "textposition": "auto",
    });
    let layout = json!({
        "title": "Average Review Score by Delivery Status",
        "xaxis": { "title": "Rating" },
        "yaxis": { "title": "Delivery Status" },
        "margin": { "l": 150, "r": 20, "t": 40, "b": 40 },
    });

    Some(Figure { data: vec![trace], layout })
}

// =============================================================================
// Weight vs delay scatter with trendline
// =============================================================================

/// Pairs with both values present and finite, in row order.
pub fn weight_delay_pairs(rows: &[CorrelationRecord]) -> (Vec<f64>, Vec<f64>) {
    rows.iter()
        .filter_map(|r| match (r.avg_weight_per_order, r.delay_rate) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        })
        .unzip()
}

pub fn trendline_trace(line: &Trendline) -> Value {
    json!({
        "x": line.xs(),
        "y": line.ys(),
        "mode": "lines",
        "type": "scatter",
        "name": "Trendline",
        "line": { "color": TRENDLINE_COLOR },
    })
}

/// Scatter figure together with the fit drawn on it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationChart {
    pub figure: Figure,
    pub trendline: Option<Trendline>,
}

pub fn correlation_chart(rows: &[CorrelationRecord]) -> Option<CorrelationChart> {
    if rows.is_empty() {
        return None;
    }

    let x: Vec<Option<f64>> = rows.iter().map(|r| r.avg_weight_per_order).collect();
    let y: Vec<Option<f64>> = rows.iter().map(|r| r.delay_rate).collect();
    let text: Vec<&str> = rows.iter().map(|r| r.seller_city.as_str()).collect();

    let scatter = json!({
        "x": x,
        "y": y,
        "mode": "markers",
        "type": "scatter",
        "text": text,
        "marker": {
            "size": 8,
            "color": x,
            "colorscale": "Pinkyl",
            "showscale": true,
        },
        "name": "Data Points",
    });
    let mut data = vec![scatter];

    let (xs, ys) = weight_delay_pairs(rows);
    let fitted = match trendline(&xs, &ys) {
        Ok(line) => {
            info(
                Domain::Chart,
                "trendline",
                obj(&[
                    ("slope", v_num(line.fit.slope)),
                    ("intercept", v_num(line.fit.intercept)),
                    ("samples", v_num(xs.len() as f64)),
                ]),
            );
            data.push(trendline_trace(&line));
            Some(line)
        }
        Err(e) => {
            warn(
                Domain::Chart,
                "trendline_skipped",
                obj(&[
                    ("samples", v_num(xs.len() as f64)),
                    ("msg", v_str(&e.to_string())),
                ]),
            );
            None
        }
    };

    let layout = json!({
        "title": "Correlation: Product Weight vs Delay Rate",
        "xaxis": { "title": "Average Weight (g)", "rangemode": "tozero" },
        "yaxis": { "title": "Delay Rate (%)" },
        "margin": { "l": 50, "r": 20, "t": 40, "b": 40 },
        "showlegend": false,
    });

    Some(CorrelationChart {
        figure: Figure { data, layout },
        trendline: fitted,
    })
}

// =============================================================================
// Delay choropleth
// =============================================================================

pub fn delay_map(rows: &[CorrelationRecord], geojson: Option<&Value>) -> Option<Figure> {
    if rows.is_empty() {
        return None;
    }

    let locations: Vec<String> = rows.iter().map(|r| r.state_code()).collect();
    let z: Vec<Option<f64>> = rows.iter().map(|r| r.delay_rate).collect();
    let zmax = rows
        .iter()
        .filter_map(|r| r.delay_rate)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    let mut trace = json!({
        "type": "choroplethmapbox",
        "locations": locations,
        "z": z,
        "featureidkey": "id",
        "colorscale": "Reds",
        "marker": { "opacity": 0.5 },
        "zmin": 0,
        "zmax": zmax,
    });
    if let (Some(geo), Some(map)) = (geojson, trace.as_object_mut()) {
        map.insert("geojson".to_string(), geo.clone());
    }

    let layout = json!({
        "title": "Geographical map of deliveries",
        "mapbox": {
            "style": "carto-positron",
            "center": { "lat": MAP_CENTER.0, "lon": MAP_CENTER.1 },
            "zoom": MAP_ZOOM,
        },
        "margin": { "l": 0, "r": 0, "t": 40, "b": 0 },
    });

    Some(Figure { data: vec![trace], layout })
}
