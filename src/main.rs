//! Dashboard data runner.
//!
//! Usage:
//!   deliverydash           fetch both endpoints and write the report
//!   deliverydash status    check the API and print its status line

use anyhow::{bail, Result};
use std::path::Path;

use deliverydash::client::{ApiClient, DataSource};
use deliverydash::config::Config;
use deliverydash::logging::{info, obj, v_num, v_str, Domain};
use deliverydash::report::{build_report, load_geojson, write_report};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    info(
        Domain::System,
        "startup",
        obj(&[
            ("api_url", v_str(&cfg.api_url)),
            ("fetch_timeout_secs", v_num(cfg.fetch_timeout_secs as f64)),
            ("fetch_retries", v_num(cfg.fetch_retries as f64)),
        ]),
    );
    let client = ApiClient::new(&cfg)?;

    match std::env::args().nth(1).as_deref() {
        None | Some("report") => run_report(&cfg, &client).await,
        Some("status") => {
            let status = client.status().await;
            println!("Status: {} ({})", status.label(), status.color());
            Ok(())
        }
        Some(other) => bail!("unknown command {other:?} (expected `report` or `status`)"),
    }
}

async fn run_report(cfg: &Config, client: &ApiClient) -> Result<()> {
    // A local override wins; otherwise boundaries are fetched from the API.
    let geojson = match cfg.geojson_path.as_deref() {
        Some(path) => load_geojson(Path::new(path))?,
        None => None,
    };

    let report = build_report(client, geojson.as_ref()).await;
    let written = write_report(&report, Path::new(&cfg.out_dir))?;

    println!("Status: {}", report.status_label);
    println!("Rating rows: {}", report.rating_rows);
    println!("Correlation rows: {}", report.correlation_rows);
    match &report.trendline {
        Some(t) => println!(
            "Trendline: y = {:.6}x + {:.4} over [{}, {}]",
            t.fit.slope, t.fit.intercept, t.start.x, t.end.x
        ),
        None => println!("Trendline: unavailable"),
    }
    if let Some(err) = &report.map_error {
        println!("Map: {err}");
    }
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}
