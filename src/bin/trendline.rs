//! Fit a trendline to a two-column `x,y` CSV and print the segment as JSON.
//!
//! Blank lines, `#` comments and a non-numeric header row are skipped.

use anyhow::{anyhow, Context, Result};
use serde_json::json;
use std::fs::File;
use std::io::{BufRead, BufReader};

use deliverydash::trendline::trendline;

fn parse_pair(line: &str) -> Option<(f64, f64)> {
    let mut parts = line.split(',').map(str::trim);
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    Some((x, y))
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: trendline <file.csv>"))?;
    let file = File::open(&path).with_context(|| format!("opening {path}"))?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_pair(trimmed) {
            Some((x, y)) => {
                xs.push(x);
                ys.push(y);
            }
            None if idx == 0 => continue,
            None => eprintln!("skipping line {}: {:?}", idx + 1, trimmed),
        }
    }

    let line = trendline(&xs, &ys)?;
    println!(
        "{}",
        json!({
            "samples": xs.len(),
            "slope": line.fit.slope,
            "intercept": line.fit.intercept,
            "x": line.xs(),
            "y": line.ys(),
        })
    );
    Ok(())
}
