//! HTML data table for the "See details" section.

use crate::records::{CorrelationRecord, RatingRecord};

/// Rows beyond this are not rendered.
pub const MAX_ROWS: usize = 50;

const TABLE_OPEN: &str = r#"<table style="width:100%; border-collapse: collapse;">"#;
const HEAD_ROW_OPEN: &str = r#"<tr style="background:#f0f2f6; text-align:left;">"#;
const CELL_STYLE: &str = "padding:8px; border:1px solid #ddd;";

/// A record that can be laid out as a table row.
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

fn opt_num(v: Option<f64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "null".to_string())
}

impl TableRow for RatingRecord {
    fn headers() -> &'static [&'static str] {
        &["delivery_status", "avg_review_score", "total_orders"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.delivery_status.clone(),
            self.avg_review_score.to_string(),
            self.total_orders.to_string(),
        ]
    }
}

impl TableRow for CorrelationRecord {
    fn headers() -> &'static [&'static str] {
        &[
            "seller_city",
            "seller_state",
            "total",
            "late_orders",
            "avg_weight_per_order",
            "Delay_Rate",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.seller_city.clone(),
            self.seller_state.clone(),
            self.total.to_string(),
            self.late_orders.to_string(),
            opt_num(self.avg_weight_per_order),
            opt_num(self.delay_rate),
        ]
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render up to [`MAX_ROWS`] rows. The header is omitted for an empty slice.
pub fn render_table<R: TableRow>(rows: &[R]) -> String {
    let mut html = String::from(TABLE_OPEN);

    if !rows.is_empty() {
        html.push_str("<thead>");
        html.push_str(HEAD_ROW_OPEN);
        for key in R::headers() {
            html.push_str(&format!(r#"<th style="{CELL_STYLE}">{}</th>"#, escape_html(key)));
        }
        html.push_str("</tr></thead>");
    }

    html.push_str("<tbody>");
    for row in rows.iter().take(MAX_ROWS) {
        html.push_str("<tr>");
        for cell in row.cells() {
            html.push_str(&format!(r#"<td style="{CELL_STYLE}">{}</td>"#, escape_html(&cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(city: &str) -> CorrelationRecord {
        CorrelationRecord {
            seller_city: city.to_string(),
            seller_state: "SP".to_string(),
            total: 11,
            late_orders: 1,
            avg_weight_per_order: Some(1500.25),
            delay_rate: None,
        }
    }

    #[test]
    fn empty_table_has_no_header() {
        let html = render_table::<CorrelationRecord>(&[]);
        assert!(!html.contains("<thead>"));
        assert!(html.ends_with("<tbody></tbody></table>"));
    }

    #[test]
    fn header_follows_record_fields() {
        let html = render_table(&[row("sombrio")]);
        let first = html.find(">seller_city</th>").unwrap();
        let last = html.find(">Delay_Rate</th>").unwrap();
        assert!(first < last);
        assert!(html.contains(">1500.25</td>"));
        assert!(html.contains(">null</td>"));
    }

    #[test]
    fn limits_to_fifty_rows() {
        let rows: Vec<_> = (0..80).map(|i| row(&format!("city{i}"))).collect();
        let html = render_table(&rows);
        assert_eq!(html.matches("<tr>").count(), MAX_ROWS);
        assert!(html.contains("city49"));
        assert!(!html.contains("city50"));
    }

    #[test]
    fn cells_are_escaped() {
        let html = render_table(&[row("<script>alert('x')</script>")]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn rating_rows_render() {
        let rows = vec![RatingRecord {
            delivery_status: "On Time".to_string(),
            avg_review_score: 4.29,
            total_orders: 100,
        }];
        let html = render_table(&rows);
        assert!(html.contains(">delivery_status</th>"));
        assert!(html.contains(">On Time</td>"));
    }
}
