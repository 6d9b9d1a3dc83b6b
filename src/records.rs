//! Rows returned by the analytics API.
//!
//! The backend serializes SQL `numeric` columns, so numeric fields may
//! arrive either as JSON numbers or as numeric strings.

use serde::{Deserialize, Deserializer, Serialize};

pub const LATE_DELIVERY: &str = "Late Delivery";
pub const ON_TIME: &str = "On Time";

/// One row of `/api/rating`: average review score per delivery status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub delivery_status: String,
    #[serde(deserialize_with = "de_f64")]
    pub avg_review_score: f64,
    #[serde(deserialize_with = "de_u64")]
    pub total_orders: u64,
}

impl RatingRecord {
    pub fn is_late(&self) -> bool {
        self.delivery_status == LATE_DELIVERY
    }
}

/// One row of `/api/corel`: per-seller-city delay rate and average weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRecord {
    pub seller_city: String,
    pub seller_state: String,
    #[serde(deserialize_with = "de_u64")]
    pub total: u64,
    #[serde(deserialize_with = "de_u64")]
    pub late_orders: u64,
    #[serde(deserialize_with = "de_opt_f64", default)]
    pub avg_weight_per_order: Option<f64>,
    #[serde(rename = "Delay_Rate", deserialize_with = "de_opt_f64", default)]
    pub delay_rate: Option<f64>,
}

impl CorrelationRecord {
    /// Two-letter state code, trimmed and upper-cased.
    pub fn state_code(&self) -> String {
        self.seller_state.trim().to_uppercase()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Num(f64),
    Text(String),
}

impl Numeric {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Numeric::Num(v) => Ok(v),
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("not a number: {s:?}"))),
        }
    }
}

fn de_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Numeric::deserialize(d)?.into_f64()
}

fn de_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match Option::<Numeric>::deserialize(d)? {
        None => Ok(None),
        Some(n) => n.into_f64().map(Some),
    }
}

fn de_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let v = de_f64(d)?;
    if v < 0.0 || v.fract() != 0.0 || !v.is_finite() {
        return Err(serde::de::Error::custom(format!("not a count: {v}")));
    }
    Ok(v as u64)
}
