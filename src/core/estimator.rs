//! Success probability from the trained classifier.
//!
//! The live path has no per-mission payload, flight count or reuse data, so the
//! feature row is filled with fixed placeholder values chosen by matching the
//! model's feature names. Only the wind hint is live. This is an approximation
//! and the matching rules are kept exactly as trained bundles expect them.

use crate::core::classifier::ClassifierBundle;
use crate::core::Classifier;
use crate::utils::error::{ForecastError, Result};

pub const FALLBACK_PROBABILITY: f64 = 0.94;

pub const PLACEHOLDER_PAYLOAD_KG: f64 = 7000.0;
pub const PLACEHOLDER_FLIGHTS: f64 = 10.0;
pub const PLACEHOLDER_REUSED: f64 = 1.0;

/// Placeholder value for one feature; checked in priority order, case-insensitive.
pub fn placeholder_value(feature_name: &str, wind_kts: f64) -> f64 {
    let name = feature_name.to_lowercase();
    if name.contains("payload") {
        PLACEHOLDER_PAYLOAD_KG
    } else if name.contains("flight") {
        PLACEHOLDER_FLIGHTS
    } else if name.contains("reuse") {
        PLACEHOLDER_REUSED
    } else if name.contains("wind") {
        wind_kts
    } else {
        0.0
    }
}

/// One row aligned with `feature_names`.
pub fn synthesize_row(feature_names: &[String], wind_kts: f64) -> Vec<f64> {
    feature_names
        .iter()
        .map(|name| placeholder_value(name, wind_kts))
        .collect()
}

/// Positive-class probability rounded to three decimals.
pub fn estimate_probability(bundle: Option<&ClassifierBundle>, wind_kts: f64) -> Result<f64> {
    let bundle = bundle.ok_or_else(|| ForecastError::scoring("no classifier loaded"))?;
    if bundle.feature_names.is_empty() {
        return Err(ForecastError::scoring("classifier declares no feature names"));
    }

    let row = synthesize_row(&bundle.feature_names, wind_kts);
    let p = bundle.model.predict_proba(&row)?;
    if !(0.0..=1.0).contains(&p) {
        return Err(ForecastError::scoring(format!("probability {} out of range", p)));
    }
    Ok((p * 1000.0).round() / 1000.0)
}
