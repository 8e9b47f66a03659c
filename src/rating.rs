//! Circular user-score gauge shown on cards, headers and episodes.

use serde::Serialize;
use std::f64::consts::PI;

pub const CARD_GAUGE: f64 = 40.0;
pub const HEADER_GAUGE: f64 = 56.0;

const STROKE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingGauge {
    /// Score on a 0-100 scale.
    pub percent: f64,
    pub label: u32,
    pub color: &'static str,
    pub size: f64,
    pub radius: f64,
    pub circumference: f64,
    pub dash_offset: f64,
}

impl RatingGauge {
    /// TMDB vote averages run 0-10.
    pub fn from_vote_average(vote_average: f64, size: f64) -> Self {
        let percent = if vote_average.is_finite() {
            (vote_average * 10.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let radius = (size / 2.0 - STROKE).max(0.0);
        let circumference = 2.0 * PI * radius;
        Self {
            percent,
            label: percent.round() as u32,
            color: score_color(percent),
            size,
            radius,
            circumference,
            dash_offset: circumference - percent / 100.0 * circumference,
        }
    }
}

pub fn score_color(percent: f64) -> &'static str {
    if percent >= 75.0 {
        "#21d07a"
    } else if percent >= 50.0 {
        "#d2d531"
    } else if percent >= 30.0 {
        "#ffa500"
    } else {
        "#db2360"
    }
}
