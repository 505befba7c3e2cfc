//! Pure adapters from API payloads to chart-ready series.
//!
//! Every adapter is deterministic: the same payload always yields a structurally
//! equal series, and absent numeric fields are charted as 0.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

pub mod zones;
pub mod efficiency;
pub mod surge;
pub mod wait_time;
pub mod congestion;
pub mod incentives;
pub mod variability;
pub mod simulation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Color {
    Blue,
    Red,
    Teal,
    Purple,
    Orange,
}

impl Color {
    fn rgb(self) -> &'static str {
        match self {
            Color::Blue => "54, 162, 235",
            Color::Red => "255, 99, 132",
            Color::Teal => "75, 192, 192",
            Color::Purple => "153, 102, 255",
            Color::Orange => "255, 159, 64",
        }
    }

    pub fn rgba(self, alpha: f64) -> String {
        format!("rgba({}, {})", self.rgb(), alpha)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStyle {
    pub color: Color,
    pub background_color: String,
    pub border_color: String,
    /// Secondary axis id for dual-axis line charts.
    pub y_axis: Option<&'static str>,
}

impl DatasetStyle {
    /// Solid fill for bars and scatter points.
    pub fn solid(color: Color) -> Self {
        DatasetStyle {
            color,
            background_color: color.rgba(0.6),
            border_color: color.rgba(1.0),
            y_axis: None,
        }
    }

    /// Faint fill under a line.
    pub fn line(color: Color) -> Self {
        DatasetStyle {
            color,
            background_color: color.rgba(0.1),
            border_color: color.rgba(1.0),
            y_axis: None,
        }
    }

    pub fn on_axis(mut self, axis: &'static str) -> Self {
        self.y_axis = Some(axis);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<f64>,
    pub style: DatasetStyle,
}

impl Dataset {
    pub fn new(label: &str, values: Vec<f64>, style: DatasetStyle) -> Self {
        Dataset {
            label: label.to_string(),
            values,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterDataset {
    pub label: String,
    pub points: Vec<Point>,
    pub style: DatasetStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ScatterSeries {
    pub datasets: Vec<ScatterDataset>,
}

impl ScatterSeries {
    pub fn single(label: &str, points: Vec<Point>, color: Color) -> Self {
        ScatterSeries {
            datasets: vec![ScatterDataset {
                label: label.to_string(),
                points,
                style: DatasetStyle::solid(color),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(|d| d.points.is_empty())
    }
}

/// Row-major grid, `cells[row][column]`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct HeatmapGrid {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<f64>>,
}

/// Absent or non-finite values chart as 0.
pub fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Stable descending sort on `key`, truncated to `n`. Ties keep their input order.
pub fn top_n_by<T, F>(items: &[T], n: usize, key: F) -> Vec<&T>
where
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

pub fn zone_label(zone_id: i64) -> String {
    format!("Zone {}", zone_id)
}

pub fn zone_hour_label(zone_id: i64, hour_of_day: i64) -> String {
    format!("Zone {} @ {}:00", zone_id, hour_of_day)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    let trimmed = raw.trim().trim_end_matches('Z');
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// `2025-01-03 18:00` for hour buckets; unparseable input is shown as-is.
pub fn hour_label(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `01/31/2025` for calendar dates; unparseable input is shown as-is.
pub fn date_label(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `1234567.8` -> `1,234,568`
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as i64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", out)
    } else {
        out
    }
}
