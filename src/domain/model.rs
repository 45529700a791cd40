use crate::utils::error::{ChartError, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// One cyclist's ascent: year, finish time and doping allegation (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceRecord {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Place", default, skip_serializing_if = "Option::is_none")]
    pub place: Option<u32>,
    #[serde(rename = "Seconds", default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<u32>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Nationality")]
    pub nationality: String,
    #[serde(rename = "Doping")]
    pub doping: String,
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RaceRecord {
    pub fn has_doping_allegation(&self) -> bool {
        !self.doping.is_empty()
    }

    /// 解析 "MM:SS" 格式的完賽時間
    pub fn finish_time(&self) -> std::result::Result<TimeDelta, String> {
        let (minutes, seconds) = self
            .time
            .split_once(':')
            .ok_or_else(|| format!("expected MM:SS, got '{}'", self.time))?;

        let minutes: i64 = minutes
            .trim()
            .parse()
            .map_err(|_| format!("invalid minutes in '{}'", self.time))?;
        let seconds: i64 = seconds
            .trim()
            .parse()
            .map_err(|_| format!("invalid seconds in '{}'", self.time))?;

        if minutes < 0 || !(0..60).contains(&seconds) {
            return Err(format!("time out of range: '{}'", self.time));
        }

        minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| format!("time out of range: '{}'", self.time))
    }

    pub fn finish_seconds(&self) -> std::result::Result<i64, String> {
        self.finish_time().map(|t| t.num_seconds())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetOrigin {
    Remote,
    Fallback,
}

impl std::fmt::Display for DatasetOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetOrigin::Remote => write!(f, "remote"),
            DatasetOrigin::Fallback => write!(f, "bundled fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub records: Vec<RaceRecord>,
    pub origin: DatasetOrigin,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 所有記錄的年份與時間都必須可解析，否則整個資料集視為無效
    pub fn parsed_points(&self) -> Result<Vec<(i32, TimeDelta)>> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .finish_time()
                    .map(|time| (record.year, time))
                    .map_err(|reason| ChartError::InvalidRecordError {
                        index,
                        field: "Time".to_string(),
                        reason,
                    })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 100.0,
            right: 40.0,
            bottom: 60.0,
            left: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub subtitle: String,
    pub width: u32,
    pub height: u32,
    pub margins: Margins,
    pub point_radius: f64,
    pub clean_color: String,
    pub doping_color: String,
}

pub const DEFAULT_TITLE: &str = "Doping in Professional Bicycle Racing";
pub const DEFAULT_SUBTITLE: &str = "35 Fastest times up Alpe d'Huez";
pub const DEFAULT_CLEAN_COLOR: &str = "#1f77b4";
pub const DEFAULT_DOPING_COLOR: &str = "#ff7f0e";

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            width: 920,
            height: 630,
            margins: Margins::default(),
            point_radius: 6.0,
            clean_color: DEFAULT_CLEAN_COLOR.to_string(),
            doping_color: DEFAULT_DOPING_COLOR.to_string(),
        }
    }
}

impl ChartOptions {
    pub fn inner_width(&self) -> f64 {
        (self.width as f64 - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height as f64 - self.margins.top - self.margins.bottom).max(0.0)
    }
}

/// CLI 與 TOML 都經由 `FromStr` 解析，接受相同的寫法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutputFormat {
    Html,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Svg => "svg",
        }
    }

    pub fn default_filename(&self) -> String {
        format!("scatter-plot.{}", self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(ChartError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: html, svg".to_string(),
            }),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: String,
    pub doping: bool,
    pub year: i32,
    /// ISO 形式，例如 1970-01-01T00:36:55
    pub time_value: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
    pub doping: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub options: ChartOptions,
    pub points: Vec<PlotPoint>,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
    pub legend: Vec<LegendEntry>,
    pub origin: DatasetOrigin,
}
