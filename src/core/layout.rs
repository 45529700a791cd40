use crate::core::scale::{time_of_day, year_start, TimeScale};
use crate::domain::model::{
    AxisTick, ChartOptions, Dataset, LegendEntry, PlotPoint, RaceRecord, ScatterPlot,
};
use crate::utils::error::{ChartError, Result};
use chrono::{NaiveDateTime, TimeDelta};

pub const CLEAN_LEGEND_LABEL: &str = "No doping allegations";
pub const DOPING_LEGEND_LABEL: &str = "Riders with doping allegations";

const MAX_X_TICKS: usize = 12;
const MAX_Y_TICKS: usize = 10;

fn year_or_err(index: usize, year: i32) -> Result<NaiveDateTime> {
    year_start(year).ok_or_else(|| ChartError::InvalidRecordError {
        index,
        field: "Year".to_string(),
        reason: format!("year {} is out of range", year),
    })
}

fn time_or_err(index: usize, time: TimeDelta) -> Result<NaiveDateTime> {
    time_of_day(time).ok_or_else(|| ChartError::InvalidRecordError {
        index,
        field: "Time".to_string(),
        reason: "finish time is out of range".to_string(),
    })
}

pub fn tooltip_text(record: &RaceRecord) -> String {
    let mut text = format!(
        "{}: {}\nYear: {}, Time: {}",
        record.name, record.nationality, record.year, record.time
    );
    if record.has_doping_allegation() {
        text.push_str("\n\n");
        text.push_str(&record.doping);
    }
    text
}

pub fn legend_entries(options: &ChartOptions) -> Vec<LegendEntry> {
    vec![
        LegendEntry {
            label: CLEAN_LEGEND_LABEL.to_string(),
            color: options.clean_color.clone(),
            doping: false,
        },
        LegendEntry {
            label: DOPING_LEGEND_LABEL.to_string(),
            color: options.doping_color.clone(),
            doping: true,
        },
    ]
}

/// Horizontal scale: one year of padding on each side of the observed years.
pub fn x_scale(points: &[(i32, TimeDelta)], options: &ChartOptions) -> Result<TimeScale> {
    let min_year = points.iter().map(|(year, _)| *year).min();
    let max_year = points.iter().map(|(year, _)| *year).max();
    let (Some(min_year), Some(max_year)) = (min_year, max_year) else {
        return Err(ChartError::EmptyDatasetError);
    };

    let start = year_or_err(0, min_year.saturating_sub(1))?;
    let end = year_or_err(0, max_year.saturating_add(1))?;
    Ok(TimeScale::new((start, end), (0.0, options.inner_width())))
}

/// 縱軸：最快時間在上方
pub fn y_scale(points: &[(i32, TimeDelta)], options: &ChartOptions) -> Result<TimeScale> {
    let fastest = points.iter().map(|(_, time)| *time).min();
    let slowest = points.iter().map(|(_, time)| *time).max();
    let (Some(fastest), Some(slowest)) = (fastest, slowest) else {
        return Err(ChartError::EmptyDatasetError);
    };

    let start = time_or_err(0, fastest)?;
    let end = time_or_err(0, slowest)?;
    Ok(TimeScale::new((start, end), (0.0, options.inner_height())))
}

pub fn layout(dataset: &Dataset, options: &ChartOptions) -> Result<ScatterPlot> {
    if dataset.is_empty() {
        return Err(ChartError::EmptyDatasetError);
    }

    let parsed = dataset.parsed_points()?;
    let x = x_scale(&parsed, options)?;
    let y = y_scale(&parsed, options)?;

    let mut points = Vec::with_capacity(dataset.len());
    for (index, (record, (year, time))) in dataset.records.iter().zip(&parsed).enumerate() {
        let x_value = year_or_err(index, *year)?;
        let y_value = time_or_err(index, *time)?;
        let doping = record.has_doping_allegation();

        points.push(PlotPoint {
            cx: x.scale(x_value),
            cy: y.scale(y_value),
            radius: options.point_radius,
            fill: if doping {
                options.doping_color.clone()
            } else {
                options.clean_color.clone()
            },
            doping,
            year: *year,
            time_value: y_value.format("%Y-%m-%dT%H:%M:%S").to_string(),
            tooltip: tooltip_text(record),
        });
    }

    let x_ticks: Vec<AxisTick> = x
        .year_ticks(MAX_X_TICKS)
        .into_iter()
        .map(|tick| AxisTick {
            position: x.scale(tick),
            label: tick.format("%Y").to_string(),
        })
        .collect();

    let y_ticks: Vec<AxisTick> = y
        .second_ticks(MAX_Y_TICKS)
        .into_iter()
        .map(|tick| AxisTick {
            position: y.scale(tick),
            label: tick.format("%M:%S").to_string(),
        })
        .collect();

    tracing::debug!(
        "Laid out {} points, {} x ticks, {} y ticks",
        points.len(),
        x_ticks.len(),
        y_ticks.len()
    );

    Ok(ScatterPlot {
        options: options.clone(),
        points,
        x_ticks,
        y_ticks,
        legend: legend_entries(options),
        origin: dataset.origin,
    })
}
