use serde::Serialize;
use time::{format_description::FormatItem, macros::format_description, Date, Duration};

use super::repo::LogPoint;

const LABEL_FORMAT: &[FormatItem<'static>] = format_description!("[month repr:short] [day]");

/// Estimated calories burned per workout minute.
pub const CALORIES_PER_MINUTE: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: Date,
    pub end: Date,
}

/// The four 7-day windows starting 28, 21, 14 and 7 days before `today`.
pub fn last_four_weeks(today: Date) -> Vec<WeekWindow> {
    (1..=4)
        .rev()
        .map(|i| {
            let start = today - Duration::days(7 * i);
            WeekWindow {
                start,
                end: start + Duration::days(6),
            }
        })
        .collect()
}

pub fn label(date: Date) -> String {
    date.format(LABEL_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

#[derive(Debug, Serialize)]
pub struct Dataset<T: Serialize> {
    pub label: &'static str,
    pub data: Vec<T>,
    #[serde(rename = "backgroundColor", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<&'static str>,
    #[serde(rename = "borderColor", skip_serializing_if = "Option::is_none")]
    pub border_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct Chart<T: Serialize> {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset<T>>,
}

#[derive(Debug, Serialize)]
pub struct ProgressCharts {
    pub frequency: Chart<i64>,
    pub weight: Chart<f64>,
    pub calories: Chart<i32>,
}

pub fn frequency_chart(windows: &[WeekWindow], counts: Vec<i64>) -> Chart<i64> {
    Chart {
        labels: windows.iter().map(|w| label(w.start)).collect(),
        datasets: vec![Dataset {
            label: "Workouts",
            data: counts,
            background_color: Some("#4e79a7"),
            border_color: None,
            fill: None,
        }],
    }
}

/// `points` must already be oldest first.
pub fn weight_and_calorie_charts(points: &[LogPoint]) -> (Chart<f64>, Chart<i32>) {
    let labels: Vec<String> = points.iter().map(|p| label(p.date)).collect();
    let weight = Chart {
        labels: labels.clone(),
        datasets: vec![Dataset {
            label: "Weight (kg)",
            data: points.iter().map(|p| p.total_weight).collect(),
            background_color: None,
            border_color: Some("#f28e2b"),
            fill: Some(false),
        }],
    };
    let calories = Chart {
        labels,
        datasets: vec![Dataset {
            label: "Calories",
            data: points
                .iter()
                .map(|p| p.duration.saturating_mul(CALORIES_PER_MINUTE))
                .collect(),
            background_color: None,
            border_color: Some("#e15759"),
            fill: Some(false),
        }],
    };
    (weight, calories)
}
