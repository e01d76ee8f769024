//! View model built from a weather snapshot.

use chrono::{Locale, NaiveDate, NaiveTime};
use skyglance_weather::WeatherSnapshot;

pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Shown in place of a temperature the forecast has no value for
pub const MISSING_VALUE: &str = "--";

/// Round half up, so -2.5 becomes -2 and 2.5 becomes 3.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Format `date` with the names of `locale`.
fn localized(date: NaiveDate, format: &str, locale: Locale) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized(format, locale)
        .to_string()
}

fn degrees(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}°", round_half_up(v)),
        None => MISSING_VALUE.to_string(),
    }
}

/// Where condition icons are served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    base_url: String,
}

impl IconSet {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn large(&self, icon: &str) -> String {
        format!("{}/{}@2x.png", self.base_url, icon)
    }

    pub fn small(&self, icon: &str) -> String {
        format!("{}/{}.png", self.base_url, icon)
    }
}

impl Default for IconSet {
    fn default() -> Self {
        Self::new(ICON_BASE_URL)
    }
}

/// One entry of the forecast list
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub day: String,
    pub icon_url: String,
    pub range: String,
}

/// Data behind the temperature chart: one label and one daily high per day.
/// A missing high leaves a gap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub highs: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub location_name: String,
    pub date_label: String,
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind: String,
    pub icon_url: String,
    pub forecast: Vec<ForecastRow>,
    pub chart: ChartSeries,
}

impl DashboardView {
    /// Build the dashboard for `place`. The first daily entry is today and is
    /// shown only in the chart, not in the forecast list.
    pub fn build(
        snapshot: &WeatherSnapshot,
        place: &str,
        today: NaiveDate,
        icons: &IconSet,
        locale: Locale,
    ) -> Self {
        let current = &snapshot.current;
        let condition = snapshot.condition();
        let days = snapshot.daily.days();

        let forecast = days
            .iter()
            .skip(1)
            .map(|day| ForecastRow {
                date: day.date,
                day: localized(day.date, "%a", locale),
                icon_url: icons.small(day.condition().icon),
                range: format!("{} / {}", degrees(day.high), degrees(day.low)),
            })
            .collect();

        let chart = ChartSeries {
            labels: days.iter().map(|d| localized(d.date, "%a", locale)).collect(),
            highs: days.iter().map(|d| d.high).collect(),
        };

        Self {
            location_name: place.to_string(),
            date_label: localized(today, "%A, %-d %B %Y", locale),
            temperature: degrees(Some(current.temperature)),
            description: condition.description.to_string(),
            humidity: format!("Humidity: {}%", current.humidity),
            wind: format!("Wind: {} km/h", round_half_up(current.wind_speed)),
            icon_url: icons.large(condition.icon),
            forecast,
            chart,
        }
    }
}
