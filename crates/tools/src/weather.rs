//! Weather lookup for run planning, backed by wttr.in's JSON format.
//!
//! Renders current conditions, a rule-based running recommendation and a
//! three-day forecast with a suggested time to run each day.

use std::fmt::Write as _;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use runcoach_config::ToolsConfig;
use runcoach_core::error::ToolError;
use runcoach_core::tool::{Tool, ToolResult};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::args;

const TOOL_NAME: &str = "get_weather";
/// Hourly samples are 3 hours apart; index 4 is noon.
const NOON_SAMPLE: usize = 4;
const FORECAST_DAYS: usize = 3;

pub struct WeatherTool {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl WeatherTool {
    pub fn new(config: &ToolsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.weather_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            base_url: config.weather_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.weather_timeout_secs,
            client,
        }
    }

    fn url_for(&self, location: &str) -> Result<reqwest::Url, ToolError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| self.failed(e))?;
        url.path_segments_mut()
            .map_err(|()| self.failed(format!("base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(location);
        url.query_pairs_mut().append_pair("format", "j1");
        Ok(url)
    }

    fn failed(&self, reason: impl ToString) -> ToolError {
        ToolError::ExecutionFailed {
            tool_name: TOOL_NAME.into(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "Get current weather and forecast for a location to help plan runs. \
         Use this tool when the user asks about weather, whether they should run today, \
         or wants to plan runs around weather conditions."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City name (e.g., \"London\" or \"Kathmandu\")"
                }
            },
            "required": ["location"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let location = args::required_str(&arguments, "location")?;
        let url = self.url_for(location)?;
        debug!(%location, "Fetching weather");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ToolError::Timeout {
                    tool_name: TOOL_NAME.into(),
                    timeout_secs: self.timeout_secs,
                }
            } else {
                self.failed(e)
            }
        })?;

        if !response.status().is_success() {
            debug!(%location, status = response.status().as_u16(), "Weather service rejected location");
            return Ok(ToolResult::ok(format!(
                "Could not get weather for {location}. Check the city name."
            )));
        }

        let report: WeatherReport = response.json().await.map_err(|e| self.failed(e))?;
        let output = render_report(location, &report).map_err(|e| self.failed(e))?;
        Ok(ToolResult::ok(output))
    }
}

// --- wttr.in `format=j1` subset; every number arrives as a string ---

#[derive(Debug, Deserialize)]
struct WeatherReport {
    current_condition: Vec<CurrentCondition>,
    #[serde(default)]
    weather: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    humidity: String,
    windspeed_kmph: String,
    weather_desc: Vec<Description>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: String,
    #[serde(default)]
    hourly: Vec<HourlySample>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HourlySample {
    #[serde(rename = "tempC")]
    temp_c: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    humidity: String,
    windspeed_kmph: String,
    weather_desc: Vec<Description>,
    #[serde(default = "zero", rename = "chanceofrain")]
    chance_of_rain: String,
}

fn zero() -> String {
    "0".into()
}

#[derive(Debug, Deserialize)]
struct Description {
    value: String,
}

fn number(field: &str, raw: &str) -> Result<i32, String> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| format!("unexpected value for {field}: {raw:?}"))
}

fn description(descs: &[Description]) -> &str {
    descs.first().map(|d| d.value.trim()).unwrap_or("Unknown")
}

fn render_report(location: &str, report: &WeatherReport) -> Result<String, String> {
    let current = report
        .current_condition
        .first()
        .ok_or("response has no current conditions")?;

    let temp = number("temp_C", &current.temp_c)?;
    let feels_like = number("FeelsLikeC", &current.feels_like_c)?;
    let humidity = number("humidity", &current.humidity)?;
    let wind = number("windspeedKmph", &current.windspeed_kmph)?;
    let desc = description(&current.weather_desc);

    let mut out = format!(
        "🌤️ WEATHER FOR {}\n\n\
         CURRENT CONDITIONS:\n\
         • Conditions: {desc}\n\
         • Temperature: {temp}°C (feels like {feels_like}°C)\n\
         • Humidity: {humidity}%\n\
         • Wind: {wind} km/h\n\n\
         {}\n",
        location.to_uppercase(),
        running_recommendation(temp, humidity, wind, desc),
    );

    if !report.weather.is_empty() {
        out.push_str("\n📅 FORECAST FOR PLANNING:\n");
    }

    for day in report.weather.iter().take(FORECAST_DAYS) {
        let Some(noon) = day.hourly.get(NOON_SAMPLE).or_else(|| day.hourly.first()) else {
            continue;
        };

        let day_name = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
            .map(|d| d.format("%A, %b %d").to_string())
            .unwrap_or_else(|_| day.date.clone());

        let f_temp = number("tempC", &noon.temp_c)?;
        let f_feels = number("FeelsLikeC", &noon.feels_like_c)?;
        let f_humidity = number("humidity", &noon.humidity)?;
        let f_wind = number("windspeedKmph", &noon.windspeed_kmph)?;
        let f_rain = number("chanceofrain", &noon.chance_of_rain)?;

        let rain = if f_rain > 20 {
            format!(" | Rain chance: {f_rain}%")
        } else {
            String::new()
        };

        let _ = write!(
            out,
            "\n{day_name}:\n  • {}, {f_temp}°C (feels {f_feels}°C)\n  • Humidity: {f_humidity}% | Wind: {f_wind} km/h{rain}\n  • Best time to run: {}\n",
            description(&noon.weather_desc),
            best_run_time(f_temp),
        );
    }

    Ok(out)
}

/// Running advice from temperature (°C), humidity (%), wind (km/h) and the
/// textual description.
pub fn running_recommendation(temp: i32, humidity: i32, wind: i32, description: &str) -> String {
    let mut recommendations: Vec<&str> = Vec::new();
    let mut warnings: Vec<&str> = Vec::new();

    match temp {
        t if t < 0 => {
            warnings.push("⚠️ Very cold - risk of hypothermia");
            recommendations.push("Wear multiple layers, cover extremities");
        }
        t if t < 10 => recommendations.push("Cool weather - good for performance, wear layers"),
        10..=15 => recommendations.push("✅ Ideal running temperature!"),
        16..=20 => recommendations.push("✅ Great conditions for running"),
        21..=25 => recommendations.push("Warm - stay hydrated, consider early morning run"),
        26..=30 => {
            warnings.push("⚠️ Hot conditions - reduce intensity");
            recommendations.push("Run early morning or evening, bring water");
        }
        _ => {
            warnings.push("🛑 Dangerous heat - consider indoor workout");
            recommendations.push("If you must run: dawn only, hydrate heavily");
        }
    }

    if humidity > 80 {
        warnings.push("⚠️ High humidity - sweat won't evaporate well");
        recommendations.push("Reduce pace, hydrate extra");
    } else if humidity < 30 {
        recommendations.push("Low humidity - hydrate well");
    }

    if wind > 30 {
        warnings.push("⚠️ Strong winds - running will be harder");
        recommendations.push("Start into the wind, return with it at your back");
    } else if wind > 20 {
        recommendations.push("Moderate wind - factor into your route planning");
    }

    let desc = description.to_lowercase();
    if desc.contains("rain") || desc.contains("drizzle") {
        recommendations.push("Wet conditions - wear visibility gear, avoid slippery surfaces");
    }
    if desc.contains("thunder") || desc.contains("storm") {
        warnings.push("🛑 Storm conditions - DO NOT run outdoors");
    }
    if desc.contains("snow") {
        warnings.push("⚠️ Snow - watch for ice, shorten stride");
    }

    let mut out = String::from("🏃 RUNNING RECOMMENDATION:\n");
    if !warnings.is_empty() {
        out.push_str(&warnings.join("\n"));
        out.push('\n');
    }
    out.push_str(
        &recommendations
            .iter()
            .map(|r| format!("• {r}"))
            .collect::<Vec<_>>()
            .join("\n"),
    );
    out
}

/// Suggested time of day to run at the given forecast temperature (°C).
pub fn best_run_time(temp: i32) -> &'static str {
    if temp > 25 {
        "Early morning (5-7 AM) or evening (after 6 PM)"
    } else if temp > 20 {
        "Morning (6-9 AM) or evening (5-7 PM)"
    } else if temp < 5 {
        "Midday (11 AM - 2 PM) when warmest"
    } else {
        "Anytime - conditions are favorable"
    }
}
