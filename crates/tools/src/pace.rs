//! Pace, speed and race-time predictions from a single effort.

use async_trait::async_trait;
use runcoach_core::error::ToolError;
use runcoach_core::tool::{Tool, ToolResult};

use crate::args;

const RACES: [(&str, f64); 4] = [
    ("5K", 5.0),
    ("10K", 10.0),
    ("Half Marathon", 21.1),
    ("Marathon", 42.2),
];

pub struct PaceTool;

/// Format a duration in minutes as `H:MM:SS`, or `M:SS` under an hour.
pub fn format_time(minutes: f64) -> String {
    let hours = (minutes / 60.0).floor() as u64;
    let mins = (minutes % 60.0).floor() as u64;
    let secs = ((minutes * 60.0) % 60.0).floor() as u64;

    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}

fn format_km(km: f64) -> String {
    if km.fract() == 0.0 { format!("{km:.1}") } else { format!("{km}") }
}

pub fn analyse(distance_km: f64, time_minutes: f64, target_km: Option<f64>) -> String {
    let pace = time_minutes / distance_km;
    let pace_min = pace.trunc();
    let pace_sec = ((pace - pace_min) * 60.0).trunc();
    let speed = distance_km / time_minutes * 60.0;

    let mut out = format!(
        "Pace Analysis:\n\n\
         ⏱️ Your Stats:\n\
         - Distance: {distance_km:.2} km\n\
         - Time: {} min {} sec\n\
         - Pace: {}:{:02} per km\n\
         - Speed: {speed:.1} km/h\n\n\
         🏆 Race Time Predictions (based on current pace):",
        time_minutes.trunc() as u64,
        ((time_minutes % 1.0) * 60.0).trunc() as u64,
        pace_min as u64,
        pace_sec as u64,
    );

    for (name, km) in RACES {
        out.push_str(&format!("\n- {name}: {}", format_time(pace * km)));
    }

    if let Some(target) = target_km.filter(|t| *t > 0.0) {
        out.push_str(&format!("\n\n🎯 Target {}km: {}", format_km(target), format_time(pace * target)));
    }

    out
}

#[async_trait]
impl Tool for PaceTool {
    fn name(&self) -> &str {
        "calculate_pace"
    }

    fn description(&self) -> &str {
        "Calculate running pace and predict race times."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "distance_km": { "type": "number", "description": "Distance run in kilometers" },
                "time_minutes": { "type": "number", "description": "Time taken in minutes" },
                "target_distance": {
                    "type": "number",
                    "description": "Optional target race distance in km to predict time"
                }
            },
            "required": ["distance_km", "time_minutes"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let distance = args::required_f64(&arguments, "distance_km")?;
        let time = args::required_f64(&arguments, "time_minutes")?;
        let target = args::optional_f64(&arguments, "target_distance")?;

        if distance <= 0.0 || time <= 0.0 {
            return Err(ToolError::InvalidArguments(
                "distance_km and time_minutes must be positive".into(),
            ));
        }

        Ok(ToolResult::ok(analyse(distance, time, target)))
    }
}
