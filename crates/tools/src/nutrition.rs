//! Daily energy and macro targets for runners (Mifflin–St Jeor).

use async_trait::async_trait;
use runcoach_core::error::ToolError;
use runcoach_core::tool::{Tool, ToolResult};

use crate::args;

pub struct NutritionTool;

/// Computed daily targets.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionPlan {
    pub bmr: f64,
    pub tdee: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub water_ml: f64,
}

/// Activity multiplier; unknown levels count as moderate.
pub fn activity_multiplier(level: &str) -> f64 {
    match level.to_lowercase().as_str() {
        "sedentary" => 1.2,
        "light" => 1.375,
        "moderate" => 1.55,
        "active" => 1.725,
        "very_active" => 1.9,
        _ => 1.55,
    }
}

pub fn plan(weight_kg: f64, height_cm: f64, age: f64, gender: &str, activity_level: &str) -> NutritionPlan {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    let bmr = if gender.eq_ignore_ascii_case("male") { base + 5.0 } else { base - 161.0 };
    let tdee = bmr * activity_multiplier(activity_level);

    NutritionPlan {
        bmr,
        tdee,
        // Endurance split: 1.6 g/kg protein, 55% carbs, 25% fat.
        protein_g: weight_kg * 1.6,
        carbs_g: tdee * 0.55 / 4.0,
        fat_g: tdee * 0.25 / 9.0,
        water_ml: weight_kg * 35.0,
    }
}

fn render(p: &NutritionPlan) -> String {
    format!(
        "Nutrition Calculator Results:\n\n\
         📊 Basic Stats:\n\
         - BMR (Basal Metabolic Rate): {:.0} calories/day\n\
         - TDEE (Total Daily Energy): {:.0} calories/day\n\n\
         🍽️ Recommended Daily Macros for Runners:\n\
         - Protein: {:.0}g ({:.0} cal)\n\
         - Carbohydrates: {:.0}g ({:.0} cal)\n\
         - Fat: {:.0}g ({:.0} cal)\n\n\
         💡 Tips:\n\
         - Eat carbs 2-3 hours before runs\n\
         - Protein within 30 min post-run for recovery\n\
         - Stay hydrated: aim for {:.0}ml water daily",
        p.bmr,
        p.tdee,
        p.protein_g,
        p.protein_g * 4.0,
        p.carbs_g,
        p.carbs_g * 4.0,
        p.fat_g,
        p.fat_g * 9.0,
        p.water_ml,
    )
}

#[async_trait]
impl Tool for NutritionTool {
    fn name(&self) -> &str {
        "calculate_nutrition"
    }

    fn description(&self) -> &str {
        "Calculate BMR, TDEE, and macro recommendations for a runner."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "weight_kg": { "type": "number", "description": "Body weight in kilograms" },
                "height_cm": { "type": "number", "description": "Height in centimeters" },
                "age": { "type": "integer", "description": "Age in years" },
                "gender": {
                    "type": "string",
                    "description": "\"male\" or \"female\"",
                    "default": "male"
                },
                "activity_level": {
                    "type": "string",
                    "enum": ["sedentary", "light", "moderate", "active", "very_active"],
                    "default": "moderate"
                }
            },
            "required": ["weight_kg", "height_cm", "age"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let weight = args::required_f64(&arguments, "weight_kg")?;
        let height = args::required_f64(&arguments, "height_cm")?;
        let age = args::required_f64(&arguments, "age")?.trunc();
        let gender = args::optional_str(&arguments, "gender").unwrap_or("male");
        let activity = args::optional_str(&arguments, "activity_level").unwrap_or("moderate");

        if weight <= 0.0 || height <= 0.0 || age <= 0.0 {
            return Err(ToolError::InvalidArguments(
                "weight_kg, height_cm and age must be positive".into(),
            ));
        }

        Ok(ToolResult::ok(render(&plan(weight, height, age, gender, activity))))
    }
}
