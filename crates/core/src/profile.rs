//! User profile supplied by the caller with each chat request.
//!
//! The profile is never cached by the orchestrator; it is rendered into the
//! system prompt for the current turn only.

use serde::{Deserialize, Serialize};

/// A runner's profile. Field names match the JSON sent by the web frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    /// Body weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Height in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default = "default_experience_level")]
    pub experience_level: String,

    /// Current weekly mileage in kilometers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_mileage: Option<f64>,

    /// Target race or outcome, e.g. "5K", "half marathon"
    #[serde(default = "default_goal")]
    pub goal: String,

    #[serde(default = "default_dietary_preference")]
    pub dietary_preference: String,

    #[serde(default = "default_training_days")]
    pub training_days: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

fn default_experience_level() -> String {
    "beginner".into()
}
fn default_goal() -> String {
    "5K".into()
}
fn default_dietary_preference() -> String {
    "none".into()
}
fn default_training_days() -> u32 {
    3
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: None,
            age: None,
            weight: None,
            height: None,
            experience_level: default_experience_level(),
            weekly_mileage: None,
            goal: default_goal(),
            dietary_preference: default_dietary_preference(),
            training_days: default_training_days(),
            location: None,
        }
    }
}

impl UserProfile {
    /// The runner's name, ignoring blank strings.
    pub fn display_name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    /// The runner's location, ignoring blank strings.
    pub fn location(&self) -> Option<&str> {
        non_blank(&self.location)
    }

    /// The goal as given, `None` when blank.
    pub fn goal(&self) -> Option<&str> {
        Some(self.goal.trim()).filter(|s| !s.is_empty())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let profile: UserProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile, UserProfile::default());
        assert_eq!(profile.goal, "5K");
        assert_eq!(profile.experience_level, "beginner");
        assert_eq!(profile.training_days, 3);
    }

    #[test]
    fn frontend_payload_parses() {
        let json = r#"{
            "name": "Asha",
            "age": 29,
            "weight": 58.5,
            "height": 165,
            "experience_level": "intermediate",
            "weekly_mileage": 25,
            "goal": "Half Marathon",
            "dietary_preference": "vegetarian",
            "training_days": 4,
            "location": ""
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.display_name(), Some("Asha"));
        assert_eq!(profile.height, Some(165.0));
        assert_eq!(profile.goal(), Some("Half Marathon"));
        assert!(profile.location().is_none());
    }

    #[test]
    fn blank_goal_is_missing() {
        let profile = UserProfile { goal: "  ".into(), ..UserProfile::default() };
        assert_eq!(profile.goal(), None);
    }
}
