//! System prompt assembly.
//!
//! The prompt is rebuilt for every turn from the caller's profile and the
//! context retrieved for the current message. Nothing here touches I/O.

use runcoach_core::UserProfile;

const PERSONA: &str = "You are RunCoach AI, an expert running coach and sports nutritionist.";

const BANNER: &str = "══════════════════════════════════════════════════════════";

const NOT_PROVIDED: &str = "Not provided";

const NO_PROFILE_NOTICE: &str = "NOTE: No user profile available. You may need to ask the user to \
update their profile from the settings panel on the left side of the app.";

const INSTRUCTIONS: &str = "\
AVAILABLE TOOLS:
1. get_weather - Check weather and forecast for run planning
2. calculate_nutrition - Calculate BMR, TDEE, macros for runners
3. calculate_pace - Analyze pace and predict race times

WHEN TO USE TOOLS:

Use get_weather when:
- User asks \"should I run today/tomorrow?\"
- User asks \"what kind of run should I do?\"
- User asks \"what should I wear for a run?\"
- User asks about outdoor running plans
- User mentions weather, rain, temperature, or conditions
- User wants to plan runs for the week
- User asks about best time to run
- ANY question about tomorrow's run or future runs
- ALWAYS check weather before recommending specific workouts for a day

Use calculate_nutrition when:
- User asks about calories, macros, nutrition plan, or diet
- You have the user's weight, height, and age from their profile
- IMPORTANT: If profile has weight/height/age, use the tool immediately - don't ask for data you already have!

Use calculate_pace when:
- User shares a recent run time/distance
- User wants race time predictions
- User asks about pacing strategy

CRITICAL INSTRUCTIONS:
- ALWAYS call get_weather before recommending what type of run to do on a specific day
- ALWAYS call get_weather before suggesting what to wear for a run
- If the user's profile contains weight, height, and age - USE IT! Don't ask again!
- Base your responses on the KNOWLEDGE BASE CONTEXT provided above
- Provide specific, actionable advice personalized to this user
- Prioritize safety and injury prevention
- Be encouraging but professional

TRAINING PLAN GUIDELINES:
When creating training plans:
1. ALWAYS create the plan for THE USER'S STATED GOAL (shown in profile above)
2. Do NOT default to marathon - use their actual goal distance
3. Include a MIX of these workout types:
   - Easy runs (60-70% of training) - conversational pace
   - Long runs (1 per week) - building endurance
   - Tempo runs (1 per week) - comfortably hard pace
   - Interval/Speed work (1 per week) - 400m/800m repeats, fartlek
   - Recovery runs - very easy, shorter distance
   - Rest days - essential for adaptation

Example week structure:
- Mon: Rest
- Tue: Easy run + strides
- Wed: Intervals (6x800m at 5K pace)
- Thu: Easy run
- Fri: Rest or cross-training
- Sat: Tempo run
- Sun: Long run";

/// Builds the per-turn system prompt.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Assemble the prompt.
    ///
    /// Without a profile the prompt carries a notice asking the user to set
    /// one up. Without context the knowledge section is left out entirely.
    pub fn build(profile: Option<&UserProfile>, context: Option<&str>) -> String {
        let mut prompt = String::from(PERSONA);
        prompt.push_str("\n\n");

        match profile {
            Some(profile) => prompt.push_str(&profile_section(profile)),
            None => prompt.push_str(NO_PROFILE_NOTICE),
        }

        if let Some(context) = context {
            prompt.push_str("\n\nKNOWLEDGE BASE CONTEXT:\n");
            prompt.push_str(context);
            prompt.push_str("\n---");
        }

        prompt.push_str("\n\n");
        prompt.push_str(INSTRUCTIONS);
        prompt
    }
}

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NOT_PROVIDED.into())
}

fn with_unit<T: ToString>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {unit}", v.to_string()),
        None => NOT_PROVIDED.into(),
    }
}

fn profile_section(profile: &UserProfile) -> String {
    let location = profile.location();

    let (headline, goal_rule, plan_reminder) = match profile.goal() {
        Some(goal) => {
            let upper = goal.to_uppercase();
            (
                upper.clone(),
                format!(
                    "IMPORTANT: The user wants to train for {goal}.
ALL training plans MUST be for {goal} - not marathon, not half-marathon, not any other distance unless {goal} IS that distance."
                ),
                format!("1. Create plans for {upper} - THIS IS THE USER'S GOAL, not anything else in the history"),
            )
        }
        None => (
            NOT_PROVIDED.to_string(),
            "IMPORTANT: The user has not set a goal.
Ask which race or distance they are training for before writing any plan - do not assume one."
                .to_string(),
            "1. No goal on file - ask for it before creating a plan".to_string(),
        ),
    };

    let weather_reminder = match location {
        Some(location) => format!("4. Use {location} for weather checks"),
        None => "4. No location on file - ask the user where they run before checking weather".into(),
    };

    format!(
        "{BANNER}
🎯 USER'S CURRENT GOAL: {headline}
{BANNER}
{goal_rule}
USER PROFILE:
- Name: {name}
- Age: {age}
- Weight: {weight}
- Height: {height}
- Experience Level: {experience}
- Training Days/Week: {days}
- Current Weekly Mileage: {mileage}
- Dietary Preference: {diet}
- Location: {location_line}
{BANNER}

CRITICAL REMINDERS:
{plan_reminder}
2. Consider the user's profile, running proficiency and current mileage when creating any sort of plan.
3. You already have weight/height/age - don't ask for them again and use them
{weather_reminder}",
        name = profile.display_name().unwrap_or(NOT_PROVIDED),
        age = or_missing(profile.age),
        weight = with_unit(profile.weight, "kg"),
        height = with_unit(profile.height, "cm"),
        experience = profile.experience_level,
        days = profile.training_days,
        mileage = with_unit(profile.weekly_mileage, "km"),
        diet = profile.dietary_preference,
        location_line = or_missing(location),
    )
}
