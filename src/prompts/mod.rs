use crate::profile::UserProfile;

/// Dietitian instruction template for meal plans.
///
/// Contains `{{DAYS}}` and `{{PROFILE}}` placeholders, filled in by
/// [`meal_plan_prompt`].
pub const MEAL_PLAN_PROMPT: &str = include_str!("meal_plan.txt");

/// Nutrition analyst instruction sent alongside a food photo.
pub const FOOD_IMAGE_PROMPT: &str = include_str!("food_image.txt");

/// Health advisor instruction template with a `{{QUESTION}}` placeholder.
pub const HEALTH_QUESTION_PROMPT: &str = include_str!("health_question.txt");

/// Build the meal plan prompt: one `key: value` line per profile field plus
/// the requested number of days.
pub fn meal_plan_prompt(profile: &UserProfile, days: u32) -> String {
    let profile_text = profile
        .fields()
        .into_iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join("\n");

    MEAL_PLAN_PROMPT
        .trim_end()
        .replace("{{DAYS}}", &days.to_string())
        .replace("{{PROFILE}}", &profile_text)
}

/// Build the food photo instruction, appending `extra` verbatim.
pub fn food_image_prompt(extra: &str) -> String {
    format!("{}{}", FOOD_IMAGE_PROMPT, extra)
}

/// Wrap a free-text health question in the advisor instruction.
pub fn health_question_prompt(question: &str) -> String {
    HEALTH_QUESTION_PROMPT
        .trim_end()
        .replace("{{QUESTION}}", question)
}
