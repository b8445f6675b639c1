use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    #[serde(rename = "Very active")]
    VeryActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Maintain weight")]
    MaintainWeight,
    #[serde(rename = "Lose weight")]
    LoseWeight,
    #[serde(rename = "Gain weight")]
    GainWeight,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Female, Sex::Male, Sex::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
            Sex::Other => "Other",
        }
    }
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Light => "Light",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::Active => "Active",
            ActivityLevel::VeryActive => "Very active",
        }
    }
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::MaintainWeight, Goal::LoseWeight, Goal::GainWeight];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::MaintainWeight => "Maintain weight",
            Goal::LoseWeight => "Lose weight",
            Goal::GainWeight => "Gain weight",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Health attributes collected from the profile form for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub age: u32,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    /// Allergies / dietary restrictions, comma separated
    pub allergies: String,
    /// Free-text preferences (e.g. vegetarian, low-carb)
    pub preferences: String,
}

impl UserProfile {
    /// Ordered `(key, value)` pairs as they appear in the meal plan prompt
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("age", self.age.to_string()),
            ("sex", self.sex.to_string()),
            ("weight_kg", format_measure(self.weight_kg)),
            ("height_cm", format_measure(self.height_cm)),
            ("activity_level", self.activity_level.to_string()),
            ("goals", self.goal.to_string()),
            ("allergies", self.allergies.clone()),
            ("preferences", self.preferences.clone()),
        ]
    }
}

/// Whole numbers keep one decimal place (70 -> "70.0")
fn format_measure(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 28,
            sex: Sex::Female,
            weight_kg: 70.0,
            height_cm: 170.0,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::MaintainWeight,
            allergies: String::new(),
            preferences: String::new(),
        }
    }
}

/// Scale a calorie estimate by a portion multiplier, truncating toward zero.
pub fn heuristic_calorie_adjust(base_calories: f64, portion_multiplier: f64) -> i64 {
    (base_calories * portion_multiplier) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_serde() {
        for level in ActivityLevel::ALL {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.label()));
        }
        let goal: Goal = serde_json::from_str("\"Lose weight\"").unwrap();
        assert_eq!(goal, Goal::LoseWeight);
    }

    #[test]
    fn test_fields_order_and_keys() {
        let keys: Vec<&str> = UserProfile::default()
            .fields()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec![
                "age",
                "sex",
                "weight_kg",
                "height_cm",
                "activity_level",
                "goals",
                "allergies",
                "preferences"
            ]
        );
    }

    #[test]
    fn test_measures_keep_a_decimal() {
        let mut profile = UserProfile::default();
        let fields = profile.fields();
        assert_eq!(fields[2], ("weight_kg", "70.0".to_string()));
        assert_eq!(fields[3], ("height_cm", "170.0".to_string()));

        profile.weight_kg = 61.5;
        profile.height_cm = 168.25;
        let fields = profile.fields();
        assert_eq!(fields[2].1, "61.5");
        assert_eq!(fields[3].1, "168.25");
    }

    #[test]
    fn test_heuristic_calorie_adjust() {
        assert_eq!(heuristic_calorie_adjust(500.0, 1.0), 500);
        assert_eq!(heuristic_calorie_adjust(500.0, 1.5), 750);
        assert_eq!(heuristic_calorie_adjust(333.0, 0.5), 166);
    }
}
