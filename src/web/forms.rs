use std::fmt::Display;
use std::ops::RangeInclusive;

use serde::Deserialize;

use crate::error::HealthError;
use crate::profile::{ActivityLevel, Goal, Sex, UserProfile};

pub const AGE_RANGE: RangeInclusive<u32> = 5..=120;
pub const WEIGHT_RANGE: RangeInclusive<f64> = 20.0..=300.0;
pub const HEIGHT_RANGE: RangeInclusive<f64> = 80.0..=250.0;
pub const DAYS_RANGE: RangeInclusive<u32> = 1..=14;
pub const DEFAULT_DAYS: u32 = 3;

/// The sidebar profile form, as posted by the "Generate meal plan" button
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub age: u32,
    pub sex: Sex,
    pub weight: f64,
    pub height: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub preferences: String,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    DEFAULT_DAYS
}

fn check_range<T>(name: &str, value: T, range: &RangeInclusive<T>) -> Result<(), HealthError>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(HealthError::InvalidInput(format!(
            "{} must be between {} and {}",
            name,
            range.start(),
            range.end()
        )))
    }
}

impl ProfileForm {
    /// Apply the form's range limits and split into profile and day count
    pub fn into_profile(self) -> Result<(UserProfile, u32), HealthError> {
        check_range("Age", self.age, &AGE_RANGE)?;
        check_range("Weight (kg)", self.weight, &WEIGHT_RANGE)?;
        check_range("Height (cm)", self.height, &HEIGHT_RANGE)?;
        check_range("Meal plan days", self.days, &DAYS_RANGE)?;

        let profile = UserProfile {
            age: self.age,
            sex: self.sex,
            weight_kg: self.weight,
            height_cm: self.height,
            activity_level: self.activity,
            goal: self.goal,
            allergies: self.allergies.trim().to_string(),
            preferences: self.preferences.trim().to_string(),
        };

        Ok((profile, self.days))
    }

    /// Profile fields posted along with another action. Missing or
    /// out-of-range values leave the page on its defaults.
    pub fn carried(body: &[u8]) -> Option<(UserProfile, u32)> {
        serde_urlencoded::from_bytes::<ProfileForm>(body)
            .ok()?
            .into_profile()
            .ok()
    }
}

/// The free-text question box
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionForm {
    #[serde(default)]
    pub question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProfileForm {
        ProfileForm {
            age: 28,
            sex: Sex::Female,
            weight: 70.0,
            height: 170.0,
            activity: ActivityLevel::Moderate,
            goal: Goal::MaintainWeight,
            allergies: " gluten ".to_string(),
            preferences: String::new(),
            days: 3,
        }
    }

    #[test]
    fn test_valid_form() {
        let (profile, days) = form().into_profile().unwrap();
        assert_eq!(days, 3);
        assert_eq!(profile.allergies, "gluten");
        assert_eq!(profile.activity_level, ActivityLevel::Moderate);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut low = form();
        low.age = 5;
        low.weight = 20.0;
        low.height = 80.0;
        low.days = 1;
        assert!(low.into_profile().is_ok());

        let mut high = form();
        high.age = 120;
        high.days = 14;
        assert!(high.into_profile().is_ok());
    }

    #[test]
    fn test_out_of_range_values() {
        let mut too_old = form();
        too_old.age = 121;
        let err = too_old.into_profile().unwrap_err();
        assert_eq!(err.to_string(), "Age must be between 5 and 120");

        let mut too_many_days = form();
        too_many_days.days = 15;
        assert!(too_many_days.into_profile().is_err());

        let mut too_light = form();
        too_light.weight = 19.5;
        assert!(too_light.into_profile().is_err());
    }

    #[test]
    fn test_deserializes_from_urlencoded_labels() {
        let body = "age=30&sex=Other&weight=65.5&height=160&activity=Very+active&goal=Gain+weight&allergies=&preferences=low-carb";
        let form: ProfileForm = serde_urlencoded::from_str(body).unwrap();
        assert_eq!(form.activity, ActivityLevel::VeryActive);
        assert_eq!(form.goal, Goal::GainWeight);
        assert_eq!(form.days, DEFAULT_DAYS);
        assert_eq!(form.preferences, "low-carb");
    }

    #[test]
    fn test_carried_profile_ignores_other_fields() {
        let body = b"question=Is+rice+ok%3F&age=41&sex=Male&weight=90&height=185&activity=Light&goal=Lose+weight&allergies=shellfish&days=5";
        let (profile, days) = ProfileForm::carried(body).unwrap();
        assert_eq!(profile.age, 41);
        assert_eq!(profile.allergies, "shellfish");
        assert_eq!(days, 5);
    }

    #[test]
    fn test_carried_profile_falls_back() {
        assert!(ProfileForm::carried(b"question=hello").is_none());
        assert!(ProfileForm::carried(b"age=300&sex=Male&weight=90&height=185&activity=Light&goal=Lose+weight").is_none());
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let body = "age=30&sex=Robot&weight=65&height=160&activity=Light&goal=Lose+weight";
        assert!(serde_urlencoded::from_str::<ProfileForm>(body).is_err());
    }
}
