use std::sync::Arc;

use log::{debug, info};

use crate::error::HealthError;
use crate::extract::{extract_json, Extracted};
use crate::profile::UserProfile;
use crate::prompts::{food_image_prompt, health_question_prompt, meal_plan_prompt};
use crate::providers::{ContentPart, LlmProvider};
use crate::upload::ImagePayload;

/// Builds prompts, makes the single generation call and normalizes the reply.
///
/// Holds only the read-only provider handle, so it can be shared freely
/// between requests.
#[derive(Clone)]
pub struct HealthAdvisor {
    provider: Arc<dyn LlmProvider>,
}

impl HealthAdvisor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Generate a `days`-day meal plan for the profile.
    ///
    /// Returns the parsed JSON plan, or the raw reply when no JSON object
    /// could be extracted.
    pub async fn generate_meal_plan(
        &self,
        profile: &UserProfile,
        days: u32,
    ) -> Result<Extracted, HealthError> {
        let prompt = meal_plan_prompt(profile, days);
        debug!("Meal plan prompt: {}", prompt);

        let text = self.provider.generate(&[ContentPart::Text(prompt)]).await?;
        let plan = extract_json(&text);
        info!(
            "Generated {}-day meal plan with {} (parsed: {})",
            days,
            self.provider.model(),
            plan.is_parsed()
        );
        Ok(plan)
    }

    /// Send a food photo with the nutrition analyst instruction.
    pub async fn analyze_food_image(
        &self,
        image: ImagePayload,
        extra_prompt: &str,
    ) -> Result<Extracted, HealthError> {
        let parts = [
            ContentPart::Text(food_image_prompt(extra_prompt)),
            ContentPart::Image(image),
        ];

        let text = self.provider.generate(&parts).await?;
        let analysis = extract_json(&text);
        info!("Analyzed food image (parsed: {})", analysis.is_parsed());
        Ok(analysis)
    }

    /// Answer an open health question. The reply is returned as prose.
    pub async fn ask(&self, question: &str) -> Result<String, HealthError> {
        if question.trim().is_empty() {
            return Err(HealthError::InvalidInput(
                "Please enter a question.".to_string(),
            ));
        }

        let answer = self
            .provider
            .generate(&[ContentPart::Text(health_question_prompt(question))])
            .await?;
        info!("Answered health question ({} chars)", answer.len());
        Ok(answer)
    }
}
