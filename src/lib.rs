pub mod advisor;
pub mod config;
pub mod error;
pub mod extract;
pub mod profile;
pub mod prompts;
pub mod providers;
pub mod upload;
pub mod web;

pub use advisor::HealthAdvisor;
pub use config::AppConfig;
pub use error::HealthError;
pub use extract::{extract_json, Extracted};
pub use profile::{heuristic_calorie_adjust, ActivityLevel, Goal, Sex, UserProfile};
pub use providers::{ContentPart, GeminiProvider, LlmProvider};
pub use upload::ImagePayload;
