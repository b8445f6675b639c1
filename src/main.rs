use std::process::ExitCode;
use std::sync::Arc;

use health_manager::{web, AppConfig, GeminiProvider, HealthAdvisor, HealthError, LlmProvider};
use log::{error, info};

async fn run() -> Result<(), HealthError> {
    let config = AppConfig::load()?;

    // Fails immediately when no API key source is present
    let provider = GeminiProvider::new(&config)?;
    info!("Using {} model {}", provider.provider_name(), provider.model());

    let advisor = HealthAdvisor::new(Arc::new(provider));
    web::serve(advisor, &config.bind_addr).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the key may come from the real environment
    dotenv::dotenv().ok();
    env_logger::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
