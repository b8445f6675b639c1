pub mod forms;
mod handlers;
pub mod page;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use log::info;
use tokio::net::TcpListener;

use crate::advisor::HealthAdvisor;
use crate::upload::MAX_IMAGE_SIZE;

/// Room for the multipart framing and text fields around the photo
const FORM_OVERHEAD: usize = 64 * 1024;

/// Build the single-page web UI
pub fn router(advisor: HealthAdvisor) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/meal-plan", post(handlers::generate_meal_plan))
        .route("/analyze", post(handlers::analyze_food_image))
        .route("/ask", post(handlers::ask))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + FORM_OVERHEAD))
        .with_state(advisor)
}

/// Serve the web UI until the process is stopped
pub async fn serve(advisor: HealthAdvisor, bind_addr: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Health manager listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(advisor)).await
}
