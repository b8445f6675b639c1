use axum::{
    extract::{
        rejection::{FormRejection, RawFormRejection},
        Multipart, RawForm, State,
    },
    http::StatusCode,
    response::Html,
    Form,
};
use log::{error, warn};

use crate::advisor::HealthAdvisor;
use crate::error::HealthError;
use crate::upload::ImagePayload;
use crate::web::forms::{ProfileForm, QuestionForm};
use crate::web::page::{render_page, PageView, Panel};

type PageResponse = (StatusCode, Html<String>);

fn respond(status: StatusCode, view: &PageView) -> PageResponse {
    (status, Html(render_page(view)))
}

/// Status for a failed action: bad input is the user's to fix, anything
/// else came from the generation API.
fn status_for(err: &HealthError) -> StatusCode {
    match err {
        HealthError::InvalidInput(_) | HealthError::InvalidImage(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        _ => StatusCode::BAD_GATEWAY,
    }
}

pub async fn index(State(advisor): State<HealthAdvisor>) -> Html<String> {
    Html(render_page(&PageView::new(advisor.provider().model())))
}

pub async fn generate_meal_plan(
    State(advisor): State<HealthAdvisor>,
    form: Result<Form<ProfileForm>, FormRejection>,
) -> PageResponse {
    let mut view = PageView::new(advisor.provider().model());

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Rejected profile form: {}", rejection.body_text());
            view.meal_plan = Some(Panel::Error(format!(
                "Invalid profile: {}",
                rejection.body_text()
            )));
            return respond(StatusCode::UNPROCESSABLE_ENTITY, &view);
        }
    };

    let (profile, days) = match form.into_profile() {
        Ok(parsed) => parsed,
        Err(e) => {
            view.meal_plan = Some(Panel::Error(e.to_string()));
            return respond(status_for(&e), &view);
        }
    };
    view.profile = profile;
    view.days = days;

    let result = advisor.generate_meal_plan(&view.profile, days).await;
    match result {
        Ok(plan) => {
            view.meal_plan = Some(Panel::Json {
                title: "Meal plan (AI):".to_string(),
                result: plan,
            });
            respond(StatusCode::OK, &view)
        }
        Err(e) => {
            error!("Error generating meal plan: {}", e);
            view.meal_plan = Some(Panel::Error(format!("Error generating meal plan: {}", e)));
            respond(status_for(&e), &view)
        }
    }
}

/// Fields of the photo upload form
#[derive(Debug, Default)]
struct AnalyzeUpload {
    image: Option<Vec<u8>>,
    notes: String,
    portion: Option<f64>,
    /// Remaining text fields, which carry the sidebar profile
    fields: Vec<(String, String)>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<AnalyzeUpload, HealthError> {
    let mut upload = AnalyzeUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HealthError::InvalidInput(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| HealthError::InvalidImage(format!("Failed to read image: {}", e)))?;
                // Browsers send an empty part when no file was chosen
                if !data.is_empty() {
                    upload.image = Some(data.to_vec());
                }
            }
            "notes" => {
                upload.notes = field.text().await.map_err(|e| {
                    HealthError::InvalidInput(format!("Failed to read notes: {}", e))
                })?;
            }
            "portion" => {
                let value = field.text().await.map_err(|e| {
                    HealthError::InvalidInput(format!("Failed to read portion: {}", e))
                })?;
                let value = value.trim();
                if !value.is_empty() {
                    let portion = value
                        .parse::<f64>()
                        .ok()
                        .filter(|p| p.is_finite() && *p > 0.0)
                        .ok_or_else(|| {
                            HealthError::InvalidInput(
                                "Portion multiplier must be a positive number".to_string(),
                            )
                        })?;
                    upload.portion = Some(portion);
                }
            }
            _ => {
                let value = field.text().await.map_err(|e| {
                    HealthError::InvalidInput(format!("Failed to read field {}: {}", name, e))
                })?;
                upload.fields.push((name, value));
            }
        }
    }

    Ok(upload)
}

pub async fn analyze_food_image(
    State(advisor): State<HealthAdvisor>,
    mut multipart: Multipart,
) -> PageResponse {
    let mut view = PageView::new(advisor.provider().model());

    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            view.analysis = Some(Panel::Error(format!("Error analyzing image: {}", e)));
            return respond(status_for(&e), &view);
        }
    };
    view.portion = upload.portion;
    if let Some((profile, days)) = serde_urlencoded::to_string(&upload.fields)
        .ok()
        .and_then(|encoded| ProfileForm::carried(encoded.as_bytes()))
    {
        view.profile = profile;
        view.days = days;
    }

    let Some(data) = upload.image else {
        view.analysis = Some(Panel::Warning("Please upload a food photo.".to_string()));
        return respond(StatusCode::OK, &view);
    };

    let result = match ImagePayload::from_bytes(data) {
        Ok(image) => {
            view.preview = Some(image.data_uri());
            advisor.analyze_food_image(image, upload.notes.trim()).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(analysis) => {
            view.analysis = Some(Panel::Json {
                title: "Analysis result:".to_string(),
                result: analysis,
            });
            respond(StatusCode::OK, &view)
        }
        Err(e) => {
            error!("Error analyzing image: {}", e);
            view.analysis = Some(Panel::Error(format!("Error analyzing image: {}", e)));
            respond(status_for(&e), &view)
        }
    }
}

pub async fn ask(
    State(advisor): State<HealthAdvisor>,
    body: Result<RawForm, RawFormRejection>,
) -> PageResponse {
    let mut view = PageView::new(advisor.provider().model());

    let form = body
        .map_err(|rejection| rejection.body_text())
        .and_then(|RawForm(body)| {
            if let Some((profile, days)) = ProfileForm::carried(&body) {
                view.profile = profile;
                view.days = days;
            }
            serde_urlencoded::from_bytes::<QuestionForm>(&body).map_err(|e| e.to_string())
        });
    let form = match form {
        Ok(form) => form,
        Err(message) => {
            warn!("Rejected question form: {}", message);
            view.answer = Some(Panel::Error(format!("Invalid question form: {}", message)));
            return respond(StatusCode::UNPROCESSABLE_ENTITY, &view);
        }
    };
    view.question = form.question;

    let result = advisor.ask(&view.question).await;
    match result {
        Ok(answer) => {
            view.answer = Some(Panel::Prose {
                title: "Answer:".to_string(),
                text: answer,
            });
            respond(StatusCode::OK, &view)
        }
        Err(HealthError::InvalidInput(message)) => {
            view.answer = Some(Panel::Warning(message));
            respond(StatusCode::OK, &view)
        }
        Err(e) => {
            error!("Error getting answer: {}", e);
            view.answer = Some(Panel::Error(format!("Error getting answer: {}", e)));
            respond(status_for(&e), &view)
        }
    }
}
