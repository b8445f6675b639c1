use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;

use crate::extract::Extracted;
use crate::profile::{heuristic_calorie_adjust, ActivityLevel, Goal, Sex, UserProfile};
use crate::web::forms::{AGE_RANGE, DAYS_RANGE, DEFAULT_DAYS, HEIGHT_RANGE, WEIGHT_RANGE};

/// What to show under one of the three page sections
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    /// Extracted model output, shown as pretty-printed JSON
    Json { title: String, result: Extracted },
    /// Free-text answer, shown as paragraphs
    Prose { title: String, text: String },
    Warning(String),
    Error(String),
}

/// Everything needed to render the single page
#[derive(Debug, Clone)]
pub struct PageView {
    pub model: String,
    pub profile: UserProfile,
    pub days: u32,
    pub question: String,
    pub meal_plan: Option<Panel>,
    pub analysis: Option<Panel>,
    /// Portion multiplier applied to `estimated_calories` of an analysis
    pub portion: Option<f64>,
    /// `data:` URI of the analyzed photo
    pub preview: Option<String>,
    pub answer: Option<Panel>,
}

impl PageView {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            profile: UserProfile::default(),
            days: DEFAULT_DAYS,
            question: String::new(),
            meal_plan: None,
            analysis: None,
            portion: None,
            preview: None,
            answer: None,
        }
    }
}

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
aside{width:18rem;padding:1rem;background:#f0f2f6;min-height:100vh}\
main{max-width:46rem;padding:1rem 2rem}\
label{display:block;margin:.5rem 0 .2rem}\
input,select,textarea{width:100%;box-sizing:border-box}\
pre{background:#f6f8fa;padding:.75rem;overflow-x:auto}\
.error{background:#fde8e8;padding:.5rem}\
.warning{background:#fff4e5;padding:.5rem}\
img.preview{max-width:100%;margin:.5rem 0}";

fn select<T: Copy + PartialEq>(name: &str, options: &[T], selected: T, label: fn(&T) -> &'static str) -> String {
    let options: String = options
        .iter()
        .map(|option| {
            format!(
                "<option value=\"{value}\"{sel}>{value}</option>",
                value = label(option),
                sel = if *option == selected { " selected" } else { "" }
            )
        })
        .collect();
    format!("<select name=\"{}\" form=\"page\">{}</select>", name, options)
}

fn render_sidebar(view: &PageView) -> String {
    let p = &view.profile;
    format!(
        r#"<aside>
<h2>Your health profile</h2>
<label>Age</label><input form="page" type="number" name="age" min="{age_min}" max="{age_max}" value="{age}">
<label>Sex</label>{sex}
<label>Weight (kg)</label><input form="page" type="number" step="0.1" name="weight" min="{w_min}" max="{w_max}" value="{weight}">
<label>Height (cm)</label><input form="page" type="number" step="0.1" name="height" min="{h_min}" max="{h_max}" value="{height}">
<label>Activity level</label>{activity}
<label>Goal</label>{goal}
<label>Allergies / dietary restrictions (comma separated)</label><input form="page" type="text" name="allergies" value="{allergies}">
<label>Preferences (e.g. vegetarian, low-carb)</label><input form="page" type="text" name="preferences" value="{preferences}">
<label>Meal plan days</label><input form="page" type="range" name="days" min="{d_min}" max="{d_max}" value="{days}">
</aside>"#,
        age_min = AGE_RANGE.start(),
        age_max = AGE_RANGE.end(),
        age = p.age,
        sex = select("sex", &Sex::ALL, p.sex, Sex::label),
        w_min = WEIGHT_RANGE.start(),
        w_max = WEIGHT_RANGE.end(),
        weight = p.weight_kg,
        h_min = HEIGHT_RANGE.start(),
        h_max = HEIGHT_RANGE.end(),
        height = p.height_cm,
        activity = select("activity", &ActivityLevel::ALL, p.activity_level, ActivityLevel::label),
        goal = select("goal", &Goal::ALL, p.goal, Goal::label),
        allergies = encode_double_quoted_attribute(&p.allergies),
        preferences = encode_double_quoted_attribute(&p.preferences),
        d_min = DAYS_RANGE.start(),
        d_max = DAYS_RANGE.end(),
        days = view.days,
    )
}

fn render_prose(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|para| !para.is_empty())
        .map(|para| format!("<p>{}</p>", encode_text(para).replace('\n', "<br>")))
        .collect()
}

/// Calorie line for an analysis result scaled by a non-trivial portion multiplier
fn render_portion(result: &Extracted, portion: Option<f64>) -> Option<String> {
    let portion = portion.filter(|p| *p > 0.0 && *p != 1.0)?;
    let calories = result.get("estimated_calories").and_then(Value::as_f64)?;
    Some(format!(
        "<p>Adjusted for portion (x{}): {} kcal</p>",
        portion,
        heuristic_calorie_adjust(calories, portion)
    ))
}

fn render_panel(panel: &Panel) -> String {
    match panel {
        Panel::Json { title, result } => {
            let pretty = serde_json::to_string_pretty(&result.to_value())
                .unwrap_or_else(|_| result.to_value().to_string());
            format!(
                "<p><strong>{}</strong></p><pre>{}</pre>",
                encode_text(title),
                encode_text(&pretty)
            )
        }
        Panel::Prose { title, text } => format!(
            "<p><strong>{}</strong></p>{}",
            encode_text(title),
            render_prose(text)
        ),
        Panel::Warning(message) => format!("<div class=\"warning\">{}</div>", encode_text(message)),
        Panel::Error(message) => format!("<div class=\"error\">{}</div>", encode_text(message)),
    }
}

fn render_optional(panel: &Option<Panel>) -> String {
    panel.as_ref().map(render_panel).unwrap_or_default()
}

/// Render the whole page
pub fn render_page(view: &PageView) -> String {
    let portion_line = match &view.analysis {
        Some(Panel::Json { result, .. }) => render_portion(result, view.portion).unwrap_or_default(),
        _ => String::new(),
    };
    let preview = view
        .preview
        .as_ref()
        .map(|uri| {
            format!(
                "<img class=\"preview\" src=\"{}\" alt=\"Uploaded food photo\">",
                encode_double_quoted_attribute(uri)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>AI Health Manager</title><style>{style}</style></head>
<body>
{sidebar}
<main>
<h1>AI-Powered Health Management System</h1>
<p><small>Model: {model}</small></p>
<form id="page" method="post" action="/meal-plan"></form>

<h2>Generate personalized meal plan</h2>
<button form="page" type="submit" formaction="/meal-plan" formenctype="application/x-www-form-urlencoded">Generate meal plan</button>
{meal_plan}

<h2>Analyze food from image</h2>
<label>Upload food photo</label><input form="page" type="file" name="image" accept=".jpg,.jpeg,.png,image/jpeg,image/png">
<label>Notes for the analyst (optional)</label><input form="page" type="text" name="notes">
<label>Portion multiplier</label><input form="page" type="number" name="portion" step="0.1" min="0.1" value="1.0">
<button form="page" type="submit" formaction="/analyze" formenctype="multipart/form-data">Analyze food</button>
{preview}{analysis}{portion_line}

<h2>Ask a health question</h2>
<label>Enter a health-related question (nutrition, exercise, meal ideas)</label>
<textarea form="page" name="question" rows="4">{question}</textarea>
<button form="page" type="submit" formaction="/ask" formenctype="application/x-www-form-urlencoded">Ask AI</button>
{answer}
</main>
</body>
</html>
"#,
        style = STYLE,
        sidebar = render_sidebar(view),
        model = encode_text(&view.model),
        meal_plan = render_optional(&view.meal_plan),
        preview = preview,
        analysis = render_optional(&view.analysis),
        portion_line = portion_line,
        question = encode_text(&view.question),
        answer = render_optional(&view.answer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_json;

    #[test]
    fn test_empty_page_has_all_sections() {
        let html = render_page(&PageView::new("gemini-1.5-flash"));
        assert!(html.contains("Generate meal plan"));
        assert!(html.contains("Analyze food"));
        assert!(html.contains("Ask AI"));
        assert!(html.contains("gemini-1.5-flash"));
        assert!(html.contains("<option value=\"Very active\">Very active</option>"));
        assert!(html.contains("<option value=\"Female\" selected>"));
    }

    #[test]
    fn test_json_panel_is_pretty_and_escaped() {
        let mut view = PageView::new("m");
        view.meal_plan = Some(Panel::Json {
            title: "Meal plan (AI):".to_string(),
            result: extract_json("{\"note\": \"<b>bold</b>\"}"),
        });
        let html = render_page(&view);
        assert!(html.contains("Meal plan (AI):"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("\n  &quot;note&quot;") || html.contains("\n  \"note\""));
    }

    #[test]
    fn test_raw_result_is_shown_under_raw_key() {
        let mut view = PageView::new("m");
        view.analysis = Some(Panel::Json {
            title: "Analysis result:".to_string(),
            result: extract_json("Looks like soup"),
        });
        let html = render_page(&view);
        assert!(html.contains("raw"));
        assert!(html.contains("Looks like soup"));
    }

    #[test]
    fn test_portion_adjusted_calories() {
        let mut view = PageView::new("m");
        view.analysis = Some(Panel::Json {
            title: "Analysis result:".to_string(),
            result: extract_json("{\"estimated_calories\": 600}"),
        });
        view.portion = Some(1.5);
        assert!(render_page(&view).contains("Adjusted for portion (x1.5): 900 kcal"));

        view.portion = Some(1.0);
        assert!(!render_page(&view).contains("Adjusted for portion"));
    }

    #[test]
    fn test_prose_paragraphs() {
        assert_eq!(
            render_prose("First line\nsecond line\n\n<tip>"),
            "<p>First line<br>second line</p><p>&lt;tip&gt;</p>"
        );
    }

    #[test]
    fn test_profile_values_are_echoed_and_escaped() {
        let mut view = PageView::new("m");
        view.profile.preferences = "\"quoted\" & vegan".to_string();
        view.days = 7;
        let html = render_page(&view);
        assert!(html.contains("value=\"&quot;quoted&quot; &amp; vegan\""));
        assert!(html.contains("name=\"days\" min=\"1\" max=\"14\" value=\"7\""));
    }

    #[test]
    fn test_all_inputs_share_one_form() {
        let html = render_page(&PageView::new("m"));
        assert_eq!(html.matches("<form ").count(), 1);
        // 9 profile fields, 3 upload inputs, the question and 3 buttons
        assert_eq!(html.matches("form=\"page\"").count(), 16);
        assert!(html.contains("<textarea form=\"page\" name=\"question\""));
        assert!(html.contains("formaction=\"/analyze\" formenctype=\"multipart/form-data\""));
        assert!(html.contains("formaction=\"/ask\" formenctype=\"application/x-www-form-urlencoded\""));
    }

    #[test]
    fn test_preview_is_rendered_with_analysis() {
        let mut view = PageView::new("m");
        assert!(!render_page(&view).contains("<img"));

        view.preview = Some("data:image/png;base64,AAAA".to_string());
        let html = render_page(&view);
        assert!(html.contains("<img class=\"preview\" src=\"data:image/png;base64,AAAA\""));
    }
}
