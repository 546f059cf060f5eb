use crate::application::{build_chart_groups, decode_shared, share_link, CategoryChart};
use crate::domain::error::AppError;
use crate::domain::history::HistoryEntry;
use crate::domain::insights::{AiInsights, SentimentLevel};
use crate::domain::reflection::{
    ReflectionData, ReflectionField, EMOTION_PRESETS, OBSERVATION_PRESETS, REFLECTION_STEPS,
};
use crate::domain::survey::SurveyAnalysis;
use crate::interfaces::state::AppState;
use actix_cors::Cors;
use actix_web::{
    dev::Server, get, http::StatusCode, post, put, web, App, HttpResponse, HttpServer, Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use validator::Validate;

const MAX_LOG_ENTRIES: usize = 100;

/// Survey uploads are raw CSV bodies
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub app_state: Arc<AppState>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub session_id: String,
    pub analysis: SurveyAnalysis,
    pub charts: Vec<CategoryChart>,
    pub respondent_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub session_id: String,
    pub analysis: SurveyAnalysis,
    pub charts: Vec<CategoryChart>,
    pub respondent_count: usize,
    pub insights: Option<AiInsights>,
    pub sentiment: Option<SentimentView>,
    pub is_analyzing: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentView {
    pub score: f64,
    pub level: SentimentLevel,
    pub label: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionResponse {
    pub reflection: ReflectionData,
    pub has_unsaved_content: bool,
    pub emotion_presets: &'static [&'static str],
    pub observation_presets: &'static [&'static str],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStatus {
    pub step: usize,
    pub title: &'static str,
    pub fields: &'static [ReflectionField],
    pub complete: bool,
    pub missing_fields: Vec<ReflectionField>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    #[validate(length(min = 1))]
    pub audio: String,
    #[validate(length(min = 1))]
    pub mime_type: String,
    pub field: ReflectionField,
}

#[derive(Serialize)]
pub struct TranscribeResponse {
    pub text: String,
    pub reflection: ReflectionData,
}

#[derive(Deserialize, Validate)]
pub struct SuggestionRequest {
    pub field: ReflectionField,
    #[validate(length(min = 1))]
    pub suggestion: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    /// Page URL the share link should point at
    #[serde(default)]
    pub base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    pub entry: HistoryEntry,
    pub share_link: String,
}

#[derive(Deserialize)]
pub struct SharedQuery {
    pub data: String,
}

fn status_for(error: &AppError) -> StatusCode {
    match error {
        AppError::ValidationError(_) | AppError::ParseError(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::LLMError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(logs: &Mutex<Vec<LogEntry>>, context: &str, error: AppError) -> HttpResponse {
    let status = status_for(&error);
    let level = if status.is_server_error() {
        "ERROR"
    } else {
        "WARN"
    };
    add_log(logs, level, "HttpApi", &format!("{}: {}", context, error));
    HttpResponse::build(status).body(error.to_string())
}

fn validation_error(errors: validator::ValidationErrors) -> AppError {
    AppError::ValidationError(errors.to_string())
}

#[post("/survey/upload")]
async fn upload_survey(data: web::Data<HttpState>, body: web::Bytes) -> impl Responder {
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Survey upload ({} bytes)", body.len()),
    );

    let analysis = data.app_state.survey_use_case.analyze_bytes(&body);
    if analysis.row_count == 0 {
        return error_response(
            &data.logs,
            "Survey upload rejected",
            AppError::ValidationError("The file has no respondent rows".to_string()),
        );
    }

    let session = match data.app_state.start_session(analysis) {
        Ok(session) => session,
        Err(e) => return error_response(&data.logs, "Failed to start session", e),
    };

    if session.is_analyzing {
        let app_state = data.app_state.clone();
        let logs = data.logs.clone();
        let session_id = session.id.clone();
        tokio::spawn(async move {
            match app_state.refresh_insights(&session_id).await {
                Ok(true) => add_log(&logs, "INFO", "Insights", "Survey insights ready"),
                Ok(false) => add_log(&logs, "INFO", "Insights", "Insights discarded"),
                Err(e) => add_log(
                    &logs,
                    "ERROR",
                    "Insights",
                    &format!("Insight task failed: {}", e),
                ),
            }
        });
    }

    HttpResponse::Ok().json(UploadResponse {
        charts: build_chart_groups(&session.analysis.summaries),
        respondent_count: session.analysis.respondent_count(),
        session_id: session.id,
        analysis: session.analysis,
    })
}

#[get("/survey/analysis")]
async fn get_analysis(data: web::Data<HttpState>) -> impl Responder {
    match data.app_state.current_session() {
        Ok(session) => HttpResponse::Ok().json(AnalysisResponse {
            charts: build_chart_groups(&session.analysis.summaries),
            respondent_count: session.analysis.respondent_count(),
            sentiment: session.insights.as_ref().map(|insights| SentimentView {
                score: insights.effective_sentiment(),
                level: insights.sentiment_level(),
                label: insights.sentiment_level().label(),
            }),
            session_id: session.id,
            analysis: session.analysis,
            insights: session.insights,
            is_analyzing: session.is_analyzing,
        }),
        Err(e) => error_response(&data.logs, "Analysis unavailable", e),
    }
}

#[get("/reflection")]
async fn get_reflection(data: web::Data<HttpState>) -> impl Responder {
    match data.app_state.with_session(|s| s.reflection.clone()) {
        Ok(reflection) => HttpResponse::Ok().json(reflection_response(reflection)),
        Err(e) => error_response(&data.logs, "Reflection unavailable", e),
    }
}

#[put("/reflection")]
async fn update_reflection(
    data: web::Data<HttpState>,
    req: web::Json<ReflectionData>,
) -> impl Responder {
    let reflection = req.into_inner();
    match data
        .app_state
        .with_session(|s| s.reflection = reflection.clone())
    {
        Ok(()) => HttpResponse::Ok().json(reflection_response(reflection)),
        Err(e) => error_response(&data.logs, "Failed to update reflection", e),
    }
}

#[post("/reflection/suggestion")]
async fn insert_suggestion(
    data: web::Data<HttpState>,
    req: web::Json<SuggestionRequest>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return error_response(&data.logs, "Invalid suggestion", validation_error(e));
    }

    match data.app_state.with_session(|s| {
        s.reflection.insert_suggestion(req.field, &req.suggestion);
        s.reflection.clone()
    }) {
        Ok(reflection) => HttpResponse::Ok().json(reflection_response(reflection)),
        Err(e) => error_response(&data.logs, "Failed to insert suggestion", e),
    }
}

#[post("/reflection/suggestions")]
async fn reflection_suggestions(data: web::Data<HttpState>) -> impl Responder {
    add_log(&data.logs, "INFO", "HttpApi", "Requesting reflection suggestions");

    let (reflection, insights) = match data
        .app_state
        .with_session(|s| (s.reflection.clone(), s.insights.clone()))
    {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(&data.logs, "Suggestions unavailable", e),
    };

    let suggestions = data
        .app_state
        .insights_use_case
        .generate_suggestions(&data.app_state.config.llm, &reflection, insights.as_ref())
        .await;

    HttpResponse::Ok().json(suggestions)
}

#[post("/reflection/transcribe")]
async fn transcribe(
    data: web::Data<HttpState>,
    req: web::Json<TranscribeRequest>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return error_response(&data.logs, "Invalid transcription request", validation_error(e));
    }

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Transcribing audio for {:?} ({})", req.field, req.mime_type),
    );

    let text = match data
        .app_state
        .insights_use_case
        .transcribe(&data.app_state.config.llm, &req.audio, &req.mime_type)
        .await
    {
        Ok(text) => text,
        Err(e) => return error_response(&data.logs, "Transcription failed", e),
    };

    match data.app_state.with_session(|s| {
        s.reflection.append_transcription(req.field, &text);
        s.reflection.clone()
    }) {
        Ok(reflection) => HttpResponse::Ok().json(TranscribeResponse { text, reflection }),
        Err(e) => error_response(&data.logs, "Failed to store transcription", e),
    }
}

#[get("/reflection/steps/{step}")]
async fn step_status(data: web::Data<HttpState>, path: web::Path<usize>) -> impl Responder {
    let step_number = path.into_inner();
    let Some(step) = step_number
        .checked_sub(1)
        .and_then(|idx| REFLECTION_STEPS.get(idx))
    else {
        return error_response(
            &data.logs,
            "Unknown reflection step",
            AppError::ValidationError(format!(
                "Step must be between 1 and {}",
                REFLECTION_STEPS.len()
            )),
        );
    };

    match data.app_state.with_session(|s| StepStatus {
        step: step_number,
        title: step.title,
        fields: step.fields,
        complete: s.reflection.is_step_complete(step),
        missing_fields: s.reflection.missing_fields(step),
    }) {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(e) => error_response(&data.logs, "Reflection unavailable", e),
    }
}

#[post("/reflection/complete")]
async fn complete_reflection(
    data: web::Data<HttpState>,
    req: Option<web::Json<CompleteRequest>>,
) -> impl Responder {
    let base_url = req.map(|r| r.into_inner().base_url).unwrap_or_default();

    let session = match data.app_state.current_session() {
        Ok(session) => session,
        Err(e) => return error_response(&data.logs, "Nothing to complete", e),
    };

    let result = data
        .app_state
        .report_use_case
        .complete(&session.reflection, Some(&session.analysis))
        .and_then(|entry| {
            let share_link = share_link(&base_url, &entry.data)?;
            Ok(CompleteResponse { entry, share_link })
        });

    match result {
        Ok(response) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Reflection saved ({})", response.entry.summary),
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => error_response(&data.logs, "Failed to complete reflection", e),
    }
}

#[get("/history")]
async fn get_history(data: web::Data<HttpState>) -> impl Responder {
    match data.app_state.report_use_case.history() {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => error_response(&data.logs, "Failed to read history", e),
    }
}

#[get("/report/shared")]
async fn shared_report(
    data: web::Data<HttpState>,
    query: web::Query<SharedQuery>,
) -> impl Responder {
    match decode_shared(&query.data) {
        Ok(reflection) => HttpResponse::Ok().json(reflection),
        Err(e) => error_response(&data.logs, "Invalid shared report", e),
    }
}

#[get("/report/export")]
async fn export_report(data: web::Data<HttpState>) -> impl Responder {
    let result = data.app_state.current_session().and_then(|session| {
        data.app_state
            .report_use_case
            .export_csv(&session.analysis)
    });

    match result {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"apklausos_santrauka.csv\"",
            ))
            .body(csv),
        Err(e) => error_response(&data.logs, "Export failed", e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    match data.logs.lock() {
        Ok(logs) => HttpResponse::Ok().json(&*logs),
        Err(_) => HttpResponse::InternalServerError().body("Log buffer unavailable"),
    }
}

fn reflection_response(reflection: ReflectionData) -> ReflectionResponse {
    ReflectionResponse {
        has_unsaved_content: reflection.has_unsaved_content(),
        reflection,
        emotion_presets: &EMOTION_PRESETS,
        observation_presets: &OBSERVATION_PRESETS,
    }
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    if let Ok(mut logs) = logs.lock() {
        logs.push(entry.clone());
        if logs.len() > MAX_LOG_ENTRIES {
            logs.remove(0);
        }
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Mount every route under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .service(upload_survey)
            .service(get_analysis)
            .service(get_reflection)
            .service(update_reflection)
            .service(insert_suggestion)
            .service(reflection_suggestions)
            .service(transcribe)
            .service(step_status)
            .service(complete_reflection)
            .service(get_history)
            .service(shared_report)
            .service(export_report)
            .service(get_logs),
    );
}

pub fn start_server(
    app_state: Arc<AppState>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
) -> std::io::Result<Server> {
    let bind_address = app_state.config.bind_address();
    let state = web::Data::new(HttpState { app_state, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind_address)?
    .run();

    Ok(server)
}
