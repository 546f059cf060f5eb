mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::{build_chart_groups, SurveyAnalysisUseCase};
pub use domain::error::{AppError, Result};
pub use domain::survey::{Category, QuestionSummary, SurveyAnalysis, SurveyRow, SurveyVocabulary};
pub use infrastructure::config::AppConfig;
pub use infrastructure::csv::{normalize_header, ResponseClassifier, SurveyCsvParser};
