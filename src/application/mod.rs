pub mod use_cases;

pub use use_cases::dashboard::{build_chart_groups, CategoryChart, ChartEntry};
pub use use_cases::insights::InsightsUseCase;
pub use use_cases::report::{decode_shared, share_link, ReportUseCase};
pub use use_cases::survey_analysis::SurveyAnalysisUseCase;
