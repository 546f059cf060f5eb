pub mod dashboard;
pub mod insights;
pub mod report;
pub mod survey_analysis;
