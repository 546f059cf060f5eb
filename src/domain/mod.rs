pub mod error;
pub mod history;
pub mod insights;
pub mod llm_config;
pub mod reflection;
pub mod survey;
