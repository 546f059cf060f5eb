// ============================================================
// SURVEY CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing, header cleanup, column classification and export

mod csv_parser;
mod header_normalizer;
mod response_classifier;
mod summary_export;

pub use csv_parser::SurveyCsvParser;
pub use header_normalizer::normalize_header;
pub use response_classifier::ResponseClassifier;
pub use summary_export::export_summaries_csv;
