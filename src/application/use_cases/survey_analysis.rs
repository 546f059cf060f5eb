use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::error::Result;
use crate::domain::survey::{SurveyAnalysis, SurveyVocabulary};
use crate::infrastructure::csv::{ResponseClassifier, SurveyCsvParser};

/// Parse an uploaded survey export and aggregate its columns
pub struct SurveyAnalysisUseCase {
    parser: SurveyCsvParser,
    vocabulary: Arc<SurveyVocabulary>,
}

impl SurveyAnalysisUseCase {
    pub fn new(vocabulary: Arc<SurveyVocabulary>) -> Self {
        Self {
            parser: SurveyCsvParser::new(),
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &SurveyVocabulary {
        &self.vocabulary
    }

    pub fn analyze_content(&self, content: &str) -> SurveyAnalysis {
        let rows = self.parser.parse_content(content);
        let analysis = ResponseClassifier::new(&self.vocabulary).classify(&rows);

        info!(
            rows = analysis.row_count,
            questions = analysis.summaries.len(),
            feedback = analysis.feedback.len(),
            "Survey analysed"
        );
        analysis
    }

    /// Raw upload body; legacy encodings are decoded first
    pub fn analyze_bytes(&self, bytes: &[u8]) -> SurveyAnalysis {
        self.analyze_content(&SurveyCsvParser::decode_bytes(bytes))
    }

    pub fn analyze_file(&self, path: &Path) -> Result<SurveyAnalysis> {
        let rows = self.parser.parse_file(path)?;
        Ok(ResponseClassifier::new(&self.vocabulary).classify(&rows))
    }
}
