// ============================================================
// SURVEY DOMAIN LAYER
// ============================================================
// Core types and fixed vocabulary for student survey analysis
// No I/O, no async

mod category;
mod question_summary;
mod survey_row;
mod vocabulary;

pub use category::Category;
pub use question_summary::{QuestionSummary, ScoreBand};
pub use survey_row::SurveyRow;
pub use vocabulary::{LikertPhrase, SurveyVocabulary, TaxonomyEntry};

use serde::{Deserialize, Serialize};

/// Result of analysing one uploaded survey file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnalysis {
    /// One entry per Likert column, in header order
    pub summaries: Vec<QuestionSummary>,

    /// Free-text answers from non-Likert columns, in column then row order
    pub feedback: Vec<String>,

    /// Number of respondent rows that survived parsing
    pub row_count: usize,
}

impl SurveyAnalysis {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Respondent count as shown on the dashboard header
    pub fn respondent_count(&self) -> usize {
        self.summaries.first().map(|s| s.total).unwrap_or(0)
    }
}
