// ============================================================
// RESPONSE CLASSIFIER
// ============================================================
// Classify survey columns as Likert questions or free text and aggregate them

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::survey::{QuestionSummary, SurveyAnalysis, SurveyRow, SurveyVocabulary};

use super::header_normalizer::normalize_header;

/// Per-column classifier over a parsed survey.
///
/// A column is a Likert question as soon as any one of its answers maps to
/// the scale; the decision is never made per answer.
pub struct ResponseClassifier<'a> {
    vocabulary: &'a SurveyVocabulary,
}

#[derive(Default)]
struct ColumnTally {
    counts: BTreeMap<String, usize>,
    sum: u64,
    valid_count: usize,
}

impl<'a> ResponseClassifier<'a> {
    pub fn new(vocabulary: &'a SurveyVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Classify using the first row's headers as the column set
    pub fn classify(&self, rows: &[SurveyRow]) -> SurveyAnalysis {
        let headers: Vec<String> = rows
            .first()
            .map(|row| row.headers().map(str::to_string).collect())
            .unwrap_or_default();

        self.classify_columns(rows, &headers)
    }

    pub fn classify_columns(&self, rows: &[SurveyRow], headers: &[String]) -> SurveyAnalysis {
        let mut analysis = SurveyAnalysis {
            row_count: rows.len(),
            ..Default::default()
        };

        if rows.is_empty() {
            return analysis;
        }

        for raw_header in headers {
            if self.vocabulary.is_timestamp_header(raw_header) {
                continue;
            }

            let tally = self.tally_column(rows, raw_header);
            if tally.valid_count > 0 {
                analysis
                    .summaries
                    .push(self.build_summary(raw_header, tally, rows.len()));
            } else {
                self.collect_feedback(rows, raw_header, &mut analysis.feedback);
            }
        }

        debug!(
            rows = analysis.row_count,
            questions = analysis.summaries.len(),
            feedback = analysis.feedback.len(),
            "Classified survey columns"
        );

        analysis
    }

    fn tally_column(&self, rows: &[SurveyRow], raw_header: &str) -> ColumnTally {
        let mut tally = ColumnTally::default();

        for value in column_values(rows, raw_header) {
            *tally.counts.entry(value.to_string()).or_insert(0) += 1;

            if let Some(score) = self.vocabulary.likert_value(value) {
                tally.sum += u64::from(score);
                tally.valid_count += 1;
            }
        }

        tally
    }

    fn build_summary(&self, raw_header: &str, tally: ColumnTally, total: usize) -> QuestionSummary {
        let question = normalize_header(raw_header, &self.vocabulary.header_preamble);
        let category = self.vocabulary.category_for(&question, raw_header);
        let is_reverse = self.vocabulary.is_reverse(&question);

        QuestionSummary {
            average_score: tally.sum as f64 / tally.valid_count as f64,
            counts: tally.counts,
            total,
            category,
            is_reverse,
            question,
        }
    }

    fn collect_feedback(&self, rows: &[SurveyRow], raw_header: &str, feedback: &mut Vec<String>) {
        feedback.extend(
            column_values(rows, raw_header)
                .filter(|value| value.chars().count() > self.vocabulary.min_feedback_chars)
                .filter(|value| !self.vocabulary.is_likert(value))
                .map(str::to_string),
        );
    }
}

/// Non-empty trimmed answers of one column, in row order
fn column_values<'r>(rows: &'r [SurveyRow], header: &'r str) -> impl Iterator<Item = &'r str> {
    rows.iter()
        .filter_map(move |row| row.get(header))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
