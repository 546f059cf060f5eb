use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::survey::QuestionSummary;

const EXPORT_HEADERS: [&str; 5] = ["question", "category", "averageScore", "total", "isReverse"];

/// Write question summaries as a `;`-delimited CSV table
pub fn export_summaries_csv(summaries: &[QuestionSummary]) -> Result<String> {
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| AppError::Internal(format!("Failed to write CSV header: {}", e)))?;

    for summary in summaries {
        writer
            .write_record([
                summary.question.clone(),
                summary.category.label().to_string(),
                format!("{:.2}", summary.average_score),
                summary.total.to_string(),
                summary.is_reverse.to_string(),
            ])
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("Invalid UTF-8 in CSV: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::Category;
    use std::collections::BTreeMap;

    #[test]
    fn test_export_quotes_delimiters_in_questions() {
        let summaries = vec![QuestionSummary {
            question: "Kai mokytojas žymi mano darbą; jis užrašo".to_string(),
            counts: BTreeMap::new(),
            total: 12,
            average_score: 13.0 / 3.0,
            category: Category::Feedback,
            is_reverse: false,
        }];

        let csv = export_summaries_csv(&summaries).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("question;category;averageScore;total;isReverse")
        );
        assert_eq!(
            lines.next(),
            Some("\"Kai mokytojas žymi mano darbą; jis užrašo\";Grįžtamasis ryšys;4.33;12;false")
        );
    }

    #[test]
    fn test_export_empty_has_header_only() {
        let csv = export_summaries_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
