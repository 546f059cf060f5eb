use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Category;

/// Aggregate for one Likert-scale column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    /// Normalized header label
    pub question: String,

    /// Raw trimmed answer -> occurrences, including answers that did not map
    /// to a Likert value
    pub counts: BTreeMap<String, usize>,

    /// Number of respondent rows
    pub total: usize,

    /// Mean over answers that mapped to a Likert value
    pub average_score: f64,

    pub category: Category,

    /// High score means a worse outcome
    pub is_reverse: bool,
}

/// Colour band used when charting a question's average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Moderate,
    Low,
    /// Reverse question at or below the warning threshold
    Healthy,
    /// Reverse question above the warning threshold
    Concerning,
}

impl ScoreBand {
    pub fn for_average(average: f64, is_reverse: bool) -> Self {
        if is_reverse {
            return if average > 3.5 {
                ScoreBand::Concerning
            } else {
                ScoreBand::Healthy
            };
        }

        if average >= 4.5 {
            ScoreBand::Excellent
        } else if average >= 4.0 {
            ScoreBand::Good
        } else if average >= 3.0 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Low
        }
    }
}

impl QuestionSummary {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::for_average(self.average_score, self.is_reverse)
    }

    /// Number of answers counted, mapped or not
    pub fn answered(&self) -> usize {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::for_average(4.6, false), ScoreBand::Excellent);
        assert_eq!(ScoreBand::for_average(4.0, false), ScoreBand::Good);
        assert_eq!(ScoreBand::for_average(3.2, false), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_average(2.9, false), ScoreBand::Low);
    }

    #[test]
    fn test_reverse_question_band_flips() {
        assert_eq!(ScoreBand::for_average(4.6, true), ScoreBand::Concerning);
        assert_eq!(ScoreBand::for_average(3.5, true), ScoreBand::Healthy);
    }

    #[test]
    fn test_serializes_camel_case() {
        let summary = QuestionSummary {
            question: "Klasė yra tvarkinga".to_string(),
            counts: BTreeMap::from([("Iš dalies".to_string(), 2)]),
            total: 3,
            average_score: 3.0,
            category: Category::Climate,
            is_reverse: false,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["averageScore"], 3.0);
        assert_eq!(json["isReverse"], false);
        assert_eq!(json["category"], "Klimatas");
        assert_eq!(summary.answered(), 2);
    }
}
