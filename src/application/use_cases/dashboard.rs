use serde::Serialize;

use crate::domain::survey::{Category, QuestionSummary, ScoreBand};

/// One bar on a category chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    pub question: String,
    /// Average rounded to two decimals
    pub average: f64,
    pub is_reverse: bool,
    pub band: ScoreBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChart {
    pub category: Category,
    pub entries: Vec<ChartEntry>,
}

/// Group summaries per category in dashboard order, best average first.
/// Categories without questions are left out.
pub fn build_chart_groups(summaries: &[QuestionSummary]) -> Vec<CategoryChart> {
    Category::DASHBOARD_ORDER
        .iter()
        .filter_map(|category| {
            let mut entries: Vec<ChartEntry> = summaries
                .iter()
                .filter(|summary| summary.category == *category)
                .map(|summary| {
                    let average = round_2(summary.average_score);
                    ChartEntry {
                        question: summary.question.clone(),
                        average,
                        is_reverse: summary.is_reverse,
                        band: ScoreBand::for_average(average, summary.is_reverse),
                    }
                })
                .collect();

            if entries.is_empty() {
                return None;
            }

            entries.sort_by(|a, b| b.average.total_cmp(&a.average));
            Some(CategoryChart {
                category: *category,
                entries,
            })
        })
        .collect()
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn summary(question: &str, average: f64, category: Category, is_reverse: bool) -> QuestionSummary {
        QuestionSummary {
            question: question.to_string(),
            counts: BTreeMap::new(),
            total: 10,
            average_score: average,
            category,
            is_reverse,
        }
    }

    #[test]
    fn test_groups_follow_dashboard_order() {
        let summaries = vec![
            summary("Kita 1", 3.0, Category::Other, false),
            summary("Klimatas 1", 4.0, Category::Climate, false),
            summary("Įsitraukimas 1", 2.0, Category::Engagement, false),
        ];

        let groups = build_chart_groups(&summaries);
        let order: Vec<Category> = groups.iter().map(|g| g.category).collect();

        assert_eq!(
            order,
            vec![Category::Engagement, Category::Climate, Category::Other]
        );
    }

    #[test]
    fn test_entries_sorted_descending_and_rounded() {
        let summaries = vec![
            summary("A", 3.333333, Category::Teaching, false),
            summary("B", 4.666666, Category::Teaching, false),
            summary("C", 3.333333, Category::Teaching, false),
        ];

        let groups = build_chart_groups(&summaries);
        let entries = &groups[0].entries;

        assert_eq!(entries[0].question, "B");
        assert_eq!(entries[0].average, 4.67);
        assert_eq!(entries[0].band, ScoreBand::Excellent);
        // ties keep input order
        assert_eq!(entries[1].question, "A");
        assert_eq!(entries[2].question, "C");
        assert_eq!(entries[2].band, ScoreBand::Moderate);
    }

    #[test]
    fn test_reverse_band() {
        let groups = build_chart_groups(&[
            summary("R1", 3.6, Category::Climate, true),
            summary("R2", 2.0, Category::Climate, true),
        ]);
        assert_eq!(groups[0].entries[0].band, ScoreBand::Concerning);
        assert_eq!(groups[0].entries[1].band, ScoreBand::Healthy);
    }

    #[test]
    fn test_no_summaries_no_groups() {
        assert!(build_chart_groups(&[]).is_empty());
    }
}
