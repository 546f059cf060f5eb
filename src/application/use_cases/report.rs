// ============================================================
// REPORT
// ============================================================
// Completed reflections: history, share links and CSV export

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::error::{AppError, Result};
use crate::domain::history::{history_label, HistoryEntry};
use crate::domain::reflection::ReflectionData;
use crate::domain::survey::SurveyAnalysis;
use crate::infrastructure::csv::export_summaries_csv;
use crate::infrastructure::storage::HistoryStore;

const SHARE_FRAGMENT: &str = "#data=";

pub struct ReportUseCase {
    history: HistoryStore,
}

impl ReportUseCase {
    pub fn new(history: HistoryStore) -> Self {
        Self { history }
    }

    /// Save the finished reflection at the head of the history list
    pub fn complete(
        &self,
        reflection: &ReflectionData,
        analysis: Option<&SurveyAnalysis>,
    ) -> Result<HistoryEntry> {
        self.complete_at(reflection, analysis, Utc::now())
    }

    fn complete_at(
        &self,
        reflection: &ReflectionData,
        analysis: Option<&SurveyAnalysis>,
        now: DateTime<Utc>,
    ) -> Result<HistoryEntry> {
        let first_question = analysis
            .and_then(|a| a.summaries.first())
            .map(|s| s.question.as_str());

        let entry = HistoryEntry {
            id: now.timestamp_millis(),
            date: now.to_rfc3339(),
            data: reflection.clone(),
            summary: history_label(first_question),
        };

        let entries = self.history.push(entry.clone())?;
        info!(id = entry.id, history = entries.len(), "Reflection saved to history");
        Ok(entry)
    }

    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.history.load()
    }

    pub fn export_csv(&self, analysis: &SurveyAnalysis) -> Result<String> {
        export_summaries_csv(&analysis.summaries)
    }
}

/// `<base>#data=<base64 JSON>` link carrying the whole reflection
pub fn share_link(base_url: &str, reflection: &ReflectionData) -> Result<String> {
    let json = serde_json::to_string(reflection)?;
    Ok(format!(
        "{}{}{}",
        base_url.trim_end_matches('#'),
        SHARE_FRAGMENT,
        STANDARD.encode(json.as_bytes())
    ))
}

/// Restore a reflection from a share link, its fragment, or the bare payload
pub fn decode_shared(encoded: &str) -> Result<ReflectionData> {
    let payload = match encoded.find(SHARE_FRAGMENT) {
        Some(idx) => &encoded[idx + SHARE_FRAGMENT.len()..],
        None => encoded,
    };
    // '+' arrives as ' ' when the payload passed through a query string
    let payload = payload.trim().replace(' ', "+");

    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| AppError::ValidationError(format!("Invalid share data: {}", e)))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| AppError::ValidationError(format!("Invalid share data: {}", e)))?;

    serde_json::from_str(&json)
        .map_err(|e| AppError::ValidationError(format!("Invalid share data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::DEFAULT_HISTORY_LABEL;
    use crate::domain::survey::{Category, QuestionSummary};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn use_case() -> (ReportUseCase, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("refleksija-report-{}", uuid::Uuid::new_v4()));
        (ReportUseCase::new(HistoryStore::new(&dir)), dir)
    }

    fn reflection() -> ReflectionData {
        ReflectionData {
            observations: "Mokiniai drąsiau klausia".to_string(),
            heart_feelings: "Džiaugsmas".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_records_entry() {
        let (use_case, dir) = use_case();
        let analysis = SurveyAnalysis {
            summaries: vec![QuestionSummary {
                question: "Mano mokytojas skiria laiko apibendrinti pamoką".to_string(),
                counts: BTreeMap::new(),
                total: 4,
                average_score: 4.0,
                category: Category::Teaching,
                is_reverse: false,
            }],
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2026, 6, 20, 9, 30, 0).unwrap();

        let entry = use_case
            .complete_at(&reflection(), Some(&analysis), now)
            .unwrap();
        let history = use_case.history().unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(entry.id, now.timestamp_millis());
        assert_eq!(entry.date, "2026-06-20T09:30:00+00:00");
        assert_eq!(entry.summary, "Mano mokytojas skiria laiko ap...");
        assert_eq!(history, vec![entry]);
    }

    #[test]
    fn test_complete_without_survey_uses_default_label() {
        let (use_case, dir) = use_case();
        let entry = use_case.complete(&reflection(), None).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(entry.summary, DEFAULT_HISTORY_LABEL);
    }

    #[test]
    fn test_share_link_round_trip() {
        let link = share_link("https://refleksija.lt/", &reflection()).unwrap();
        assert!(link.starts_with("https://refleksija.lt/#data="));

        assert_eq!(decode_shared(&link).unwrap(), reflection());

        let fragment = &link[link.find('#').unwrap()..];
        assert_eq!(decode_shared(fragment).unwrap(), reflection());
    }

    #[test]
    fn test_decode_query_mangled_payload() {
        let link = share_link("", &reflection()).unwrap();
        let payload = link.trim_start_matches(SHARE_FRAGMENT).replace('+', " ");
        assert_eq!(decode_shared(&payload).unwrap(), reflection());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_shared("#data=!!!"),
            Err(AppError::ValidationError(_))
        ));
        let not_json = STANDARD.encode("labas");
        assert!(matches!(
            decode_shared(&not_json),
            Err(AppError::ValidationError(_))
        ));
    }
}
