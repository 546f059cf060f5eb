use serde::{Deserialize, Serialize};

use super::reflection::ReflectionData;

/// Most recent completed reflections kept on disk
pub const MAX_HISTORY_ENTRIES: usize = 20;

pub const DEFAULT_HISTORY_LABEL: &str = "Mokslo metų vertinimas";

const LABEL_PREFIX_CHARS: usize = 30;

/// A completed reflection as listed in the history panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Milliseconds since the Unix epoch at completion time
    pub id: i64,
    /// RFC 3339 completion timestamp
    pub date: String,
    pub data: ReflectionData,
    pub summary: String,
}

/// Short label: start of the first survey question, or a generic title
pub fn history_label(first_question: Option<&str>) -> String {
    match first_question {
        Some(question) => {
            let prefix: String = question.chars().take(LABEL_PREFIX_CHARS).collect();
            format!("{}...", prefix)
        }
        None => DEFAULT_HISTORY_LABEL.to_string(),
    }
}
