use serde::{Deserialize, Serialize};

/// Default sentiment used when the service gives no usable score
pub const NEUTRAL_SENTIMENT: f64 = 50.0;

/// Qualitative analysis returned by the AI insight service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub insights: String,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default = "neutral_sentiment")]
    pub sentiment_score: f64,
}

fn neutral_sentiment() -> f64 {
    NEUTRAL_SENTIMENT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub label: String,
    pub description: String,
    pub sentiment: String,
}

impl AiInsights {
    /// Shown when the insight request fails
    pub fn fallback() -> Self {
        Self {
            strengths: "Nepavyko sugeneruoti įžvalgų.".to_string(),
            improvements: "Peržiūrėkite mokinių duomenis rankiniu būdu.".to_string(),
            insights: String::new(),
            themes: Vec::new(),
            sentiment_score: NEUTRAL_SENTIMENT,
        }
    }

    /// Score used for display; zero or non-finite reads as neutral
    pub fn effective_sentiment(&self) -> f64 {
        if self.sentiment_score.is_finite() && self.sentiment_score != 0.0 {
            self.sentiment_score
        } else {
            NEUTRAL_SENTIMENT
        }
    }

    pub fn sentiment_level(&self) -> SentimentLevel {
        SentimentLevel::from_score(self.effective_sentiment())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SentimentLevel {
    VeryPositive,
    Positive,
    Neutral,
    NeedsAttention,
}

impl SentimentLevel {
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            SentimentLevel::VeryPositive
        } else if score > 60.0 {
            SentimentLevel::Positive
        } else if score > 40.0 {
            SentimentLevel::Neutral
        } else {
            SentimentLevel::NeedsAttention
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentLevel::VeryPositive => "Itin pozityvus",
            SentimentLevel::Positive => "Pozityvus",
            SentimentLevel::Neutral => "Neutralus",
            SentimentLevel::NeedsAttention => "Reikalaujantis dėmesio",
        }
    }
}

/// Which list of mentor suggestions a reflection field draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuggestionGroup {
    Observation,
    Analysis,
    BestPractice,
    Emotion,
    Action,
    NextStep,
}

/// Short mentor prompts for each reflection step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionSuggestions {
    #[serde(default)]
    pub observation_suggestions: Vec<String>,
    #[serde(default)]
    pub analysis_suggestions: Vec<String>,
    #[serde(default)]
    pub best_practice_suggestions: Vec<String>,
    #[serde(default)]
    pub emotion_suggestions: Vec<String>,
    #[serde(default)]
    pub action_suggestions: Vec<String>,
    #[serde(default)]
    pub next_step_suggestions: Vec<String>,
}

impl ReflectionSuggestions {
    pub fn for_group(&self, group: SuggestionGroup) -> &[String] {
        match group {
            SuggestionGroup::Observation => &self.observation_suggestions,
            SuggestionGroup::Analysis => &self.analysis_suggestions,
            SuggestionGroup::BestPractice => &self.best_practice_suggestions,
            SuggestionGroup::Emotion => &self.emotion_suggestions,
            SuggestionGroup::Action => &self.action_suggestions,
            SuggestionGroup::NextStep => &self.next_step_suggestions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observation_suggestions.is_empty()
            && self.analysis_suggestions.is_empty()
            && self.best_practice_suggestions.is_empty()
            && self.emotion_suggestions.is_empty()
            && self.action_suggestions.is_empty()
            && self.next_step_suggestions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_levels() {
        assert_eq!(SentimentLevel::from_score(81.0), SentimentLevel::VeryPositive);
        assert_eq!(SentimentLevel::from_score(80.0), SentimentLevel::Positive);
        assert_eq!(SentimentLevel::from_score(50.0), SentimentLevel::Neutral);
        assert_eq!(SentimentLevel::from_score(40.0), SentimentLevel::NeedsAttention);
    }

    #[test]
    fn test_zero_score_reads_as_neutral() {
        let mut insights = AiInsights::fallback();
        insights.sentiment_score = 0.0;
        assert_eq!(insights.effective_sentiment(), NEUTRAL_SENTIMENT);
        assert_eq!(insights.sentiment_level().label(), "Neutralus");
    }

    #[test]
    fn test_partial_payload_fills_defaults() {
        let insights: AiInsights =
            serde_json::from_str(r#"{"strengths":"Aiškūs paaiškinimai"}"#).unwrap();
        assert_eq!(insights.strengths, "Aiškūs paaiškinimai");
        assert!(insights.themes.is_empty());
        assert_eq!(insights.sentiment_score, NEUTRAL_SENTIMENT);
    }

    #[test]
    fn test_suggestions_by_group() {
        let suggestions: ReflectionSuggestions =
            serde_json::from_str(r#"{"actionSuggestions":["Pradėti nuo klausimo"]}"#).unwrap();
        assert_eq!(
            suggestions.for_group(SuggestionGroup::Action),
            ["Pradėti nuo klausimo".to_string()]
        );
        assert!(suggestions.for_group(SuggestionGroup::Emotion).is_empty());
        assert!(!suggestions.is_empty());
    }
}
