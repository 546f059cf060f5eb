use serde::{Deserialize, Serialize};

use super::insights::SuggestionGroup;

/// Feelings offered as quick picks on the heart/head step
pub const EMOTION_PRESETS: [&str; 9] = [
    "Džiaugsmas",
    "Liūdesys",
    "Skausmas",
    "Apmąstymai",
    "Nuobodulys",
    "Įkvėpimas",
    "Nerimas",
    "Pasididžiavimas",
    "Nuovargis",
];

/// Observation topics offered as quick picks on the first step
pub const OBSERVATION_PRESETS: [&str; 5] = [
    "Klasės dinamika",
    "Aktyvumas pamokoje",
    "Motyvacija",
    "Dalyko supratimas",
    "Socialiniai įgūdžiai",
];

/// Text longer than this in any field counts as unsaved work
pub const UNSAVED_CONTENT_CHARS: usize = 10;

/// Written end-of-year self-reflection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReflectionData {
    pub observations: String,
    pub strengths: String,
    pub improvements: String,
    pub surprises: String,
    pub best_practices: String,
    pub heart_feelings: String,
    pub head_thoughts: String,
    pub action_stop: String,
    pub action_start: String,
    pub action_continue: String,
    pub next_steps: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReflectionField {
    Observations,
    Strengths,
    Improvements,
    Surprises,
    BestPractices,
    HeartFeelings,
    HeadThoughts,
    ActionStop,
    ActionStart,
    ActionContinue,
    NextSteps,
}

impl ReflectionField {
    pub const ALL: [ReflectionField; 11] = [
        ReflectionField::Observations,
        ReflectionField::Strengths,
        ReflectionField::Improvements,
        ReflectionField::Surprises,
        ReflectionField::BestPractices,
        ReflectionField::HeartFeelings,
        ReflectionField::HeadThoughts,
        ReflectionField::ActionStop,
        ReflectionField::ActionStart,
        ReflectionField::ActionContinue,
        ReflectionField::NextSteps,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReflectionField::Observations => "Objektyvūs pastebėjimai",
            ReflectionField::Strengths => "Kuo mokiniai džiaugiasi?",
            ReflectionField::Improvements => "Ką vaikai norėtų keisti?",
            ReflectionField::Surprises => "Kas nustebino?",
            ReflectionField::BestPractices => "Gerąsios praktikos",
            ReflectionField::HeartFeelings => "Kaip reaguoja ŠIRDIS?",
            ReflectionField::HeadThoughts => "Ką sako GALVA?",
            ReflectionField::ActionStop => "Ką nustosi daryti?",
            ReflectionField::ActionStart => "Ką pradėsi daryti?",
            ReflectionField::ActionContinue => "Ką tęsi?",
            ReflectionField::NextSteps => "Kaip matuosi sėkmę?",
        }
    }

    pub fn suggestion_group(&self) -> SuggestionGroup {
        match self {
            ReflectionField::Observations => SuggestionGroup::Observation,
            ReflectionField::Strengths
            | ReflectionField::Improvements
            | ReflectionField::Surprises => SuggestionGroup::Analysis,
            ReflectionField::BestPractices => SuggestionGroup::BestPractice,
            ReflectionField::HeartFeelings | ReflectionField::HeadThoughts => {
                SuggestionGroup::Emotion
            }
            ReflectionField::ActionStop
            | ReflectionField::ActionStart
            | ReflectionField::ActionContinue => SuggestionGroup::Action,
            ReflectionField::NextSteps => SuggestionGroup::NextStep,
        }
    }
}

/// One page of the guided reflection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReflectionStep {
    pub title: &'static str,
    pub fields: &'static [ReflectionField],
}

pub static REFLECTION_STEPS: [ReflectionStep; 5] = [
    ReflectionStep {
        title: "1. Pastebėjimai",
        fields: &[ReflectionField::Observations],
    },
    ReflectionStep {
        title: "2. Analizė",
        fields: &[
            ReflectionField::Strengths,
            ReflectionField::Improvements,
            ReflectionField::Surprises,
        ],
    },
    ReflectionStep {
        title: "3. Geroji patirtis",
        fields: &[ReflectionField::BestPractices],
    },
    ReflectionStep {
        title: "4. Galva ir Širdis",
        fields: &[ReflectionField::HeartFeelings, ReflectionField::HeadThoughts],
    },
    ReflectionStep {
        title: "5. Veiksmų planas",
        fields: &[
            ReflectionField::ActionStop,
            ReflectionField::ActionStart,
            ReflectionField::ActionContinue,
            ReflectionField::NextSteps,
        ],
    },
];

impl ReflectionData {
    pub fn get(&self, field: ReflectionField) -> &str {
        match field {
            ReflectionField::Observations => &self.observations,
            ReflectionField::Strengths => &self.strengths,
            ReflectionField::Improvements => &self.improvements,
            ReflectionField::Surprises => &self.surprises,
            ReflectionField::BestPractices => &self.best_practices,
            ReflectionField::HeartFeelings => &self.heart_feelings,
            ReflectionField::HeadThoughts => &self.head_thoughts,
            ReflectionField::ActionStop => &self.action_stop,
            ReflectionField::ActionStart => &self.action_start,
            ReflectionField::ActionContinue => &self.action_continue,
            ReflectionField::NextSteps => &self.next_steps,
        }
    }

    pub fn get_mut(&mut self, field: ReflectionField) -> &mut String {
        match field {
            ReflectionField::Observations => &mut self.observations,
            ReflectionField::Strengths => &mut self.strengths,
            ReflectionField::Improvements => &mut self.improvements,
            ReflectionField::Surprises => &mut self.surprises,
            ReflectionField::BestPractices => &mut self.best_practices,
            ReflectionField::HeartFeelings => &mut self.heart_feelings,
            ReflectionField::HeadThoughts => &mut self.head_thoughts,
            ReflectionField::ActionStop => &mut self.action_stop,
            ReflectionField::ActionStart => &mut self.action_start,
            ReflectionField::ActionContinue => &mut self.action_continue,
            ReflectionField::NextSteps => &mut self.next_steps,
        }
    }

    /// Add a mentor suggestion as a new bullet line
    pub fn insert_suggestion(&mut self, field: ReflectionField, suggestion: &str) {
        let current = self.get(field).trim();
        let updated = if current.is_empty() {
            format!("• {}", suggestion)
        } else {
            format!("{}\n• {}", current, suggestion)
        };
        *self.get_mut(field) = updated;
    }

    /// Add dictated text on a new line
    pub fn append_transcription(&mut self, field: ReflectionField, text: &str) {
        let text = text.trim();
        let current = self.get(field).trim();
        let updated = if current.is_empty() {
            text.to_string()
        } else {
            format!("{}\n{}", current, text)
        };
        *self.get_mut(field) = updated;
    }

    /// A step can be left once every one of its fields has text
    pub fn is_step_complete(&self, step: &ReflectionStep) -> bool {
        step.fields
            .iter()
            .all(|field| !self.get(*field).trim().is_empty())
    }

    pub fn missing_fields(&self, step: &ReflectionStep) -> Vec<ReflectionField> {
        step.fields
            .iter()
            .copied()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    pub fn has_unsaved_content(&self) -> bool {
        self.has_content_longer_than(UNSAVED_CONTENT_CHARS)
    }

    /// Whether leaving now would discard meaningful text
    pub fn has_content_longer_than(&self, chars: usize) -> bool {
        ReflectionField::ALL
            .iter()
            .any(|field| self.get(*field).trim().chars().count() > chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_suggestion_bullets() {
        let mut data = ReflectionData::default();
        data.insert_suggestion(ReflectionField::ActionStart, "Daugiau darbo grupėse");
        assert_eq!(data.action_start, "• Daugiau darbo grupėse");

        data.insert_suggestion(ReflectionField::ActionStart, "Trumpesni namų darbai");
        assert_eq!(
            data.action_start,
            "• Daugiau darbo grupėse\n• Trumpesni namų darbai"
        );
    }

    #[test]
    fn test_append_transcription_trims_existing() {
        let mut data = ReflectionData {
            observations: "Mokiniai aktyvūs  \n".to_string(),
            ..Default::default()
        };
        data.append_transcription(ReflectionField::Observations, " ir smalsūs ");
        assert_eq!(data.observations, "Mokiniai aktyvūs\nir smalsūs");
    }

    #[test]
    fn test_step_completion() {
        let mut data = ReflectionData::default();
        let analysis = &REFLECTION_STEPS[1];
        data.strengths = "Patinka eksperimentai".to_string();
        data.improvements = "   ".to_string();

        assert!(!data.is_step_complete(analysis));
        assert_eq!(
            data.missing_fields(analysis),
            vec![ReflectionField::Improvements, ReflectionField::Surprises]
        );

        data.improvements = "Tempas".to_string();
        data.surprises = "Tyli klasė".to_string();
        assert!(data.is_step_complete(analysis));
    }

    #[test]
    fn test_every_field_belongs_to_exactly_one_step() {
        for field in ReflectionField::ALL {
            let owners = REFLECTION_STEPS
                .iter()
                .filter(|step| step.fields.contains(&field))
                .count();
            assert_eq!(owners, 1, "{:?}", field);
        }
    }

    #[test]
    fn test_unsaved_content_threshold() {
        let mut data = ReflectionData::default();
        data.next_steps = "Apklausa".to_string();
        assert!(data.has_content_longer_than(5));
        assert!(!data.has_content_longer_than(10));
    }

    #[test]
    fn test_json_uses_camel_case_and_defaults() {
        let data: ReflectionData =
            serde_json::from_str(r#"{"bestPractices":"Grįžtamasis ryšys"}"#).unwrap();
        assert_eq!(data.best_practices, "Grįžtamasis ryšys");
        assert!(data.action_stop.is_empty());

        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("heartFeelings").is_some());
    }
}
