// ============================================================
// SURVEY VOCABULARY
// ============================================================
// Likert scale, category taxonomy, reverse questions and header markers

use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertPhrase {
    pub phrase: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub fragment: String,
    pub category: Category,
}

/// Fixed lookup tables used to classify survey columns.
///
/// Loaded once at startup and shared read-only. `taxonomy` is an ordered
/// list: the first fragment found in a header decides its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyVocabulary {
    pub likert_scale: Vec<LikertPhrase>,
    pub taxonomy: Vec<TaxonomyEntry>,
    pub reverse_questions: Vec<String>,

    /// Case-insensitive substring marking the timestamp column
    pub timestamp_marker: String,

    /// Instructional sentence some exports prepend to every question header
    pub header_preamble: String,

    /// Free-text answers must be longer than this many characters
    pub min_feedback_chars: usize,
}

impl Default for SurveyVocabulary {
    fn default() -> Self {
        let likert = |phrase: &str, value: u8| LikertPhrase {
            phrase: phrase.to_string(),
            value,
        };
        let entry = |fragment: &str, category: Category| TaxonomyEntry {
            fragment: fragment.to_string(),
            category,
        };

        Self {
            likert_scale: vec![
                likert("Visiškai sutinku", 5),
                likert("Labiau sutinku", 4),
                likert("Iš dalies", 3),
                likert("Labiau nesutinku", 2),
                likert("Visiškai nesutinku", 1),
                likert("Visiškai nesutinku.", 1),
                likert("Visiškai sutinku.", 5),
            ],
            taxonomy: vec![
                entry("Mokytis yra įdomu", Category::Engagement),
                entry("Mums užduodami įdomūs namų darbai", Category::Engagement),
                entry("Mano mokytojas skiria laiko apibendrinti", Category::Teaching),
                entry(
                    "Mano mokytojas nori, kad aš paaiškinčiau savo atsakymus",
                    Category::Teaching,
                ),
                entry(
                    "Mano mokytojas nori, kad pasidalintume savo mintimis",
                    Category::Climate,
                ),
                entry(
                    "Mano mokytojas klausia klausimus, kad įsitikintų",
                    Category::Teaching,
                ),
                entry("Mokytis mokykloje nėra labai malonu", Category::Climate),
                entry(
                    "Mano mokytojas skatina mus įdėti visas pastangas",
                    Category::Engagement,
                ),
                entry("Namų darbai padeda man mokytis", Category::Engagement),
                entry(
                    "Kai mokytojas žymi mano darbą, jis užrašo",
                    Category::Feedback,
                ),
                entry(
                    "Mano mokytojas pasako mums, ką ir kodėl mes mokomės",
                    Category::Teaching,
                ),
                entry(
                    "Mokiniai išreiškia savo nuomonę ir dalijasi mintimis",
                    Category::Climate,
                ),
                entry(
                    "Mokytojas aiškindamas klausia, ar mes suprantame",
                    Category::Teaching,
                ),
                entry("Mano mokytojas patikrina, kad įsitikintų", Category::Feedback),
                entry(
                    "Mano bendraklasiai elgiasi taip, kaip mokytojas norėtų",
                    Category::Climate,
                ),
                entry(
                    "Mano mokytojas skatina visus sunkiai dirbti",
                    Category::Engagement,
                ),
                entry("Mano mokytojas žino, kai mokiniai supranta", Category::Teaching),
                entry(
                    "Jei kažko nesupranti, mokytojas paaiškina kitu būdu",
                    Category::Teaching,
                ),
                entry("Mūsų klasė būna užimta veiklomis", Category::Climate),
                entry(
                    "Man patinka, kaip mokytojas su manimi elgiasi",
                    Category::Climate,
                ),
                entry("Klasė yra tvarkinga", Category::Climate),
                entry(
                    "Šiose pamokose mes turime gerai pagalvoti",
                    Category::Teaching,
                ),
                entry("Mokiniai per pamokas elgiasi taip blogai", Category::Climate),
                entry(
                    "Mano mokytojas duoda mums laiko paaiškinti",
                    Category::Teaching,
                ),
                entry(
                    "Mano mokytojas suprantamai paaiškina sudėtingus dalykus",
                    Category::Teaching,
                ),
                entry("Jaučiu, kad mano mokytojui aš rūpiu", Category::Climate),
                entry("Aš suprantu, ką turėčiau mokytis", Category::Teaching),
                entry(
                    "Mano mokytojas būna malonus, kai aš užduodu klausimus",
                    Category::Climate,
                ),
            ],
            reverse_questions: vec![
                "Mokytis mokykloje nėra labai malonu".to_string(),
                "Mokiniai per pamokas elgiasi taip blogai".to_string(),
            ],
            timestamp_marker: "laiko žymė".to_string(),
            header_preamble:
                "Prašome atsakyti į klausimus nuoširdžiai, taip, kaip manote ir jaučiatės."
                    .to_string(),
            min_feedback_chars: 5,
        }
    }
}

impl SurveyVocabulary {
    /// Likert value for an answer, also accepting one trailing period
    pub fn likert_value(&self, answer: &str) -> Option<u8> {
        self.exact_likert(answer)
            .or_else(|| answer.strip_suffix('.').and_then(|s| self.exact_likert(s)))
    }

    pub fn is_likert(&self, answer: &str) -> bool {
        self.likert_value(answer).is_some()
    }

    fn exact_likert(&self, answer: &str) -> Option<u8> {
        self.likert_scale
            .iter()
            .find(|entry| entry.phrase == answer)
            .map(|entry| entry.value)
    }

    pub fn is_timestamp_header(&self, raw_header: &str) -> bool {
        raw_header
            .to_lowercase()
            .contains(&self.timestamp_marker.to_lowercase())
    }

    /// First taxonomy entry (in list order) contained in `header`
    pub fn find_category(&self, header: &str) -> Option<Category> {
        let header = header.to_lowercase();
        self.taxonomy
            .iter()
            .find(|entry| header.contains(&entry.fragment.to_lowercase()))
            .map(|entry| entry.category)
    }

    /// Category for a question: normalized label first, raw header second,
    /// `Kita` when neither matches
    pub fn category_for(&self, normalized: &str, raw_header: &str) -> Category {
        self.find_category(normalized)
            .or_else(|| self.find_category(raw_header))
            .unwrap_or(Category::Other)
    }

    pub fn is_reverse(&self, normalized: &str) -> bool {
        let normalized = normalized.to_lowercase();
        self.reverse_questions
            .iter()
            .any(|phrase| normalized.contains(&phrase.to_lowercase()))
    }

    /// Validate vocabulary values
    pub fn validate(&self) -> Result<(), String> {
        if self.likert_scale.is_empty() {
            return Err("likert_scale must not be empty".to_string());
        }
        if let Some(entry) = self
            .likert_scale
            .iter()
            .find(|entry| !(1..=5).contains(&entry.value))
        {
            return Err(format!(
                "likert value for '{}' must be between 1 and 5",
                entry.phrase
            ));
        }
        if self.taxonomy.iter().any(|entry| entry.fragment.trim().is_empty()) {
            return Err("taxonomy fragments must not be empty".to_string());
        }
        if self.timestamp_marker.trim().is_empty() {
            return Err("timestamp_marker must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_likert_with_trailing_period() {
        let vocab = SurveyVocabulary::default();
        assert_eq!(vocab.likert_value("Labiau sutinku"), Some(4));
        assert_eq!(vocab.likert_value("Labiau sutinku."), Some(4));
        assert_eq!(vocab.likert_value("Visiškai sutinku."), Some(5));
        assert_eq!(vocab.likert_value("Labiau sutinku.."), None);
        assert_eq!(vocab.likert_value("labiau sutinku"), None);
    }

    #[test]
    fn test_taxonomy_size_and_order() {
        let vocab = SurveyVocabulary::default();
        assert_eq!(vocab.taxonomy.len(), 28);
        assert_eq!(vocab.taxonomy[0].fragment, "Mokytis yra įdomu");
        assert_eq!(vocab.reverse_questions.len(), 2);
        assert!(vocab.validate().is_ok());
    }

    #[test]
    fn test_category_is_case_insensitive_substring() {
        let vocab = SurveyVocabulary::default();
        assert_eq!(
            vocab.find_category("KLASĖ YRA TVARKINGA ir švari"),
            Some(Category::Climate)
        );
        assert_eq!(vocab.find_category("Visai kitas klausimas"), None);
    }

    #[test]
    fn test_category_falls_back_to_raw_then_other() {
        let vocab = SurveyVocabulary::default();
        assert_eq!(
            vocab.category_for("Trumpas", "Ilgas [Trumpas] Namų darbai padeda man mokytis"),
            Category::Engagement
        );
        assert_eq!(vocab.category_for("Trumpas", "Ilgas"), Category::Other);
    }

    #[test]
    fn test_first_fragment_in_list_order_wins() {
        let mut vocab = SurveyVocabulary::default();
        vocab.taxonomy = vec![
            TaxonomyEntry {
                fragment: "mokytojas".to_string(),
                category: Category::Teaching,
            },
            TaxonomyEntry {
                fragment: "Mano mokytojas".to_string(),
                category: Category::Climate,
            },
        ];
        assert_eq!(
            vocab.find_category("Mano mokytojas yra geras"),
            Some(Category::Teaching)
        );
    }

    #[test]
    fn test_normalized_match_beats_earlier_raw_match() {
        let vocab = SurveyVocabulary::default();
        // raw header carries the first taxonomy fragment, label carries a later one
        let category = vocab.category_for(
            "Klasė yra tvarkinga",
            "Mokytis yra įdomu [Klasė yra tvarkinga]",
        );
        assert_eq!(category, Category::Climate);
    }

    #[test]
    fn test_reverse_and_timestamp_markers() {
        let vocab = SurveyVocabulary::default();
        assert!(vocab.is_reverse("mokytis mokykloje NĖRA labai malonu"));
        assert!(!vocab.is_reverse("Mokytis yra įdomu"));
        assert!(vocab.is_timestamp_header("Laiko žymė"));
        assert!(vocab.is_timestamp_header("LAIKO ŽYMĖ (UTC)"));
        assert!(!vocab.is_timestamp_header("Komentaras"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_value() {
        let mut vocab = SurveyVocabulary::default();
        vocab.likert_scale.push(LikertPhrase {
            phrase: "Nežinau".to_string(),
            value: 0,
        });
        assert!(vocab.validate().is_err());
    }
}
