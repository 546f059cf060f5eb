use serde::{Deserialize, Serialize};

/// Topical bucket a survey question is reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Įsitraukimas")]
    Engagement,
    #[serde(rename = "Mokymas")]
    Teaching,
    #[serde(rename = "Klimatas")]
    Climate,
    #[serde(rename = "Grįžtamasis ryšys")]
    Feedback,
    #[serde(rename = "Kita")]
    Other,
}

impl Category {
    /// Order in which the dashboard lists category groups
    pub const DASHBOARD_ORDER: [Category; 5] = [
        Category::Engagement,
        Category::Teaching,
        Category::Climate,
        Category::Feedback,
        Category::Other,
    ];

    /// Display label in the survey locale
    pub fn label(&self) -> &'static str {
        match self {
            Category::Engagement => "Įsitraukimas",
            Category::Teaching => "Mokymas",
            Category::Climate => "Klimatas",
            Category::Feedback => "Grįžtamasis ryšys",
            Category::Other => "Kita",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
