use serde::{Deserialize, Serialize};
use std::fmt;

/// ========================================
/// Blueprint records and grounding citations
/// ========================================

/// Difficulty as stated by the model. Values outside the three known levels
/// are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Other(String),
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Beginner" => Difficulty::Beginner,
            "Intermediate" => Difficulty::Intermediate,
            "Advanced" => Difficulty::Advanced,
            _ => Difficulty::Other(s),
        }
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        d.as_str().to_string()
    }
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Other(s) => s,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a dataset lives. Unknown provider names pass through in `Unlisted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DatasetSource {
    HuggingFace,
    Kaggle,
    Other,
    Unlisted(String),
}

impl From<String> for DatasetSource {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Hugging Face" => DatasetSource::HuggingFace,
            "Kaggle" => DatasetSource::Kaggle,
            "Other" => DatasetSource::Other,
            _ => DatasetSource::Unlisted(s),
        }
    }
}

impl From<DatasetSource> for String {
    fn from(s: DatasetSource) -> Self {
        s.as_str().to_string()
    }
}

impl DatasetSource {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetSource::HuggingFace => "Hugging Face",
            DatasetSource::Kaggle => "Kaggle",
            DatasetSource::Other => "Other",
            DatasetSource::Unlisted(s) => s,
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    /// Empty when the model did not know a concrete link.
    pub url: String,
    pub source: DatasetSource,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRef {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRef {
    pub model_id: String,
    pub task: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBlueprint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub domain: String,
    pub paper: PaperRef,
    pub hugging_face_model: ModelRef,
    pub datasets: Vec<Dataset>,
    pub implementation_steps: Vec<String>,
    pub tech_stack: Vec<String>,
    pub python_snippet: String,
}

impl ProjectBlueprint {
    pub fn hub_url(&self) -> String {
        format!("https://huggingface.co/{}", self.hugging_face_model.model_id)
    }

    pub fn paper_search_url(&self) -> String {
        format!(
            "https://scholar.google.com/scholar?q={}",
            urlencoding::encode(&self.paper.title)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

/// A citation surfaced by the search-grounding tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// Raw reply of one generation call, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGeneration {
    pub text: String,
    pub grounding: Vec<GroundingChunk>,
}

/// One normalized batch, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    pub projects: Vec<ProjectBlueprint>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_difficulty_passes_through() {
        let d: Difficulty = serde_json::from_str("\"Expert\"").unwrap();
        assert_eq!(d, Difficulty::Other("Expert".into()));
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"Expert\"");
        let d: Difficulty = serde_json::from_str("\"Advanced\"").unwrap();
        assert_eq!(d, Difficulty::Advanced);
    }

    #[test]
    fn dataset_source_keeps_provider_name() {
        let s: DatasetSource = serde_json::from_str("\"Papers With Code\"").unwrap();
        assert_eq!(s.to_string(), "Papers With Code");
        let s: DatasetSource = serde_json::from_str("\"Hugging Face\"").unwrap();
        assert_eq!(s, DatasetSource::HuggingFace);
    }

    #[test]
    fn blueprint_uses_camel_case_keys() {
        let bp = ProjectBlueprint {
            id: "proj_1_0".into(),
            title: "t".into(),
            description: "d".into(),
            difficulty: Difficulty::Beginner,
            domain: "NLP".into(),
            paper: PaperRef { title: "Attention Is All You Need".into(), url: None, authors: None },
            hugging_face_model: ModelRef { model_id: "bert-base-uncased".into(), task: "fill-mask".into() },
            datasets: vec![],
            implementation_steps: vec![],
            tech_stack: vec![],
            python_snippet: "print()".into(),
        };
        let v = serde_json::to_value(&bp).unwrap();
        assert_eq!(v["huggingFaceModel"]["modelId"], "bert-base-uncased");
        assert!(v.get("pythonSnippet").is_some());
        assert!(v["paper"].get("url").is_none());
        assert_eq!(bp.hub_url(), "https://huggingface.co/bert-base-uncased");
        assert_eq!(
            bp.paper_search_url(),
            "https://scholar.google.com/scholar?q=Attention%20Is%20All%20You%20Need"
        );
    }
}
