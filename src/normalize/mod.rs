use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use crate::errors::ForgeError;
use crate::wire::{
    Dataset, DatasetSource, Difficulty, GenerationOutput, ModelRef, PaperRef, ProjectBlueprint,
    RawGeneration,
};

pub const UNKNOWN_PAPER: &str = "Unknown Paper";
pub const UNKNOWN_MODEL: &str = "unknown";
pub const NO_CODE: &str = "# No code provided";

fn json_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```json[ \t]*\r?\n(.*?)\r?\n[ \t]*```").expect("json fence pattern is valid")
    })
}

fn bare_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[ \t]*\r?\n(.*?)\r?\n[ \t]*```").expect("bare fence pattern is valid")
    })
}

/// Returns the interior of the first ```` ```json ```` block in `raw`, else of
/// the first untagged fence, else `raw` itself. The result is trimmed.
pub fn extract_json_text(raw: &str) -> &str {
    let candidate = [json_fence(), bare_fence()]
        .into_iter()
        .find_map(|re| re.captures(raw).and_then(|c| c.get(1)))
        .map(|m| m.as_str())
        .unwrap_or(raw);
    candidate.trim()
}

/// Parses the model reply and normalizes every project in it.
pub fn normalize(raw: RawGeneration, batch_millis: i64) -> Result<GenerationOutput, ForgeError> {
    let projects = parse_projects(&raw.text, batch_millis)?;
    Ok(GenerationOutput { projects, grounding_chunks: raw.grounding })
}

pub fn parse_projects(text: &str, batch_millis: i64) -> Result<Vec<ProjectBlueprint>, ForgeError> {
    let json = extract_json_text(text);
    let parsed: Value =
        serde_json::from_str(json).map_err(|e| ForgeError::Parse(e.to_string()))?;
    let items = parsed
        .get("projects")
        .and_then(Value::as_array)
        .ok_or_else(|| ForgeError::Parse("reply has no \"projects\" array".into()))?;

    let empty = Map::new();
    let projects = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = item.as_object().unwrap_or(&empty);
            blueprint_from(obj, format!("proj_{batch_millis}_{index}"))
        })
        .collect::<Vec<_>>();

    tracing::debug!(count = projects.len(), "normalized projects");
    Ok(projects)
}

fn blueprint_from(p: &Map<String, Value>, id: String) -> ProjectBlueprint {
    ProjectBlueprint {
        id,
        title: text(p.get("title")),
        description: text(p.get("description")),
        difficulty: Difficulty::from(text(p.get("difficulty"))),
        domain: text(p.get("domain")),
        paper: paper(p.get("paper")),
        hugging_face_model: model(p.get("huggingFaceModel")),
        datasets: datasets(p.get("datasets")),
        implementation_steps: string_list(p.get("implementationSteps")),
        tech_stack: string_list(p.get("techStack")),
        python_snippet: text_or(p.get("pythonSnippet"), NO_CODE),
    }
}

/// Absent or falsy (`null`, `false`, `0`, `""`) counts as missing.
/// Empty arrays and objects count as present.
fn present(v: Option<&Value>) -> Option<&Value> {
    v.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn text(v: Option<&Value>) -> String {
    match present(v) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

fn text_or(v: Option<&Value>, default: &str) -> String {
    match present(v) {
        Some(_) => text(v),
        None => default.to_string(),
    }
}

fn optional_text(v: Option<&Value>) -> Option<String> {
    present(v).map(|_| text(v))
}

fn string_list(v: Option<&Value>) -> Vec<String> {
    match present(v) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| text(Some(item)))
            .collect(),
        _ => Vec::new(),
    }
}

fn paper(v: Option<&Value>) -> PaperRef {
    match present(v).and_then(Value::as_object) {
        Some(obj) => PaperRef {
            title: text_or(obj.get("title"), UNKNOWN_PAPER),
            url: optional_text(obj.get("url")),
            authors: optional_text(obj.get("authors")),
        },
        None => PaperRef { title: UNKNOWN_PAPER.into(), url: None, authors: None },
    }
}

fn model(v: Option<&Value>) -> ModelRef {
    match present(v).and_then(Value::as_object) {
        Some(obj) => ModelRef {
            model_id: text_or(obj.get("modelId"), UNKNOWN_MODEL),
            task: text_or(obj.get("task"), UNKNOWN_MODEL),
        },
        None => ModelRef { model_id: UNKNOWN_MODEL.into(), task: UNKNOWN_MODEL.into() },
    }
}

fn datasets(v: Option<&Value>) -> Vec<Dataset> {
    match present(v) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(|d| Dataset {
                name: text(d.get("name")),
                url: text(d.get("url")),
                source: DatasetSource::from(text_or(d.get("source"), DatasetSource::Other.as_str())),
                description: text(d.get("description")),
            })
            .collect(),
        _ => Vec::new(),
    }
}
