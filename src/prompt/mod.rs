/// Number of ideas requested per query.
pub const IDEAS_PER_QUERY: usize = 3;

fn required_fields() -> &'static str {
r#"For each project, provide:
1. A catchy Title.
2. A concise Description.
3. Difficulty level (Beginner, Intermediate, Advanced).
4. The specific ML Domain (e.g., NLP, CV, RL, Audio).
5. The name of a key Research Paper related to the technique (approximate title is fine, I will search for it).
6. A specific, existing Hugging Face Model ID that is relevant (e.g., "stabilityai/stable-diffusion-3-medium" or "meta-llama/Meta-Llama-3-8B").
7. 4-5 high-level Implementation Steps.
8. Recommended Tech Stack (libraries like PyTorch, Transformers, Diffusers, Gradio, etc.).
9. A short, valid Python code snippet using the 'transformers', 'diffusers' or 'torch' library to initialize the model or pipeline.
10. Suggest 2 relevant datasets from Hugging Face Datasets or Kaggle that would be perfect for training, fine-tuning, or testing this specific project. Provide the Name, Source (Hugging Face or Kaggle), and a very brief Description."#
}

fn output_schema() -> &'static str {
r#"Format the output as a purely JSON object with a key "projects" containing an array of objects.
Each project object must look like:
{
  "title": "...",
  "description": "...",
  "difficulty": "Beginner" | "Intermediate" | "Advanced",
  "domain": "...",
  "paper": { "title": "...", "url": "...", "authors": "..." },
  "huggingFaceModel": { "modelId": "...", "task": "..." },
  "implementationSteps": ["...", "..."],
  "techStack": ["...", "..."],
  "pythonSnippet": "...",
  "datasets": [{ "name": "...", "url": "...", "source": "...", "description": "..." }]
}
The dataset objects should look like { "name": "...", "url": "...", "source": "...", "description": "..." }. If you know the specific URL, provide it, otherwise leave it empty."#
}

/// Builds the single instruction sent to the model for `topic`.
/// The caller guarantees `topic` is not blank.
pub fn build_prompt(topic: &str) -> String {
    format!(
"Act as a Senior Machine Learning Engineer and Researcher.
The user is interested in: \"{topic}\".

Your goal is to suggest {count} distinct, high-value, and interesting project ideas that the user can build.
These projects should leverage actual, existing models on Hugging Face and relate to real research papers.

{fields}

{schema}

Do not use markdown formatting for the JSON block (no ```json code fences). Just return the raw JSON string if possible, or ensure the JSON is easy to extract.",
topic = topic,
count = IDEAS_PER_QUERY,
fields = required_fields(),
schema = output_schema(),
)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_topic_verbatim() {
        for topic in ["Audio Generation", "  RAG with \"LangChain\" ", "医療画像"] {
            let p = build_prompt(topic);
            assert!(p.contains(topic), "missing topic {topic:?}");
        }
    }

    #[test]
    fn enumerates_all_ten_fields() {
        let p = build_prompt("LLMs");
        for n in 1..=10 {
            assert!(p.contains(&format!("\n{n}. ")), "field {n} not enumerated");
        }
        assert!(p.contains("Hugging Face Model ID"));
        assert!(p.contains("Implementation Steps"));
    }

    #[test]
    fn asks_for_three_ideas_in_projects_array_without_fences() {
        let p = build_prompt("Computer Vision");
        assert!(p.contains("suggest 3 distinct"));
        assert!(p.contains("key \"projects\""));
        assert!(p.contains("Do not use markdown formatting"));
    }
}
