use crate::wire::ProjectBlueprint;

/// A file committed into the exported repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    pub path: &'static str,
    pub content: String,
    pub message: &'static str,
}

pub fn repo_files(p: &ProjectBlueprint) -> Vec<RepoFile> {
    vec![
        RepoFile { path: "README.md", content: render_readme(p), message: "Add project blueprint" },
        RepoFile { path: "main.py", content: ensure_newline(&p.python_snippet), message: "Add starter code" },
        RepoFile { path: "requirements.txt", content: requirements(&p.tech_stack), message: "Add requirements" },
    ]
}

pub fn render_readme(p: &ProjectBlueprint) -> String {
    let mut s = format!("# {}\n\n{}\n\n", p.title, p.description);
    s.push_str(&format!("- **Difficulty:** {}\n- **Domain:** {}\n\n", p.difficulty, p.domain));

    s.push_str("## Model\n\n");
    s.push_str(&format!(
        "[`{}`]({}) ({})\n\n",
        p.hugging_face_model.model_id,
        p.hub_url(),
        p.hugging_face_model.task
    ));

    s.push_str("## Research\n\n");
    match &p.paper.url {
        Some(url) => s.push_str(&format!("[{}]({})", p.paper.title, url)),
        None => s.push_str(&p.paper.title),
    }
    if let Some(authors) = &p.paper.authors {
        s.push_str(&format!(" by {authors}"));
    }
    s.push_str("\n\n");

    if !p.datasets.is_empty() {
        s.push_str("## Datasets\n\n");
        for d in &p.datasets {
            let name = if d.url.is_empty() { d.name.clone() } else { format!("[{}]({})", d.name, d.url) };
            s.push_str(&format!("- {} ({}): {}\n", name, d.source, d.description));
        }
        s.push('\n');
    }

    if !p.implementation_steps.is_empty() {
        s.push_str("## Implementation\n\n");
        for (i, step) in p.implementation_steps.iter().enumerate() {
            s.push_str(&format!("{}. {}\n", i + 1, step));
        }
        s.push('\n');
    }

    if !p.tech_stack.is_empty() {
        s.push_str("## Tech Stack\n\n");
        s.push_str(&p.tech_stack.join(", "));
        s.push_str("\n\n");
    }

    s.push_str("## Starter Code\n\n```python\n");
    s.push_str(&ensure_newline(&p.python_snippet));
    s.push_str("```\n");
    s
}

/// pip package names for the tech stack; entries that are not a single
/// token (e.g. "Hugging Face Hub") are skipped.
fn requirements(stack: &[String]) -> String {
    let mut out = String::new();
    for tech in stack {
        let name = tech.trim();
        if name.is_empty() || name.contains(char::is_whitespace) {
            continue;
        }
        let lower = name.to_lowercase();
        out.push_str(pip_name(&lower).unwrap_or(lower.as_str()));
        out.push('\n');
    }
    out
}

fn pip_name(lower: &str) -> Option<&'static str> {
    match lower {
        "pytorch" => Some("torch"),
        "sklearn" => Some("scikit-learn"),
        "opencv" => Some("opencv-python"),
        _ => None,
    }
}

fn ensure_newline(s: &str) -> String {
    if s.ends_with('\n') {
        s.to_string()
    } else {
        format!("{s}\n")
    }
}
