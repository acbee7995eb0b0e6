use async_trait::async_trait;

use crate::errors::ForgeError;
use crate::wire::ProjectBlueprint;

pub mod github;
pub mod readme;

/// Exports a blueprint as a new remote repository and returns its URL.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, token: &str, project: &ProjectBlueprint) -> Result<String, ForgeError>;
}

pub type DynPublisher = Box<dyn Publisher + Send + Sync>;

const MAX_REPO_NAME: usize = 100;

/// Repository name for a project title: lowercase ASCII alphanumerics,
/// anything else collapsed into single dashes.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out.truncate(MAX_REPO_NAME);
    let out = out.trim_end_matches('-').to_string();
    if out.is_empty() {
        "ml-project".into()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_titles() {
        assert_eq!(slugify("Voice Cloner 3000!"), "voice-cloner-3000");
        assert_eq!(slugify("  --RAG: with  LangChain--  "), "rag-with-langchain");
        assert_eq!(slugify("Séance AI"), "s-ance-ai");
        assert_eq!(slugify("!!!"), "ml-project");
        assert_eq!(slugify(""), "ml-project");
    }

    #[test]
    fn caps_length_without_trailing_dash() {
        let long = format!("{} b", "a".repeat(99));
        let slug = slugify(&long);
        assert!(slug.len() <= 100);
        assert!(!slug.ends_with('-'));
    }
}
