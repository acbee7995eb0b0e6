use async_trait::async_trait;

use crate::config::Config;
use crate::errors::ForgeError;
use crate::wire::RawGeneration;

pub mod gemini;

/// A hosted model that answers one prompt per call, with search grounding.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<RawGeneration, ForgeError>;
}

pub type DynGenerator = Box<dyn Generator + Send + Sync>;

pub fn make_generator(cfg: &Config) -> Result<DynGenerator, ForgeError> {
    let api_key = gemini::resolve_api_key(|k| std::env::var(k).ok())?;
    Ok(Box::new(gemini::GeminiProvider::new(cfg, api_key)?))
}
