use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForgeError {
    #[error("configuration error: {0}")] Config(String),
    #[error("generation failed: {0}")] Generation(String),
    #[error("could not parse model reply: {0}")] Parse(String),
    #[error("{0}")] Publish(String),
}

impl ForgeError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ForgeError::Generation(_) | ForgeError::Parse(_) => GENERATION_BANNER.to_string(),
            ForgeError::Publish(msg) if msg.trim().is_empty() => PUBLISH_FALLBACK.to_string(),
            other => other.to_string(),
        }
    }
}

pub const GENERATION_BANNER: &str =
    "Could not generate ideas. Please try a specific topic like 'Computer Vision' or 'LLMs'.";

pub const PUBLISH_FALLBACK: &str = "Failed to publish to GitHub";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_and_parse_share_banner() {
        let a = ForgeError::Generation("timeout".into()).user_message();
        let b = ForgeError::Parse("eof".into()).user_message();
        assert_eq!(a, b);
        assert_eq!(a, GENERATION_BANNER);
    }

    #[test]
    fn publish_message_is_verbatim() {
        let e = ForgeError::Publish("Bad credentials".into());
        assert_eq!(e.user_message(), "Bad credentials");
        assert_eq!(ForgeError::Publish("  ".into()).user_message(), PUBLISH_FALLBACK);
    }
}
