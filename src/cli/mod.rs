use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "neuralforge", version, about = "Generate grounded ML project blueprints and export them to GitHub")]
pub struct Args {
    /// Start with this topic instead of prompting for one.
    #[arg(long)]
    pub topic: Option<String>,

    /// With --topic: print the normalized batch as JSON and exit.
    #[arg(long, default_value_t = false, requires = "topic")]
    pub json: bool,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_requires_topic() {
        assert!(Args::try_parse_from(["neuralforge", "--json"]).is_err());
        let a = Args::try_parse_from(["neuralforge", "--json", "--topic", "LLMs"]).unwrap();
        assert!(a.json);
        assert_eq!(a.topic.as_deref(), Some("LLMs"));
    }

    #[test]
    fn defaults_are_interactive() {
        let a = Args::try_parse_from(["neuralforge"]).unwrap();
        assert!(a.topic.is_none());
        assert!(!a.save_request && !a.save_response && !a.debug);
    }
}
