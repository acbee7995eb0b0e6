use chrono::Utc;

use super::{AppState, PublishModal, View};
use crate::log::RunLog;
use crate::normalize::normalize;
use crate::prompt::build_prompt;
use crate::provider::DynGenerator;
use crate::publish::DynPublisher;
use crate::ux;

pub const SUGGESTED_TOPICS: [&str; 3] =
    ["Transformer Agents", "Stable Diffusion ControlNet", "RAG with LangChain"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the app state and the two remote clients, and turns one line of
/// user input at a time into state transitions.
pub struct Session {
    state: AppState,
    generator: DynGenerator,
    publisher: DynPublisher,
    run_log: Option<RunLog>,
    progress: bool,
}

impl Session {
    pub fn new(generator: DynGenerator, publisher: DynPublisher) -> Self {
        Self { state: AppState::new(), generator, publisher, run_log: None, progress: false }
    }

    pub fn with_run_log(mut self, log: Option<RunLog>) -> Self {
        self.run_log = log;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let input = line.trim();

        if let Some(modal) = self.state.modal().cloned() {
            match modal {
                PublishModal::Success { .. } => self.state.close_modal(),
                PublishModal::Publishing => {}
                PublishModal::CollectingToken { .. } if input.eq_ignore_ascii_case("c") => {
                    self.state.close_modal()
                }
                PublishModal::CollectingToken { .. } => self.publish_with(input).await,
            }
            return Flow::Continue;
        }

        if input.eq_ignore_ascii_case("q") {
            return Flow::Quit;
        }

        match self.state.view() {
            View::Idle => {
                let topic = suggested_topic(input).unwrap_or(input);
                self.search(topic).await;
            }
            View::Loading => {}
            View::Results => match input {
                "b" | "B" => {
                    self.state.back();
                }
                "h" | "H" => {
                    self.state.home();
                }
                _ => {
                    if let Some(n) = input.parse::<usize>().ok().filter(|n| *n > 0) {
                        self.state.select(n - 1);
                    }
                }
            },
            View::Detail => match input {
                "b" | "B" => {
                    self.state.back();
                }
                "h" | "H" => {
                    self.state.home();
                }
                "g" | "G" => {
                    self.state.open_modal();
                }
                _ => {}
            },
        }
        Flow::Continue
    }

    /// Runs one generation for `topic`. Blank topics are ignored.
    pub async fn search(&mut self, topic: &str) {
        if !self.state.submit_query(topic) {
            return;
        }
        let prompt = build_prompt(topic);
        if let Some(log) = &self.run_log {
            log.save_prompt(&prompt);
        }

        let spinner = ux::Spinner::start(self.progress, "Analyzing Research Papers...");
        let result = self.generator.generate(&prompt).await;
        spinner.finish();

        let result = result.and_then(|raw| {
            if let Some(log) = &self.run_log {
                log.save_response(&raw.text);
            }
            normalize(raw, Utc::now().timestamp_millis())
        });
        if let (Ok(out), Some(log)) = (&result, &self.run_log) {
            log.save_batch(out);
        }
        if let Ok(out) = &result {
            tracing::info!(topic, count = out.projects.len(), citations = out.grounding_chunks.len(), "generated batch");
        }
        self.state.finish_generation(result);
    }

    async fn publish_with(&mut self, token: &str) {
        self.state.set_token(token);
        if !self.state.begin_publish() {
            return;
        }
        let Some(project) = self.state.selected().cloned() else {
            return;
        };
        let spinner = ux::Spinner::start(self.progress, "Creating repository...");
        let result = self.publisher.publish(self.state.token(), &project).await;
        spinner.finish();
        self.state.finish_publish(result);
    }
}

/// `#1`..`#3` pick one of the suggested topics.
fn suggested_topic(input: &str) -> Option<&'static str> {
    let n: usize = input.strip_prefix('#')?.parse().ok()?;
    SUGGESTED_TOPICS.get(n.checked_sub(1)?).copied()
}
