use crate::errors::ForgeError;
use crate::wire::{GenerationOutput, GroundingChunk, ProjectBlueprint};

pub mod session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Idle,
    Loading,
    Results,
    Detail,
}

/// Sub-states of the export dialog. Failures return to token entry with
/// the message attached so the user can retry in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishModal {
    CollectingToken { error: Option<String> },
    Publishing,
    Success { url: String },
}

/// Session state. Every field changes only through the transition methods
/// below; the batch is replaced wholesale and never edited in place.
#[derive(Debug, Default)]
pub struct AppState {
    view: View,
    query: String,
    projects: Vec<ProjectBlueprint>,
    grounding: Vec<GroundingChunk>,
    selected: Option<usize>,
    error: Option<String>,
    token: String,
    modal: Option<PublishModal>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn projects(&self) -> &[ProjectBlueprint] {
        &self.projects
    }

    pub fn grounding(&self) -> &[GroundingChunk] {
        &self.grounding
    }

    pub fn selected(&self) -> Option<&ProjectBlueprint> {
        self.selected.and_then(|i| self.projects.get(i))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn modal(&self) -> Option<&PublishModal> {
        self.modal.as_ref()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn set_view(&mut self, v: View) {
        tracing::debug!(from = ?self.view, to = ?v, "view transition");
        self.view = v;
    }

    fn clear_batch(&mut self) {
        self.projects = Vec::new();
        self.grounding = Vec::new();
        self.selected = None;
    }

    /// `Idle -> Loading` for a non-blank query. Returns whether it moved.
    pub fn submit_query(&mut self, query: &str) -> bool {
        if self.view() != View::Idle || query.trim().is_empty() {
            return false;
        }
        self.query = query.to_string();
        self.error = None;
        self.clear_batch();
        self.set_view(View::Loading);
        true
    }

    /// Applies a finished generation. Ignored unless still `Loading`.
    pub fn finish_generation(&mut self, result: Result<GenerationOutput, ForgeError>) {
        if self.view() != View::Loading {
            tracing::debug!("dropping generation result that arrived outside Loading");
            return;
        }
        match result {
            Ok(out) => {
                self.projects = out.projects;
                self.grounding = out.grounding_chunks;
                self.selected = None;
                self.set_view(View::Results);
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                self.clear_batch();
                self.error = Some(e.user_message());
                self.set_view(View::Idle);
            }
        }
    }

    /// `Results -> Detail` for a card index of the current batch.
    pub fn select(&mut self, index: usize) -> bool {
        if self.view() != View::Results || index >= self.projects.len() {
            return false;
        }
        self.selected = Some(index);
        self.set_view(View::Detail);
        true
    }

    /// `Detail -> Results` or `Results -> Idle`. No-op elsewhere or while
    /// the export dialog is open.
    pub fn back(&mut self) -> bool {
        if self.modal.is_some() {
            return false;
        }
        match self.view() {
            View::Detail => {
                self.selected = None;
                self.set_view(View::Results);
                true
            }
            View::Results => {
                self.clear_batch();
                self.query.clear();
                self.set_view(View::Idle);
                true
            }
            View::Idle | View::Loading => false,
        }
    }

    /// Returns to the search view, discarding the batch.
    pub fn home(&mut self) -> bool {
        if self.modal.is_some() || self.view() == View::Idle {
            return false;
        }
        self.clear_batch();
        self.set_view(View::Idle);
        true
    }

    pub fn open_modal(&mut self) -> bool {
        if self.view() != View::Detail || self.modal.is_some() {
            return false;
        }
        self.modal = Some(PublishModal::CollectingToken { error: None });
        true
    }

    pub fn set_token(&mut self, token: &str) {
        self.token = token.trim().to_string();
    }

    /// `CollectingToken -> Publishing` when a token and selection exist.
    pub fn begin_publish(&mut self) -> bool {
        let collecting = matches!(self.modal, Some(PublishModal::CollectingToken { .. }));
        if !collecting || self.token.is_empty() || self.selected().is_none() {
            return false;
        }
        self.modal = Some(PublishModal::Publishing);
        true
    }

    pub fn finish_publish(&mut self, result: Result<String, ForgeError>) {
        if self.modal != Some(PublishModal::Publishing) {
            return;
        }
        self.modal = Some(match result {
            Ok(url) => PublishModal::Success { url },
            Err(e) => {
                tracing::warn!(error = %e, "publish failed");
                PublishModal::CollectingToken { error: Some(e.user_message()) }
            }
        });
    }

    /// Dismisses the dialog from any sub-state. The token is kept.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }
}
