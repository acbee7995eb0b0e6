use crate::wire::GenerationOutput;
use fs_err as fs;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Opt-in per-run artifacts: prompt, raw reply and normalized batch of
/// each generation, under `<artifacts_dir>/<run id>/`. Write failures are
/// logged and never interrupt the session.
pub struct RunLog {
    dir: PathBuf,
    save_request: bool,
    save_response: bool,
    seq: AtomicU32,
    echo: bool,
}

fn run_dir(root: &Path, run: Uuid) -> PathBuf {
    root.join(run.to_string())
}

impl RunLog {
    /// `None` when neither flag is on.
    pub fn new(artifacts_dir: &Path, run: Uuid, save_request: bool, save_response: bool) -> Option<Self> {
        if !save_request && !save_response {
            return None;
        }
        Some(Self { dir: run_dir(artifacts_dir, run), save_request, save_response, seq: Default::default(), echo: false })
    }

    /// Print each saved file path to stdout.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Each prompt opens a new numbered stage.
    pub fn save_prompt(&self, prompt: &str) -> Option<PathBuf> {
        self.seq.fetch_add(1, Ordering::Relaxed);
        if !self.save_request {
            return None;
        }
        self.write("prompt.txt", prompt)
    }

    pub fn save_response(&self, raw: &str) -> Option<PathBuf> {
        if !self.save_response {
            return None;
        }
        self.write("response.txt", raw)
    }

    pub fn save_batch(&self, out: &GenerationOutput) -> Option<PathBuf> {
        if !self.save_response {
            return None;
        }
        match to_string_pretty(out) {
            Ok(json) => self.write("projects.json", &json),
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize batch");
                None
            }
        }
    }

    fn stage_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{:02}.{name}", self.seq.load(Ordering::Relaxed)))
    }

    /// Returns the written path, or `None` after logging the failure.
    fn write(&self, name: &str, content: &str) -> Option<PathBuf> {
        let path = self.stage_path(name);
        let res = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&path, content));
        match res {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "saved artifact");
                if self.echo {
                    println!("debug: saved {}", path.display());
                }
                Some(path)
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not save artifact");
                None
            }
        }
    }
}
