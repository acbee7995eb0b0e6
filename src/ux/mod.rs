use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::app::session::SUGGESTED_TOPICS;
use crate::app::{AppState, PublishModal, View};
use crate::grounding::display_citations;
use crate::wire::{Difficulty, GroundingChunk, ProjectBlueprint};

/// Spinner shown while a request is in flight; a no-op when disabled.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    pub fn start(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Draws the current view, the error banner and the export dialog.
pub fn render(state: &AppState, max_citations: usize) {
    if let Some(err) = state.error() {
        println!("\n{}", err.red().bold());
    }
    match state.view() {
        View::Idle => show_landing(),
        View::Loading => {}
        View::Results => {
            show_results(state.query(), state.projects());
            show_citations(state.grounding(), max_citations);
        }
        View::Detail => {
            if let Some(p) = state.selected() {
                show_detail(p);
            }
        }
    }
    if let Some(modal) = state.modal() {
        show_modal(modal);
    }
    print_prompt(state);
}

fn print_prompt(state: &AppState) {
    let hint = match (state.view(), state.modal()) {
        (_, Some(PublishModal::CollectingToken { .. })) => "token (c to cancel)",
        (_, Some(PublishModal::Success { .. })) => "enter to close",
        (_, Some(PublishModal::Publishing)) | (View::Loading, None) => return,
        (View::Idle, None) => "topic, #1-#3 or q",
        (View::Results, None) => "card number, b back, q",
        (View::Detail, None) => "g export to GitHub, b back, h home, q",
    };
    print!("{} ", format!("[{hint}] >").dimmed());
    io::stdout().flush().ok();
}

pub fn difficulty_badge(d: &Difficulty) -> ColoredString {
    let label = format!("[{}]", d);
    match d {
        Difficulty::Beginner => label.green(),
        Difficulty::Intermediate => label.yellow(),
        _ => label.red(),
    }
}

fn show_landing() {
    println!("\n{}", "NeuralForge".bold().blue());
    println!(
        "Discover innovative Machine Learning projects powered by the latest Hugging Face models, datasets, and research papers."
    );
    println!("\nWhat do you want to build? e.g., 'Audio Generation', 'Medical Imaging'");
    for (i, t) in SUGGESTED_TOPICS.iter().enumerate() {
        println!("  {} {}", format!("#{}", i + 1).dimmed(), t);
    }
}

fn show_results(query: &str, projects: &[ProjectBlueprint]) {
    println!("\n{}", format!("Results for \"{query}\"").bold());
    for (i, p) in projects.iter().enumerate() {
        println!("\n{}. {}  {}", i + 1, difficulty_badge(&p.difficulty), p.title.bold());
        println!("   {}", truncate(&p.description, 160));
        println!("   {} {}", "paper:".dimmed(), truncate(&p.paper.title, 60));
        println!("   {} {}", "model:".dimmed(), p.hugging_face_model.model_id.cyan());
    }
    println!();
}

fn show_citations(chunks: &[GroundingChunk], limit: usize) {
    let shown = display_citations(chunks, limit);
    if shown.is_empty() {
        return;
    }
    println!("{}", "SOURCES & CITATIONS".dimmed().bold());
    for w in shown {
        println!("  {} {}", w.title, w.uri.dimmed());
    }
    println!();
}

pub fn show_detail(p: &ProjectBlueprint) {
    println!("\n{}  {}", format!("[{}]", p.domain).blue(), difficulty_badge(&p.difficulty));
    println!("{}", p.title.bold());
    println!("{}\n", p.description);

    println!("{}", "The Model".magenta().bold());
    println!("  Hugging Face ID: {}", p.hugging_face_model.model_id.cyan());
    println!("  Task: {}", p.hugging_face_model.task);
    println!("  View on Hub: {}\n", p.hub_url().dimmed());

    println!("{}", "The Research".magenta().bold());
    println!("  {}", p.paper.title);
    if let Some(authors) = &p.paper.authors {
        println!("  {}", authors.dimmed());
    }
    if let Some(url) = &p.paper.url {
        println!("  {}", url.dimmed());
    }
    println!("  Search Paper: {}\n", p.paper_search_url().dimmed());

    println!("{}", "Datasets".yellow().bold());
    if p.datasets.is_empty() {
        println!("  No specific datasets found.");
    }
    for d in &p.datasets {
        println!("  {} {}", d.name.bold(), format!("({})", d.source).dimmed());
        println!("    {}", d.description);
        if !d.url.is_empty() {
            println!("    View Data: {}", d.url.dimmed());
        }
    }

    println!("\n{}", "Implementation Blueprint".bold());
    for (i, step) in p.implementation_steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    println!("\n{}", "Recommended Tech Stack".bold());
    println!("  {}", p.tech_stack.join(" · "));

    println!("\n{}", "Starter Code".green().bold());
    println!("{}", "python".dimmed());
    for line in p.python_snippet.lines() {
        println!("  {}", line);
    }
    println!();
}

fn show_modal(modal: &PublishModal) {
    println!("\n{}", "┏━━━━━━━━━━━━━━━━━━ Export to GitHub ━━━━━━━━━━━━━━━━━━┓".bold());
    match modal {
        PublishModal::CollectingToken { error } => {
            println!("  To create a repository on your behalf, we need a GitHub Personal Access Token with `repo` scope.");
            println!("  {}", "Your token is kept in memory for this session only.".dimmed());
            if let Some(err) = error {
                println!("  {}", err.red());
            }
        }
        PublishModal::Publishing => println!("  Creating..."),
        PublishModal::Success { url } => {
            println!("  {}", "Repository Created!".green().bold());
            println!("  Your project code has been pushed successfully.");
            println!("  View Repository: {}", url.underline());
        }
    }
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ääääää", 4), "äää…");
    }

    #[test]
    fn badge_shows_unlisted_difficulty() {
        colored::control::set_override(false);
        assert_eq!(difficulty_badge(&Difficulty::Other("Expert".into())).to_string(), "[Expert]");
        assert_eq!(difficulty_badge(&Difficulty::Beginner).to_string(), "[Beginner]");
    }
}
