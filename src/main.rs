use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use std::io::{self, BufRead};
use std::path::Path;
use uuid::Uuid;

mod app;
mod cli;
mod config;
mod errors;
mod grounding;
mod log;
mod normalize;
mod prompt;
mod provider;
mod publish;
#[cfg(test)]
mod testutil;
mod ux;
mod wire;

use app::session::{Flow, Session};
use provider::Generator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    dotenvy::dotenv().ok();
    init_tracing(args.debug)?;
    if args.no_color {
        colored::control::set_override(false);
    }

    let mut cfg = config::Config::load(args.config.as_deref().map(Path::new))?;
    if let Some(model) = &args.model {
        cfg.model = model.clone();
    }
    if let Some(t) = args.timeout_secs {
        cfg.timeout_secs = t;
    }

    // Missing credentials stop here, before any request is made.
    let generator = provider::make_generator(&cfg)?;

    if args.json {
        let topic = args.topic.as_deref().unwrap_or_default();
        if topic.trim().is_empty() {
            bail!("--topic must not be blank");
        }
        let raw = generator
            .generate(&prompt::build_prompt(topic))
            .await
            .context("generation failed")?;
        let out = normalize::normalize(raw, Utc::now().timestamp_millis())?;
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let publisher = Box::new(publish::github::GitHubPublisher::new(&cfg)?);
    let run = Uuid::new_v4();
    let run_log = log::RunLog::new(Path::new(&cfg.artifacts_dir), run, args.save_request, args.save_response)
        .map(|l| l.with_echo(args.debug));
    if args.debug {
        if let Some(l) = &run_log {
            println!("debug: artifacts directory: {}", l.dir().display());
        }
    }

    let mut session = Session::new(generator, publisher)
        .with_run_log(run_log)
        .with_progress(!args.no_progress);

    if let Some(topic) = &args.topic {
        session.search(topic).await;
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        ux::render(session.state(), cfg.max_citations);
        let Some(line) = lines.next() else { break };
        let line = line.context("reading input")?;
        if session.handle_line(&line).await == Flow::Quit {
            break;
        }
    }
    println!();
    Ok(())
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let level = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("NEURALFORGE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;
    Ok(())
}
