use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::readme::{repo_files, RepoFile};
use super::{slugify, Publisher};
use crate::config::Config;
use crate::errors::{ForgeError, PUBLISH_FALLBACK};
use crate::wire::ProjectBlueprint;

const API_VERSION: &str = "2022-11-28";
const MAX_DESCRIPTION: usize = 350;

pub struct GitHubPublisher {
    client: Client,
    api_base: String,
    private: bool,
}

#[derive(Debug, Deserialize)]
struct CreatedRepo {
    full_name: String,
    html_url: String,
}

impl GitHubPublisher {
    pub fn new(cfg: &Config) -> Result<Self, ForgeError> {
        let client = Client::builder()
            .user_agent(cfg.github.user_agent.clone())
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ForgeError::Config(format!("http client: {e}")))?;
        Ok(Self { client, api_base: cfg.github.api_base.trim_end_matches('/').to_string(), private: cfg.github.private })
    }

    fn authed(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.bearer_auth(token.trim())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn create_repo(&self, token: &str, project: &ProjectBlueprint) -> Result<CreatedRepo, ForgeError> {
        let url = format!("{}/user/repos", self.api_base);
        let body = create_repo_body(project, self.private);
        tracing::debug!(name = %body["name"], "creating repository");
        let resp = self
            .authed(self.client.post(&url), token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::Publish(e.to_string()))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| ForgeError::Publish(e.to_string()))?;
        if !status.is_success() {
            return Err(ForgeError::Publish(api_error_message(status, &text)));
        }
        serde_json::from_str(&text)
            .map_err(|e| ForgeError::Publish(format!("unexpected GitHub response: {e}")))
    }

    async fn put_file(&self, token: &str, repo: &CreatedRepo, file: &RepoFile) -> Result<(), ForgeError> {
        let url = format!("{}/repos/{}/contents/{}", self.api_base, repo.full_name, file.path);
        let resp = self
            .authed(self.client.put(&url), token)
            .json(&file_body(file))
            .send()
            .await
            .map_err(|e| ForgeError::Publish(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            tracing::debug!(path = file.path, "committed file");
            return Ok(());
        }
        let text = resp.text().await.unwrap_or_default();
        Err(ForgeError::Publish(api_error_message(status, &text)))
    }
}

#[async_trait]
impl Publisher for GitHubPublisher {
    async fn publish(&self, token: &str, project: &ProjectBlueprint) -> Result<String, ForgeError> {
        if token.trim().is_empty() {
            return Err(ForgeError::Publish("A GitHub token is required".into()));
        }
        let repo = self.create_repo(token, project).await?;

        // A failed commit leaves the created repository in place.
        for file in repo_files(project) {
            if let Err(e) = self.put_file(token, &repo, &file).await {
                tracing::warn!(repo = %repo.full_name, path = file.path, "commit failed after repository creation");
                return Err(ForgeError::Publish(format!(
                    "Repository {} was created but committing {} failed: {}",
                    repo.html_url,
                    file.path,
                    e.user_message()
                )));
            }
        }

        tracing::info!(url = %repo.html_url, "published project");
        Ok(repo.html_url)
    }
}

pub fn create_repo_body(project: &ProjectBlueprint, private: bool) -> Value {
    let description: String = project.description.chars().take(MAX_DESCRIPTION).collect();
    json!({
        "name": slugify(&project.title),
        "description": description,
        "private": private,
        "auto_init": false,
    })
}

pub fn file_body(file: &RepoFile) -> Value {
    json!({
        "message": file.message,
        "content": STANDARD.encode(file.content.as_bytes()),
    })
}

/// GitHub's `message` verbatim, with the first validation detail appended
/// when present. Falls back to a generic message with the status code.
pub fn api_error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        message: Option<String>,
        #[serde(default)]
        errors: Vec<Value>,
    }

    let Some(env) = serde_json::from_str::<Envelope>(body).ok() else {
        return format!("{PUBLISH_FALLBACK} ({status})");
    };
    let Some(message) = env.message.filter(|m| !m.trim().is_empty()) else {
        return format!("{PUBLISH_FALLBACK} ({status})");
    };
    let detail = env
        .errors
        .first()
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str);
    match detail {
        Some(d) => format!("{message} ({d})"),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeServer;
    use crate::wire::*;

    fn project(title: &str) -> ProjectBlueprint {
        ProjectBlueprint {
            id: "proj_1_0".into(),
            title: title.into(),
            description: "d".repeat(400),
            difficulty: Difficulty::Beginner,
            domain: "CV".into(),
            paper: PaperRef { title: "ResNet".into(), url: None, authors: None },
            hugging_face_model: ModelRef { model_id: "microsoft/resnet-50".into(), task: "image-classification".into() },
            datasets: vec![],
            implementation_steps: vec![],
            tech_stack: vec![],
            python_snippet: "import torch".into(),
        }
    }

    #[test]
    fn create_body_uses_slug_and_visibility() {
        let body = create_repo_body(&project("Plant Disease Detector"), true);
        assert_eq!(body["name"], "plant-disease-detector");
        assert_eq!(body["private"], true);
        assert_eq!(body["description"].as_str().unwrap().len(), MAX_DESCRIPTION);
    }

    #[test]
    fn file_body_is_base64() {
        let file = RepoFile { path: "main.py", content: "import torch\n".into(), message: "Add starter code" };
        let body = file_body(&file);
        assert_eq!(body["content"], "aW1wb3J0IHRvcmNoCg==");
        assert_eq!(body["message"], "Add starter code");
    }

    #[test]
    fn bad_credentials_is_verbatim() {
        let msg = api_error_message(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#,
        );
        assert_eq!(msg, "Bad credentials");
    }

    #[test]
    fn name_collision_includes_detail() {
        let body = r#"{"message":"Repository creation failed.","errors":[{"resource":"Repository","code":"custom","field":"name","message":"name already exists on this account"}]}"#;
        assert_eq!(
            api_error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "Repository creation failed. (name already exists on this account)"
        );
    }

    #[test]
    fn unreadable_error_falls_back() {
        let msg = api_error_message(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(msg, "Failed to publish to GitHub (502 Bad Gateway)");
    }

    const CREATED: &str = r#"{"full_name":"ada/plant-disease-detector","html_url":"https://github.com/ada/plant-disease-detector"}"#;

    fn publisher_for(server: &FakeServer) -> GitHubPublisher {
        let mut cfg = Config::default();
        cfg.github.api_base = server.base.clone();
        GitHubPublisher::new(&cfg).unwrap()
    }

    #[tokio::test]
    async fn creates_repo_then_commits_files_in_order() {
        let server = FakeServer::start(vec![(201, CREATED), (201, "{}"), (201, "{}"), (201, "{}")]).await;
        let url = publisher_for(&server).publish("tok", &project("Plant Disease Detector")).await.unwrap();
        assert_eq!(url, "https://github.com/ada/plant-disease-detector");

        let seen = server.seen();
        let calls: Vec<_> = seen.iter().map(|r| format!("{} {}", r.method, r.path)).collect();
        assert_eq!(
            calls,
            [
                "POST /user/repos",
                "PUT /repos/ada/plant-disease-detector/contents/README.md",
                "PUT /repos/ada/plant-disease-detector/contents/main.py",
                "PUT /repos/ada/plant-disease-detector/contents/requirements.txt",
            ]
        );
        assert_eq!(seen[0].header("authorization"), Some("Bearer tok"));
        assert_eq!(seen[0].header("x-github-api-version"), Some(API_VERSION));
        let created: Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(created["name"], "plant-disease-detector");
    }

    #[tokio::test]
    async fn rejected_token_surfaces_github_message() {
        let server = FakeServer::start(vec![(401, r#"{"message":"Bad credentials"}"#)]).await;
        let err = publisher_for(&server).publish("nope", &project("x")).await.unwrap_err();
        assert_eq!(err, ForgeError::Publish("Bad credentials".into()));
        assert_eq!(server.seen().len(), 1);
    }

    #[tokio::test]
    async fn failed_commit_names_repo_and_file() {
        let server = FakeServer::start(vec![
            (201, CREATED),
            (201, "{}"),
            (422, r#"{"message":"Invalid request."}"#),
        ])
        .await;
        let err = publisher_for(&server).publish("tok", &project("Plant Disease Detector")).await.unwrap_err();
        assert_eq!(
            err,
            ForgeError::Publish(
                "Repository https://github.com/ada/plant-disease-detector was created but committing main.py failed: Invalid request."
                    .into()
            )
        );
        assert_eq!(server.seen().len(), 3);
    }

    #[tokio::test]
    async fn blank_token_fails_without_network() {
        let mut cfg = Config::default();
        cfg.github.api_base = "http://127.0.0.1:9".into();
        let publisher = GitHubPublisher::new(&cfg).unwrap();
        let err = publisher.publish("  ", &project("x")).await.unwrap_err();
        assert_eq!(err, ForgeError::Publish("A GitHub token is required".into()));
    }
}
