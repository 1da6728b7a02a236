use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::common::error::{Result, WeekError};
use crate::domain::WeekData;

const API_ROOT: &str = "https://api.github.com";
const COMMIT_MESSAGE: &str = "Update week.json from admin";
// The Contents API rejects requests without a user agent
const USER_AGENT: &str = concat!("week-in-music/", env!("CARGO_PKG_VERSION"));

/// Thin client for one file in one repository, driven through the GitHub
/// Contents API.
pub struct GitHubClient {
    client: reqwest::Client,
    repo: String,
    file_path: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    name: String,
    sha: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    commit: CommitInfo,
}

#[derive(Debug, Deserialize)]
struct CommitInfo {
    sha: String,
}

impl GitHubClient {
    pub fn new(repo: impl Into<String>, file_path: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            repo: repo.into(),
            file_path: file_path.into(),
            token: token.into(),
        })
    }

    fn contents_url(&self) -> String {
        format!("{API_ROOT}/repos/{}/contents/{}", self.repo, self.file_path)
    }

    /// Fetch the current file metadata, or `None` when the file does not
    /// exist yet.
    async fn get_contents(&self) -> Result<Option<ContentsResponse>> {
        let response = self
            .client
            .get(self.contents_url())
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(WeekError::GitHub {
                message: format!("GET contents failed: {}", response.text().await?),
            });
        }
        Ok(Some(response.json().await?))
    }

    /// Connection test: confirm the configured file is reachable and return
    /// its name.
    pub async fn check(&self) -> Result<String> {
        match self.get_contents().await? {
            Some(contents) => Ok(contents.name),
            None => Err(WeekError::GitHub {
                message: format!("{} not found in {}", self.file_path, self.repo),
            }),
        }
    }

    /// Download and decode the hosted dataset.
    pub async fn fetch(&self) -> Result<WeekData> {
        let contents = self.get_contents().await?.ok_or_else(|| WeekError::GitHub {
            message: format!("{} not found in {}", self.file_path, self.repo),
        })?;

        // The API returns base64 with embedded line breaks
        let packed: String = contents
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64.decode(packed).map_err(|e| WeekError::GitHub {
            message: format!("undecodable content for {}: {e}", self.file_path),
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Publish the dataset as a new commit. The current blob sha is fetched
    /// first so updates replace the existing file; it is omitted when the
    /// file is being created.
    pub async fn publish(&self, week: &WeekData) -> Result<String> {
        let sha = self.get_contents().await?.map(|contents| contents.sha);
        debug!(sha = sha.as_deref().unwrap_or("<new file>"), "publishing to GitHub");

        let mut pretty = serde_json::to_string_pretty(week)?;
        pretty.push('\n');

        let mut body = json!({
            "message": COMMIT_MESSAGE,
            "content": BASE64.encode(pretty.as_bytes()),
        });
        if let Some(sha) = sha {
            body["sha"] = json!(sha);
        }

        let response = self
            .client
            .put(self.contents_url())
            .header("Authorization", format!("token {}", self.token))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeekError::GitHub {
                message: format!("PUT contents failed: {}", response.text().await?),
            });
        }

        let put: PutResponse = response.json().await?;
        info!(commit = %put.commit.sha, repo = %self.repo, "published week data");
        Ok(put.commit.sha)
    }
}
