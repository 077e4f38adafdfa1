use crate::error::DetectorError;
use crate::github::issues::RepoSlug;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const USER_AGENT: &str = "issuedup-cli";
const ACCEPT: &str = "application/vnd.github+json";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Operations the detector needs from the issue hosting platform.
#[allow(async_fn_in_trait)]
pub trait IssueTracker {
    /// One page of issues, newest first, in raw REST API form.
    async fn list_issues(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, DetectorError>;
    /// A single issue in raw REST API form.
    async fn get_issue(&self, number: u64) -> Result<serde_json::Value, DetectorError>;
    /// Add a comment to an issue
    async fn post_comment(&self, issue_number: u64, body: &str) -> Result<(), DetectorError>;
}

/// GitHub REST API client scoped to one repository and one token.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    repository: RepoSlug,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, repository: RepoSlug, token: &str) -> Result<Self, DetectorError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DetectorError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(GitHubClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            repository,
            token: token.to_string(),
        })
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_url, self.repository.owner, self.repository.name
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
    }
}

impl IssueTracker for GitHubClient {
    async fn list_issues(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, DetectorError> {
        let response = self
            .request(reqwest::Method::GET, &self.issues_url())
            .query(&[
                ("state", "all"),
                ("sort", "created"),
                ("direction", "desc"),
                ("per_page", &per_page.to_string()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json::<Vec<serde_json::Value>>().await?)
    }

    async fn get_issue(&self, number: u64) -> Result<serde_json::Value, DetectorError> {
        let url = format!("{}/{}", self.issues_url(), number);
        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<serde_json::Value>().await?)
    }

    async fn post_comment(&self, issue_number: u64, body: &str) -> Result<(), DetectorError> {
        let url = format!("{}/{}/comments", self.issues_url(), issue_number);
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DetectorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let rate_limited = is_rate_limited(response.headers());
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());

    Err(classify_failure(status, rate_limited, message))
}

/// True when GitHub reports the rate limit as used up.
pub fn is_rate_limited(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        == Some("0")
}

/// Map a non-success status to the error taxonomy.
pub fn classify_failure(status: StatusCode, rate_limited: bool, message: String) -> DetectorError {
    match status {
        StatusCode::UNAUTHORIZED => {
            DetectorError::Authentication("Token invalid or expired".to_string())
        }
        StatusCode::FORBIDDEN if !rate_limited => DetectorError::Authentication(
            "Token lacks permission for this repository".to_string(),
        ),
        _ => DetectorError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
