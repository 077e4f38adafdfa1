use crate::error::DetectorError;
use crate::github::client::IssueTracker;
use crate::github::issues::{Issue, IssueState};
use chrono::{DateTime, TimeDelta, Utc};

pub const PER_PAGE: u32 = 100;

/// Bounds on how much issue history a run looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchWindow {
    pub lookback_days: u32,
    pub max_issues: usize,
}

impl Default for FetchWindow {
    fn default() -> Self {
        FetchWindow {
            lookback_days: 30,
            max_issues: 500,
        }
    }
}

/// Parse a single issue object from the GitHub REST API.
///
/// Returns `None` for pull requests and for objects missing a field or
/// carrying an unknown state.
pub fn parse_github_issue(issue: &serde_json::Value) -> Option<Issue> {
    if !issue["pull_request"].is_null() {
        return None;
    }

    let number = issue["number"].as_u64()?;
    let title = issue["title"].as_str()?;
    let state = IssueState::parse(issue["state"].as_str()?)?;
    let created_at = DateTime::parse_from_rfc3339(issue["created_at"].as_str()?)
        .ok()?
        .with_timezone(&Utc);

    Some(Issue {
        number,
        title: title.to_string(),
        body: issue["body"].as_str().unwrap_or_default().to_string(),
        created_at,
        state,
        html_url: issue["html_url"].as_str().unwrap_or_default().to_string(),
    })
}

pub fn parse_github_issues(issues_json: &[serde_json::Value]) -> Vec<Issue> {
    issues_json.iter().filter_map(parse_github_issue).collect()
}

/// Page through the repository's issues, newest first, until the lookback
/// window or the issue cap is exhausted.
///
/// Issue `exclude` is skipped and does not count toward the cap.
pub async fn fetch_recent_issues<T: IssueTracker>(
    tracker: &T,
    window: &FetchWindow,
    exclude: u64,
    now: DateTime<Utc>,
) -> Result<Vec<Issue>, DetectorError> {
    let cutoff = now - TimeDelta::days(i64::from(window.lookback_days));
    let mut all_issues = Vec::new();
    let mut page = 1;

    loop {
        let issues_json = tracker.list_issues(page, PER_PAGE).await?;
        tracing::debug!(page, count = issues_json.len(), "fetched issue page");

        if issues_json.is_empty() {
            break;
        }

        let mut reached_cutoff = false;
        for issue in parse_github_issues(&issues_json) {
            if issue.number == exclude {
                continue;
            }
            if issue.created_at < cutoff {
                reached_cutoff = true;
                continue;
            }
            all_issues.push(issue);
            if all_issues.len() >= window.max_issues {
                return Ok(all_issues);
            }
        }

        if reached_cutoff || issues_json.len() < PER_PAGE as usize {
            break;
        }
        page += 1;
    }

    Ok(all_issues)
}
