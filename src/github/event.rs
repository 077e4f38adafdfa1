use crate::error::DetectorError;
use crate::github::issues::{Issue, IssueState};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The part of a GitHub Actions `issues` event payload this tool reads.
#[derive(Deserialize, Debug)]
pub struct IssueEvent {
    pub issue: Option<EventIssue>,
}

#[derive(Deserialize, Debug)]
pub struct EventIssue {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

/// Extracts the triggering issue from an event payload.
///
/// # Returns
///
/// * `Ok(issue)` if the payload carries a complete issue object.
/// * `Err(DetectorError::InvalidEvent)` if the JSON is malformed, the event is
///   not an issue event, or a required field is missing.
pub fn extract_issue_from_event(json: &[u8]) -> Result<Issue, DetectorError> {
    let event = serde_json::from_slice::<IssueEvent>(json)
        .map_err(|e| DetectorError::InvalidEvent(format!("Failed to parse event payload: {e}")))?;
    let issue = event.issue.ok_or_else(|| {
        DetectorError::InvalidEvent("This action only works with issue events".to_string())
    })?;
    let state = IssueState::parse(&issue.state).ok_or_else(|| {
        DetectorError::InvalidEvent(format!("Unknown issue state '{}'", issue.state))
    })?;

    Ok(Issue {
        number: issue.number,
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        created_at: issue.created_at,
        state,
        html_url: issue.html_url,
    })
}
