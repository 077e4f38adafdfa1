use crate::config::{Config, TargetSource};
use crate::error::DetectorError;
use crate::github::client::IssueTracker;
use crate::github::event::extract_issue_from_event;
use crate::github::fetch::{fetch_recent_issues, parse_github_issue};
use crate::github::issues::Issue;
use crate::report::{render_comment, select_candidates};
use crate::similarity::{Candidate, score_candidates};
use crate::vectorizer::Vectorizer;
use chrono::{DateTime, Utc};

/// Whether the rendered comment is sent to GitHub or only returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Post,
    DryRun,
}

/// Result of one detection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub target: Issue,
    /// Candidates that passed the threshold and top-K cut, best first
    pub selected: Vec<Candidate>,
    pub comment: Option<String>,
    pub posted: bool,
}

/// Load the issue under inspection.
pub async fn resolve_target<T: IssueTracker>(
    tracker: &T,
    source: &TargetSource,
) -> Result<Issue, DetectorError> {
    match source {
        TargetSource::EventFile(path) => {
            let content = tokio::fs::read(path).await.map_err(|e| {
                DetectorError::InvalidEvent(format!(
                    "Failed to read event file {}: {e}",
                    path.display()
                ))
            })?;
            extract_issue_from_event(&content)
        }
        TargetSource::IssueNumber(number) => {
            let json = tracker.get_issue(*number).await?;
            parse_github_issue(&json).ok_or_else(|| {
                DetectorError::InvalidResponse(format!("#{number} is not a valid issue"))
            })
        }
    }
}

/// Rank the target's recent issues by textual similarity.
///
/// All issues are fetched before anything is vectorized, so a rejected
/// credential fails the run without doing any scoring.
pub async fn find_similar_issues<T: IssueTracker>(
    tracker: &T,
    config: &Config,
    target: &Issue,
    now: DateTime<Utc>,
) -> Result<Vec<Candidate>, DetectorError> {
    let existing = fetch_recent_issues(tracker, &config.window, target.number, now).await?;
    tracing::info!(
        repository = %config.repository,
        count = existing.len(),
        "fetched comparable issues"
    );

    if existing.is_empty() {
        return Err(DetectorError::EmptyCorpus {
            repository: config.repository.to_string(),
        });
    }

    let texts: Vec<String> = existing
        .iter()
        .map(Issue::document_text)
        .chain(std::iter::once(target.document_text()))
        .collect();
    let mut vectors = Vectorizer::new(config.weighting).fit_transform(&texts);
    let target_vector = vectors
        .pop()
        .ok_or_else(|| DetectorError::InvalidResponse("vectorizer returned no vectors".into()))?;

    Ok(score_candidates(&target_vector, &existing, &vectors))
}

/// Run the whole pipeline for an already resolved target issue.
pub async fn detect_duplicates<T: IssueTracker>(
    tracker: &T,
    config: &Config,
    target: Issue,
    delivery: Delivery,
    now: DateTime<Utc>,
) -> Result<Outcome, DetectorError> {
    let ranked = find_similar_issues(tracker, config, &target, now).await?;
    let selected = select_candidates(&ranked, &config.report);
    for candidate in &selected {
        tracing::info!(
            issue = candidate.issue.number,
            score = candidate.score,
            "similar issue"
        );
    }

    let comment = render_comment(&selected, &config.report);
    let selected: Vec<Candidate> = selected.into_iter().cloned().collect();

    let posted = match (&comment, delivery) {
        (Some(body), Delivery::Post) => {
            tracker.post_comment(target.number, body).await?;
            tracing::info!(issue = target.number, "posted similarity comment");
            true
        }
        (None, _) => {
            tracing::info!(issue = target.number, "no similar issues above threshold");
            false
        }
        (Some(_), Delivery::DryRun) => false,
    };

    Ok(Outcome {
        target,
        selected,
        comment,
        posted,
    })
}
