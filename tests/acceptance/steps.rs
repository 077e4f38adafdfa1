use crate::IssuedupWorld;
use cucumber::{given, then, when};
use issuedup::config::{Config, TargetSource};
use issuedup::detector::{Delivery, detect_duplicates};
use issuedup::error::DetectorError;
use issuedup::github::client::IssueTracker;
use issuedup::github::fetch::FetchWindow;
use issuedup::github::issues::{Issue, IssueState};
use issuedup::report::{NoMatchPolicy, ReportSettings};
use issuedup::vectorizer::Weighting;
use std::cell::RefCell;

const NOW: &str = "2026-10-19T12:00:00Z";

/// In-memory stand-in for the GitHub issues API.
struct FakeTracker {
    issues: Vec<serde_json::Value>,
    reject_token: bool,
    comments: RefCell<Vec<(u64, String)>>,
}

impl IssueTracker for FakeTracker {
    async fn list_issues(
        &self,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<serde_json::Value>, DetectorError> {
        if self.reject_token {
            return Err(DetectorError::Authentication(
                "Token invalid or expired".to_string(),
            ));
        }
        Ok(if page == 1 {
            self.issues.clone()
        } else {
            vec![]
        })
    }

    async fn get_issue(&self, number: u64) -> Result<serde_json::Value, DetectorError> {
        Err(DetectorError::Api {
            status: 404,
            message: format!("issue {number} not found"),
        })
    }

    async fn post_comment(&self, issue_number: u64, body: &str) -> Result<(), DetectorError> {
        self.comments
            .borrow_mut()
            .push((issue_number, body.to_string()));
        Ok(())
    }
}

fn issue_json(number: u64, title: &str, state: &str, created_at: &str) -> serde_json::Value {
    serde_json::json!({
        "number": number,
        "title": title,
        "body": "",
        "state": state,
        "created_at": created_at,
        "html_url": format!("https://github.com/owner/repo/issues/{number}"),
        "pull_request": null
    })
}

#[given(regex = r#"^an open issue #(\d+) titled "([^"]*)" created on (\S+)$"#)]
async fn given_open_issue(world: &mut IssuedupWorld, number: u64, title: String, created: String) {
    world
        .existing_issues
        .push(issue_json(number, &title, "open", &created));
}

#[given(regex = r#"^a closed issue #(\d+) titled "([^"]*)" created on (\S+)$"#)]
async fn given_closed_issue(world: &mut IssuedupWorld, number: u64, title: String, created: String) {
    world
        .existing_issues
        .push(issue_json(number, &title, "closed", &created));
}

#[given(regex = r#"^a new issue #(\d+) titled "([^"]*)"$"#)]
async fn given_new_issue(world: &mut IssuedupWorld, number: u64, title: String) {
    world.new_issue = Some(Issue {
        number,
        title,
        body: String::new(),
        created_at: NOW.parse().expect("valid timestamp"),
        state: IssueState::Open,
        html_url: format!("https://github.com/owner/repo/issues/{number}"),
    });
}

#[given(regex = r#"^the similarity threshold is ([0-9.]+)$"#)]
async fn given_threshold(world: &mut IssuedupWorld, threshold: f64) {
    world.threshold = Some(threshold);
}

#[given(regex = r#"^the no-match policy is "(silent|notice)"$"#)]
async fn given_no_match_policy(world: &mut IssuedupWorld, policy: String) {
    world.no_match = NoMatchPolicy::parse(&policy);
}

#[given("the GitHub token is rejected")]
async fn given_token_rejected(world: &mut IssuedupWorld) {
    world.reject_token = true;
}

#[when("duplicate detection runs")]
async fn when_detection_runs(world: &mut IssuedupWorld) {
    let tracker = FakeTracker {
        issues: world.existing_issues.clone(),
        reject_token: world.reject_token,
        comments: RefCell::new(Vec::new()),
    };
    let defaults = ReportSettings::default();
    let config = Config {
        token: "ghp_test".to_string(),
        repository: "owner/repo".parse().expect("valid slug"),
        api_url: "https://api.github.com".to_string(),
        target: TargetSource::IssueNumber(0),
        window: FetchWindow::default(),
        report: ReportSettings {
            threshold: world.threshold.unwrap_or(defaults.threshold),
            top_k: defaults.top_k,
            no_match: world.no_match.unwrap_or(defaults.no_match),
        },
        weighting: Weighting::TermFrequency,
    };
    let target = world.new_issue.clone().expect("a new issue must be given");

    let result = detect_duplicates(
        &tracker,
        &config,
        target,
        Delivery::Post,
        NOW.parse().expect("valid timestamp"),
    )
    .await;

    world.authentication_failed = matches!(&result, Err(e) if e.is_authentication());
    world.outcome = Some(result.map_err(|e| e.to_string()));
    world.posted_comments = tracker.comments.into_inner();
}

#[when("I run `issuedup` without a GitHub token")]
async fn when_run_without_token(world: &mut IssuedupWorld) {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_issuedup"))
        .env_remove("GITHUB_TOKEN")
        .env("GITHUB_REPOSITORY", "owner/repo")
        .env("DUPLICATE_ISSUE_NUMBER", "1")
        .output()
        .expect("Failed to execute issuedup");

    world.captured_output = [output.stdout, output.stderr].concat();
    world.command_status = Some(output.status);
}

#[when("I run `issuedup help`")]
async fn when_run_help(world: &mut IssuedupWorld) {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_issuedup"))
        .arg("help")
        .output()
        .expect("Failed to execute issuedup");

    world.captured_output = [output.stdout, output.stderr].concat();
    world.command_status = Some(output.status);
}

#[then(regex = r#"^a comment should be posted on #(\d+) listing (.+)$"#)]
async fn then_comment_lists(world: &mut IssuedupWorld, number: u64, expected: String) {
    assert_eq!(world.posted_comments.len(), 1, "expected exactly one comment");
    let (issue_number, body) = &world.posted_comments[0];
    assert_eq!(*issue_number, number);

    let listed: Vec<&str> = expected.split(", ").collect();
    let positions: Vec<usize> = listed
        .iter()
        .map(|reference| {
            body.find(&format!("{reference}:"))
                .unwrap_or_else(|| panic!("{reference} missing from comment:\n{body}"))
        })
        .collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "candidates listed out of order:\n{body}"
    );
}

#[then(regex = r#"^the comment should not mention #(\d+)$"#)]
async fn then_comment_excludes(world: &mut IssuedupWorld, number: u64) {
    let (_, body) = &world.posted_comments[0];
    assert!(
        !body.contains(&format!("#{number}:")),
        "#{number} unexpectedly listed:\n{body}"
    );
}

#[then(regex = r#"^the comment should contain "([^"]*)"$"#)]
async fn then_comment_contains(world: &mut IssuedupWorld, expected: String) {
    let (_, body) = &world.posted_comments[0];
    assert!(body.contains(&expected), "comment was:\n{body}");
}

#[then("no comment should be posted")]
async fn then_no_comment(world: &mut IssuedupWorld) {
    match &world.outcome {
        Some(Ok(outcome)) => assert!(outcome.selected.is_empty()),
        other => panic!("detection did not succeed: {other:?}"),
    }
    assert!(world.posted_comments.is_empty());
}

#[then("the run should fail with an authentication error")]
async fn then_authentication_error(world: &mut IssuedupWorld) {
    assert!(
        world.authentication_failed,
        "expected authentication failure, got {:?}",
        world.outcome
    );
    assert!(world.posted_comments.is_empty());
}

#[then(regex = r#"^the run should fail with "([^"]*)"$"#)]
async fn then_run_fails_with(world: &mut IssuedupWorld, expected: String) {
    match &world.outcome {
        Some(Err(message)) => assert_eq!(message, &expected),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[then("the command should exit with a failure")]
async fn then_command_fails(world: &mut IssuedupWorld) {
    assert!(
        world.command_status.is_some_and(|s| !s.success()),
        "Command unexpectedly succeeded: {:?}",
        world.command_status
    );
}

#[then("the command should succeed")]
async fn then_command_succeeds(world: &mut IssuedupWorld) {
    assert!(
        world.command_status.is_some_and(|s| s.success()),
        "Command failed with status: {:?}",
        world.command_status
    );
}

#[then(regex = r#"^the output should contain "(.*)"$"#)]
async fn then_output_contains(world: &mut IssuedupWorld, expected: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert!(
        output.contains(&expected),
        "Expected output to contain '{}', but got:\n---\n{}\n---",
        expected,
        output.trim_end()
    );
}
