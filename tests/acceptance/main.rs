use cucumber::World;
use std::process::ExitStatus;

#[derive(Debug, Default, World)]
pub struct IssuedupWorld {
    pub existing_issues: Vec<serde_json::Value>,
    pub new_issue: Option<issuedup::github::issues::Issue>,
    pub threshold: Option<f64>,
    pub no_match: Option<issuedup::report::NoMatchPolicy>,
    pub reject_token: bool,
    pub outcome: Option<Result<issuedup::detector::Outcome, String>>,
    pub authentication_failed: bool,
    pub posted_comments: Vec<(u64, String)>,
    pub captured_output: Vec<u8>,
    pub command_status: Option<ExitStatus>,
}

#[tokio::main]
async fn main() {
    IssuedupWorld::run("features").await;
}

mod steps;
