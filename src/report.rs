use crate::github::issues::IssueState;
use crate::similarity::Candidate;

pub const COMMENT_HEADING: &str = "## Potential Duplicate Issues Found";

/// What to do when no candidate reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoMatchPolicy {
    /// Post nothing
    #[default]
    Silent,
    /// Post a "no duplicates found" comment
    Notice,
}

impl NoMatchPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "silent" => Some(NoMatchPolicy::Silent),
            "notice" => Some(NoMatchPolicy::Notice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSettings {
    pub threshold: f64,
    pub top_k: usize,
    pub no_match: NoMatchPolicy,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            threshold: 0.8,
            top_k: 5,
            no_match: NoMatchPolicy::Silent,
        }
    }
}

/// Take the first `top_k` ranked candidates scoring at least `threshold`.
///
/// A score of zero means no shared term, so it never qualifies.
pub fn select_candidates<'a>(ranked: &'a [Candidate], settings: &ReportSettings) -> Vec<&'a Candidate> {
    ranked
        .iter()
        .filter(|candidate| candidate.score > 0.0 && candidate.score >= settings.threshold)
        .take(settings.top_k)
        .collect()
}

/// Render the issue comment, or `None` when nothing should be posted.
pub fn render_comment(selected: &[&Candidate], settings: &ReportSettings) -> Option<String> {
    if selected.is_empty() {
        return match settings.no_match {
            NoMatchPolicy::Silent => None,
            NoMatchPolicy::Notice => Some(format!(
                "{COMMENT_HEADING}\n\nNo similar issues found above the {} similarity threshold.\n",
                percent(settings.threshold)
            )),
        };
    }

    let mut body = format!("{COMMENT_HEADING}\n\n");
    for candidate in selected {
        let issue = &candidate.issue;
        let marker = match issue.state {
            IssueState::Open => "🟢",
            IssueState::Closed => "🔴",
        };
        body.push_str(&format!(
            "{marker} #{}: [{}]({})\n   - Similarity: {}\n   - Status: {}\n\n",
            issue.number,
            escape_link_text(&issue.title),
            issue.html_url,
            percent(candidate.score),
            issue.state.as_str()
        ));
    }
    Some(body)
}

/// Backslash-escape the characters that would end a markdown link early.
fn escape_link_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '[' | ']' | '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
