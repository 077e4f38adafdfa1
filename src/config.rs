use crate::error::DetectorError;
use crate::github::client::DEFAULT_API_URL;
use crate::github::fetch::FetchWindow;
use crate::github::issues::RepoSlug;
use crate::report::{NoMatchPolicy, ReportSettings};
use crate::vectorizer::Weighting;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration keys enum. Each key is read from the environment variable of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Token,
    Repository,
    ApiUrl,
    EventPath,
    IssueNumber,
    Threshold,
    TopK,
    LookbackDays,
    MaxIssues,
    NoMatch,
    Weighting,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Token => "GITHUB_TOKEN",
            ConfigKey::Repository => "GITHUB_REPOSITORY",
            ConfigKey::ApiUrl => "GITHUB_API_URL",
            ConfigKey::EventPath => "GITHUB_EVENT_PATH",
            ConfigKey::IssueNumber => "DUPLICATE_ISSUE_NUMBER",
            ConfigKey::Threshold => "DUPLICATE_THRESHOLD",
            ConfigKey::TopK => "DUPLICATE_TOP_K",
            ConfigKey::LookbackDays => "DUPLICATE_LOOKBACK_DAYS",
            ConfigKey::MaxIssues => "DUPLICATE_MAX_ISSUES",
            ConfigKey::NoMatch => "DUPLICATE_NO_MATCH",
            ConfigKey::Weighting => "DUPLICATE_WEIGHTING",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::Token,
            ConfigKey::Repository,
            ConfigKey::ApiUrl,
            ConfigKey::EventPath,
            ConfigKey::IssueNumber,
            ConfigKey::Threshold,
            ConfigKey::TopK,
            ConfigKey::LookbackDays,
            ConfigKey::MaxIssues,
            ConfigKey::NoMatch,
            ConfigKey::Weighting,
        ]
    }
}

/// Where the issue under inspection comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSource {
    /// A GitHub Actions event payload on disk
    EventFile(PathBuf),
    /// An issue number looked up through the API
    IssueNumber(u64),
}

/// Settings for a single run, built once and passed to each component.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub token: String,
    pub repository: RepoSlug,
    pub api_url: String,
    pub target: TargetSource,
    pub window: FetchWindow,
    pub report: ReportSettings,
    pub weighting: Weighting,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, DetectorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// Blank values count as unset. A missing token is reported as an
    /// authentication failure; every other problem is `InvalidConfig`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DetectorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: ConfigKey| {
            lookup(key.as_str())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get(ConfigKey::Token).ok_or_else(|| {
            DetectorError::Authentication(format!("{} is not set", ConfigKey::Token.as_str()))
        })?;

        let repository = get(ConfigKey::Repository)
            .ok_or_else(|| missing(ConfigKey::Repository))?
            .parse::<RepoSlug>()
            .map_err(DetectorError::InvalidConfig)?;

        let target = match (get(ConfigKey::EventPath), get(ConfigKey::IssueNumber)) {
            (Some(path), _) => TargetSource::EventFile(PathBuf::from(path)),
            (None, Some(number)) => {
                TargetSource::IssueNumber(parse_value(ConfigKey::IssueNumber, &number)?)
            }
            (None, None) => {
                return Err(DetectorError::InvalidConfig(format!(
                    "Either {} or {} must be set",
                    ConfigKey::EventPath.as_str(),
                    ConfigKey::IssueNumber.as_str()
                )));
            }
        };

        let defaults = ReportSettings::default();
        let threshold = match get(ConfigKey::Threshold) {
            Some(v) => parse_value::<f64>(ConfigKey::Threshold, &v)?,
            None => defaults.threshold,
        };
        if !(0.0..=1.0).contains(&threshold) {
            return Err(invalid(ConfigKey::Threshold, "must be between 0 and 1"));
        }

        let top_k = optional_positive(&get, ConfigKey::TopK, defaults.top_k)?;

        let no_match = match get(ConfigKey::NoMatch) {
            Some(v) => NoMatchPolicy::parse(&v)
                .ok_or_else(|| invalid(ConfigKey::NoMatch, "expected 'silent' or 'notice'"))?,
            None => defaults.no_match,
        };

        let weighting = match get(ConfigKey::Weighting) {
            Some(v) => Weighting::parse(&v)
                .ok_or_else(|| invalid(ConfigKey::Weighting, "expected 'tf' or 'tfidf'"))?,
            None => Weighting::default(),
        };

        let window_defaults = FetchWindow::default();
        let lookback_days = optional_positive(
            &get,
            ConfigKey::LookbackDays,
            window_defaults.lookback_days as usize,
        )?;
        let lookback_days = u32::try_from(lookback_days)
            .map_err(|_| invalid(ConfigKey::LookbackDays, "is too large"))?;
        let max_issues = optional_positive(&get, ConfigKey::MaxIssues, window_defaults.max_issues)?;

        Ok(Config {
            token,
            repository,
            api_url: get(ConfigKey::ApiUrl).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            target,
            window: FetchWindow {
                lookback_days,
                max_issues,
            },
            report: ReportSettings {
                threshold,
                top_k,
                no_match,
            },
            weighting,
        })
    }
}

fn missing(key: ConfigKey) -> DetectorError {
    DetectorError::InvalidConfig(format!("{} is not set", key.as_str()))
}

fn invalid(key: ConfigKey, reason: &str) -> DetectorError {
    DetectorError::InvalidConfig(format!("{} {reason}", key.as_str()))
}

fn parse_value<T: FromStr>(key: ConfigKey, value: &str) -> Result<T, DetectorError> {
    value
        .parse::<T>()
        .map_err(|_| invalid(key, &format!("has invalid value '{value}'")))
}

fn optional_positive<G>(get: &G, key: ConfigKey, default: usize) -> Result<usize, DetectorError>
where
    G: Fn(ConfigKey) -> Option<String>,
{
    match get(key) {
        Some(v) => match parse_value::<usize>(key, &v)? {
            0 => Err(invalid(key, "must be at least 1")),
            n => Ok(n),
        },
        None => Ok(default),
    }
}
