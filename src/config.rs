use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::github::DEFAULT_API_URL;
use crate::matcher::DEFAULT_MAX_RESULTS;
use crate::skills::MatcherKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github_api_url: String,
    pub github_token: Option<String>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_results: usize,
    /// Consultant directory JSON; the embedded directory is used when unset.
    pub consultants_path: Option<PathBuf>,
    pub skill_matcher: MatcherKind,
    pub fuzzy_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_api_url: DEFAULT_API_URL.to_string(),
            github_token: None,
            user_agent: "Three-Eyed-Coders-AI-Matcher".to_string(),
            request_timeout_secs: 10,
            max_results: DEFAULT_MAX_RESULTS,
            consultants_path: None,
            skill_matcher: MatcherKind::Substring,
            fuzzy_threshold: 0.9,
        }
    }
}

impl Config {
    /// Defaults, then the config file, then environment variables.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tec").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Environment overrides. Unparseable numbers are ignored with a warning.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(token) = get("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()) {
            self.github_token = Some(token);
        }
        if let Some(url) = get("TEC_GITHUB_API_URL").filter(|u| !u.trim().is_empty()) {
            self.github_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get("TEC_MAX_RESULTS") {
            match raw.trim().parse() {
                Ok(n) => self.max_results = n,
                Err(_) => warn!(value = %raw, "ignoring invalid TEC_MAX_RESULTS"),
            }
        }
        if let Some(raw) = get("TEC_REQUEST_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(n) => self.request_timeout_secs = n,
                Err(_) => warn!(value = %raw, "ignoring invalid TEC_REQUEST_TIMEOUT_SECS"),
            }
        }
        if let Some(path) = get("TEC_CONSULTANTS_PATH").filter(|p| !p.trim().is_empty()) {
            self.consultants_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = get("TEC_SKILL_MATCHER") {
            match MatcherKind::parse(&raw) {
                Some(kind) => self.skill_matcher = kind,
                None => warn!(value = %raw, "ignoring unknown TEC_SKILL_MATCHER"),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
