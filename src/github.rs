use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::models::{Difficulty, SearchCriteria};
use crate::skills::{keywords_for, language_for};
use crate::source::CandidateSource;

// --- Wire types ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseRecord {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerRecord {
    pub login: String,
    pub html_url: String,
    pub followers: u64,
    pub public_repos: u64,
}

/// One item of `GET /search/repositories`. Missing fields fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub license: Option<LicenseRecord>,
    pub archived: bool,
    pub has_issues: bool,
    pub has_wiki: bool,
    pub has_projects: bool,
    pub topics: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub size: u64,
    pub owner: OwnerRecord,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepositoryRecord>,
}

// --- Query building ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub q: String,
    pub sort: &'static str,
    pub order: &'static str,
    pub per_page: u8,
}

impl SearchQuery {
    fn new(q: String, sort: &'static str, per_page: u8) -> Self {
        Self {
            q,
            sort,
            order: "desc",
            per_page,
        }
    }
}

pub const POPULAR_CATEGORIES: &[&str] = &[
    "react",
    "vue",
    "angular",
    "node",
    "python",
    "machine-learning",
    "blockchain",
    "kubernetes",
];

/// Search queries for a developer profile: per-skill queries for the first three skills,
/// general quality queries, one tuned to the experience level and one random category.
pub fn build_queries<R: Rng + ?Sized>(
    criteria: &SearchCriteria,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<SearchQuery> {
    let since = (now - Duration::days(365)).format("%Y-%m-%d").to_string();
    let recent = (now - Duration::days(180)).format("%Y-%m-%d").to_string();
    let mut queries = Vec::new();

    for skill in criteria.requested_skills().iter().take(3) {
        let primary = keywords_for(skill)
            .and_then(|k| k.first())
            .map(|k| k.to_string())
            .unwrap_or_else(|| skill.to_lowercase());
        let language = language_for(skill);

        queries.push(SearchQuery::new(
            format!("{} stars:>500 forks:>50 good-first-issues:>5 license:mit", primary),
            "stars",
            8,
        ));
        queries.push(SearchQuery::new(
            format!("{} language:{} stars:>100 pushed:>{}", primary, language, since),
            "updated",
            6,
        ));
    }

    queries.push(SearchQuery::new(
        format!("stars:>1000 forks:>100 good-first-issues:>10 pushed:>{}", recent),
        "stars",
        12,
    ));
    queries.push(SearchQuery::new(
        format!("stars:>2000 pushed:>{} topics:>3", since),
        "stars",
        10,
    ));

    let level_query = match criteria.difficulty() {
        Some(Difficulty::Beginner) => {
            SearchQuery::new("stars:>200 good-first-issues:>10 help-wanted-issues:>5".to_string(), "stars", 15)
        }
        Some(Difficulty::Advanced) => {
            SearchQuery::new("stars:>5000 forks:>500 archived:false".to_string(), "stars", 8)
        }
        _ => SearchQuery::new("stars:>1000 good-first-issues:>3".to_string(), "stars", 10),
    };
    queries.push(level_query);

    if let Some(category) = POPULAR_CATEGORIES.choose(rng) {
        queries.push(SearchQuery::new(
            format!("{} stars:>1000 license:mit pushed:>{}", category, since),
            "stars",
            6,
        ));
    }

    queries
}

/// Keeps the first occurrence of each repository id.
pub fn dedup_records(records: Vec<RepositoryRecord>) -> Vec<RepositoryRecord> {
    let mut seen = HashSet::new();
    records.into_iter().filter(|r| seen.insert(r.id)).collect()
}

// --- Source ---

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct GithubSource {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubSource {
    pub fn new(
        api_url: &str,
        token: Option<String>,
        user_agent: &str,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search/repositories", self.api_url)
    }
}

async fn execute_search(
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    query: SearchQuery,
) -> Result<Vec<RepositoryRecord>> {
    let per_page = query.per_page.to_string();
    let mut request = client
        .get(&url)
        .header("Accept", "application/vnd.github.v3+json")
        .query(&[
            ("q", query.q.as_str()),
            ("sort", query.sort),
            ("order", query.order),
            ("per_page", per_page.as_str()),
        ]);
    if let Some(token) = &token {
        request = request.bearer_auth(token);
    }

    let response = request
        .send()
        .await
        .context("Failed to send request to GitHub search API")?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!(
            "GitHub search request failed with status {}: {}",
            status,
            error_text
        ));
    }

    let body: SearchResponse = response
        .json()
        .await
        .context("Failed to parse GitHub search response")?;
    Ok(body.items)
}

impl CandidateSource for GithubSource {
    type Record = RepositoryRecord;

    /// Runs every query concurrently and merges results in query order.
    /// Fails only when no query succeeds.
    async fn query(&self, criteria: &SearchCriteria) -> Result<Vec<RepositoryRecord>> {
        let queries = build_queries(criteria, Utc::now(), &mut rand::thread_rng());
        let total = queries.len();

        let handles: Vec<_> = queries
            .into_iter()
            .map(|query| {
                let q = query.q.clone();
                let task = tokio::spawn(execute_search(
                    self.client.clone(),
                    self.search_url(),
                    self.token.clone(),
                    query,
                ));
                (q, task)
            })
            .collect();

        let mut records = Vec::new();
        let mut failures = 0;
        for (q, handle) in handles {
            match handle.await {
                Ok(Ok(items)) => {
                    debug!(query = %q, count = items.len(), "search query returned");
                    records.extend(items);
                }
                Ok(Err(err)) => {
                    warn!(query = %q, error = %err, "search query failed");
                    failures += 1;
                }
                Err(err) => {
                    warn!(query = %q, error = %err, "search task aborted");
                    failures += 1;
                }
            }
        }

        if failures == total {
            return Err(anyhow!("All {} GitHub search queries failed", total));
        }
        Ok(dedup_records(records))
    }
}
