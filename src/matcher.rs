use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::enrich::{fallback_projects, to_repository};
use crate::filter::{RepositoryFilter, filter_consultants};
use crate::github::RepositoryRecord;
use crate::insights::{ConsultantInsight, ProjectInsight, consultant_insight, project_insight};
use crate::models::{Consultant, MatchResult, Repository, SearchCriteria};
use crate::ranking::rank;
use crate::scoring::{score_consultant, score_repository};
use crate::skills::SkillMatcher;
use crate::source::CandidateSource;

pub type ConsultantMatch = MatchResult<Consultant, ConsultantInsight>;
pub type ProjectMatch = MatchResult<Repository, ProjectInsight>;

pub const DEFAULT_MAX_RESULTS: usize = 12;

// --- Consultants ---

pub struct ConsultantMatcher<S> {
    source: S,
    matcher: Box<dyn SkillMatcher>,
    max_results: usize,
}

impl<S> ConsultantMatcher<S>
where
    S: CandidateSource<Record = Consultant>,
{
    pub fn new(source: S, matcher: Box<dyn SkillMatcher>, max_results: usize) -> Self {
        Self {
            source,
            matcher,
            max_results,
        }
    }

    /// Filtered, scored and ranked consultants. A failing source yields an empty list.
    pub async fn search(&self, criteria: &SearchCriteria) -> Vec<ConsultantMatch> {
        let consultants = match self.source.query(criteria).await {
            Ok(consultants) => consultants,
            Err(err) => {
                warn!(error = %err, "consultant source unavailable");
                return Vec::new();
            }
        };
        let fetched = consultants.len();

        let results: Vec<_> = filter_consultants(consultants, criteria, self.matcher.as_ref())
            .into_iter()
            .map(|consultant| self.evaluate(consultant, criteria))
            .collect();
        info!(fetched, matched = results.len(), "consultant search complete");

        rank(results, self.max_results)
    }

    pub fn evaluate(&self, consultant: Consultant, criteria: &SearchCriteria) -> ConsultantMatch {
        let breakdown = score_consultant(&consultant, criteria, self.matcher.as_ref());
        let score = breakdown.total();
        let insights = consultant_insight(&consultant, criteria, score, self.matcher.as_ref());
        MatchResult {
            candidate: consultant,
            score,
            breakdown,
            insights,
        }
    }
}

// --- Projects ---

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSearch {
    pub results: Vec<ProjectMatch>,
    /// True when the search API failed and placeholder projects were served instead.
    pub fallback: bool,
}

pub struct ProjectMatcher<S> {
    source: S,
    matcher: Box<dyn SkillMatcher>,
    max_results: usize,
}

impl<S> ProjectMatcher<S>
where
    S: CandidateSource<Record = RepositoryRecord>,
{
    pub fn new(source: S, matcher: Box<dyn SkillMatcher>, max_results: usize) -> Self {
        Self {
            source,
            matcher,
            max_results,
        }
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> ProjectSearch {
        self.search_at(criteria, Utc::now()).await
    }

    /// Never fails: when the source errors, the fixed fallback projects are scored and returned.
    pub async fn search_at(&self, criteria: &SearchCriteria, now: DateTime<Utc>) -> ProjectSearch {
        let records = match self.source.query(criteria).await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "repository search failed; serving fallback projects");
                let results = fallback_projects(criteria)
                    .into_iter()
                    .map(|repo| self.evaluate(repo, criteria))
                    .collect();
                return ProjectSearch {
                    results: rank(results, self.max_results),
                    fallback: true,
                };
            }
        };
        let fetched = records.len();

        let repos = records.iter().map(to_repository).collect();
        let filter = RepositoryFilter::for_level(criteria.difficulty());
        let results: Vec<_> = filter
            .apply(repos, now)
            .into_iter()
            .map(|repo| self.evaluate(repo, criteria))
            .collect();
        info!(fetched, matched = results.len(), "project search complete");

        ProjectSearch {
            results: rank(results, self.max_results),
            fallback: false,
        }
    }

    pub fn evaluate(&self, repo: Repository, criteria: &SearchCriteria) -> ProjectMatch {
        let breakdown = score_repository(&repo, criteria, self.matcher.as_ref());
        let score = breakdown.total();
        let insights = project_insight(&repo, criteria, score, self.matcher.as_ref());
        MatchResult {
            candidate: repo,
            score,
            breakdown,
            insights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::GithubSource;
    use crate::github::tests::fixture_records;
    use crate::scoring::tests::consultant;
    use crate::skills::SubstringMatcher;
    use crate::source::ConsultantDirectory;
    use anyhow::{Result, anyhow};
    use chrono::TimeZone;

    struct FailingSource;

    impl CandidateSource for FailingSource {
        type Record = RepositoryRecord;

        async fn query(&self, _criteria: &SearchCriteria) -> Result<Vec<RepositoryRecord>> {
            Err(anyhow!("connection reset"))
        }
    }

    struct BrokenDirectory;

    impl CandidateSource for BrokenDirectory {
        type Record = Consultant;

        async fn query(&self, _criteria: &SearchCriteria) -> Result<Vec<Consultant>> {
            Err(anyhow!("directory offline"))
        }
    }

    struct FixtureSource(Vec<RepositoryRecord>);

    impl CandidateSource for FixtureSource {
        type Record = RepositoryRecord;

        async fn query(&self, _criteria: &SearchCriteria) -> Result<Vec<RepositoryRecord>> {
            Ok(self.0.clone())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn skills(items: &[&str]) -> SearchCriteria {
        SearchCriteria {
            skills: items.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn embedded_matcher() -> ConsultantMatcher<ConsultantDirectory> {
        ConsultantMatcher::new(
            ConsultantDirectory::embedded().unwrap(),
            Box::new(SubstringMatcher),
            DEFAULT_MAX_RESULTS,
        )
    }

    #[tokio::test]
    async fn test_consultant_search_ranks_react_budget_query() {
        let criteria = SearchCriteria {
            budget: Some(130.0),
            ..skills(&["React"])
        };
        let results = embedded_matcher().search(&criteria).await;

        // Sarah (React, $125) and Luna (React Native, $110) qualify
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.candidate.hourly_rate <= 130.0));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(results.iter().all(|r| r.score <= 100));
    }

    #[tokio::test]
    async fn test_consultant_search_without_criteria_returns_everyone() {
        let results = embedded_matcher().search(&SearchCriteria::default()).await;
        assert_eq!(results.len(), 6);
        for r in &results {
            assert_eq!(r.breakdown.constraint, 25.0);
            assert_eq!(r.breakdown.activity, 15.0);
        }
    }

    #[tokio::test]
    async fn test_consultant_search_with_no_matches_is_empty() {
        let results = embedded_matcher().search(&skills(&["COBOL"])).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_consultant_ties_keep_directory_order() {
        let directory = ConsultantDirectory::new(vec![
            Consultant { id: "a".to_string(), ..consultant(&["Go"], 100.0) },
            Consultant { id: "b".to_string(), ..consultant(&["Go"], 100.0) },
            Consultant { id: "c".to_string(), ..consultant(&["Go"], 100.0) },
        ]);
        let matcher = ConsultantMatcher::new(directory, Box::new(SubstringMatcher), 2);
        let results = matcher.search(&skills(&["Go"])).await;
        let ids: Vec<_> = results.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_broken_consultant_source_yields_empty_list() {
        let matcher = ConsultantMatcher::new(BrokenDirectory, Box::new(SubstringMatcher), 12);
        assert!(matcher.search(&SearchCriteria::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_project_search_falls_back_when_source_fails() {
        let matcher = ProjectMatcher::new(FailingSource, Box::new(SubstringMatcher), 12);
        let search = matcher.search_at(&skills(&["React"]), now()).await;
        assert!(search.fallback);
        assert_eq!(search.results.len(), 3);
        assert_eq!(search.results[0].candidate.id, "fallback-1");
    }

    #[tokio::test]
    async fn test_project_search_falls_back_when_api_unreachable() {
        let source = GithubSource::new(
            "http://127.0.0.1:9",
            None,
            "tec-test",
            std::time::Duration::from_secs(2),
        )
        .unwrap();
        let matcher = ProjectMatcher::new(source, Box::new(SubstringMatcher), 12);
        let search = matcher.search(&skills(&["Rust"])).await;
        assert!(search.fallback);
        assert!(!search.results.is_empty());
    }

    #[tokio::test]
    async fn test_project_search_drops_unlicensed_repositories() {
        let matcher = ProjectMatcher::new(FixtureSource(fixture_records()), Box::new(SubstringMatcher), 12);
        let search = matcher.search_at(&skills(&["React"]), now()).await;
        assert!(!search.fallback);
        // 202 has 250k stars but no license; 303 is too small
        let ids: Vec<_> = search.results.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["101"]);
        assert_eq!(search.results[0].breakdown.skills, 40.0);
    }

    #[tokio::test]
    async fn test_project_search_empty_source_is_not_a_failure() {
        let matcher = ProjectMatcher::new(FixtureSource(vec![]), Box::new(SubstringMatcher), 12);
        let search = matcher.search_at(&skills(&["React"]), now()).await;
        assert!(!search.fallback);
        assert!(search.results.is_empty());
    }
}
