use chrono::{DateTime, Duration, Utc};

use crate::models::{Consultant, Difficulty, Repository, SearchCriteria};
use crate::skills::SkillMatcher;

// --- Consultants ---

/// True iff the consultant satisfies every constraint present in `criteria`.
pub fn consultant_passes(
    consultant: &Consultant,
    criteria: &SearchCriteria,
    matcher: &dyn SkillMatcher,
) -> bool {
    let requested = criteria.requested_skills();
    if !requested.is_empty()
        && !requested
            .iter()
            .any(|skill| consultant.skills.iter().any(|offered| matcher.matches(skill, offered)))
    {
        return false;
    }

    if let Some(budget) = criteria.budget {
        if consultant.hourly_rate > budget {
            return false;
        }
    }

    if criteria.wants_available() && !consultant.is_available() {
        return false;
    }

    if let Some(location) = criteria.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        let wanted = location.to_lowercase();
        if !consultant.location.to_lowercase().contains(&wanted) && !consultant.is_remote() {
            return false;
        }
    }

    if let Some(project_type) = criteria.project_type.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        let wanted = project_type.to_lowercase();
        if !consultant
            .project_types
            .iter()
            .any(|t| t.to_lowercase().contains(&wanted))
        {
            return false;
        }
    }

    if let Some(years) = criteria.min_years() {
        if consultant.years_experience < years {
            return false;
        }
    }

    if let Some(min_rating) = criteria.min_rating {
        if consultant.rating < min_rating {
            return false;
        }
    }

    true
}

pub fn filter_consultants(
    consultants: Vec<Consultant>,
    criteria: &SearchCriteria,
    matcher: &dyn SkillMatcher,
) -> Vec<Consultant> {
    consultants
        .into_iter()
        .filter(|c| consultant_passes(c, criteria, matcher))
        .collect()
}

// --- Repositories ---

pub const OPEN_SOURCE_LICENSES: &[&str] = &[
    "mit",
    "apache-2.0",
    "bsd-3-clause",
    "bsd-2-clause",
    "gpl-3.0",
    "lgpl-3.0",
];

/// Hard quality gate applied to fetched repositories before scoring.
#[derive(Debug, Clone)]
pub struct RepositoryFilter {
    pub min_stars: u64,
    pub min_forks: u64,
    /// `None` disables the license requirement.
    pub allowed_licenses: Option<Vec<String>>,
    pub max_staleness: Option<Duration>,
    pub allow_archived: bool,
}

impl RepositoryFilter {
    pub fn for_level(level: Option<Difficulty>) -> Self {
        let min_stars = match level {
            Some(Difficulty::Beginner) => 50,
            Some(Difficulty::Advanced) => 500,
            _ => 100,
        };
        Self {
            min_stars,
            min_forks: 5,
            allowed_licenses: Some(OPEN_SOURCE_LICENSES.iter().map(|l| l.to_string()).collect()),
            max_staleness: Some(Duration::days(365)),
            allow_archived: false,
        }
    }

    pub fn keep(&self, repo: &Repository, now: DateTime<Utc>) -> bool {
        if repo.stars < self.min_stars || repo.forks < self.min_forks {
            return false;
        }

        if let Some(allowed) = &self.allowed_licenses {
            let licensed = repo
                .license
                .as_ref()
                .is_some_and(|l| allowed.iter().any(|a| a.eq_ignore_ascii_case(&l.key)));
            if !licensed {
                return false;
            }
        }

        if repo.archived && !self.allow_archived {
            return false;
        }

        if let Some(max_age) = self.max_staleness {
            match repo.last_updated {
                Some(updated) if now - updated <= max_age => {}
                _ => return false,
            }
        }

        true
    }

    pub fn apply(&self, repos: Vec<Repository>, now: DateTime<Utc>) -> Vec<Repository> {
        repos.into_iter().filter(|r| self.keep(r, now)).collect()
    }
}
